//! Lexical analysis module.
//!
//! This module contains the lexer (tokenizer) that converts source text
//! into a stream of tokens for a parser or REPL to consume. It handles:
//!
//! - Whitespace skipping
//! - Two-character operators taking precedence over single-character ones
//! - Recognition of keywords, identifiers and integer literals
//! - Signalling the end of input and illegal characters as tokens

pub mod lexer;
pub mod tokens;
