//! Error types and error handling.
//!
//! The lexer itself never fails: illegal characters are reported as
//! `ILLEGAL` tokens. This module defines the errors raised by the consumers
//! that decide to treat them as fatal, and by the REPL and binary I/O:
//!
//! - Error structures with source position information
//! - Error formatting and display functionality

pub mod errors;
