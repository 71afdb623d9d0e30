use std::iter::FusedIterator;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, MK_TOKEN,
};

use super::tokens::{lookup_ident, Token, TokenKind, DOUBLE_LOOKUP, UNIT_LOOKUP};

/// Handles the text matched by a pattern anchored at the cursor.
///
/// Returning `None` after advancing means the match was skipped (whitespace).
/// Returning `None` without advancing declines the match, and the next
/// pattern is tried.
pub type RegexHandler = fn(&mut Lexer, &str) -> Option<Token>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    // Order is precedence: the two-character operators must be tried before
    // the single-character ones that share their lead character.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new(r"^[ \t\r\n\x0B\x0C]+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^(==|!=)").unwrap(), handler: double_handler },
        RegexPattern { regex: Regex::new(r"^[=+\-!*/,;(){}<>]").unwrap(), handler: unit_handler },
        RegexPattern { regex: Regex::new(r"^[a-zA-Z_]+").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new(r"^[0-9]+").unwrap(), handler: number_handler },
    ];
}

/// Pull-based tokenizer over an immutable source buffer.
///
/// Each call to [`Lexer::next_token`] skips whitespace and produces exactly one
/// token. The stream ends with the first `EOF` or `ILLEGAL` token; after that
/// the lexer is inert and keeps handing back that terminal token without
/// touching the cursor.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    terminal: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Lexer<'a> {
        Lexer {
            source,
            pos: 0,
            terminal: None,
        }
    }

    /// Byte offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.source.len());
    }

    pub fn remainder(&self) -> &'a str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn is_finished(&self) -> bool {
        self.terminal.is_some()
    }

    pub fn next_token(&mut self) -> Token {
        if let Some(terminal) = &self.terminal {
            return terminal.clone();
        }

        let token = self.scan();
        trace!(kind = %token.kind, literal = %token.literal, offset = self.pos, "token");

        if token.is_terminal() {
            self.terminal = Some(token.clone());
        }

        token
    }

    fn scan(&mut self) -> Token {
        'scan: loop {
            if self.at_eof() {
                return MK_TOKEN!(TokenKind::EOF, "");
            }

            let remaining = self.remainder();
            let before = self.pos;

            for pattern in PATTERNS.iter() {
                let Some(matched) = pattern.regex.find(remaining) else {
                    continue;
                };

                match (pattern.handler)(self, matched.as_str()) {
                    Some(token) => return token,
                    None if self.pos > before => continue 'scan,
                    None => continue,
                }
            }

            return illegal_handler(self);
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.is_finished() {
            return None;
        }

        Some(self.next_token())
    }
}

impl FusedIterator for Lexer<'_> {}

fn skip_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    lexer.advance_n(matched.len());
    None
}

fn double_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let kind = *DOUBLE_LOOKUP.get(matched)?;
    lexer.advance_n(matched.len());
    Some(MK_TOKEN!(kind, matched))
}

fn unit_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let ch = matched.chars().next()?;
    let kind = *UNIT_LOOKUP.get(&ch)?;
    lexer.advance_n(ch.len_utf8());
    Some(MK_TOKEN!(kind, ch.to_string()))
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    lexer.advance_n(matched.len());
    Some(MK_TOKEN!(lookup_ident(matched), matched))
}

fn number_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    lexer.advance_n(matched.len());
    Some(MK_TOKEN!(TokenKind::Number, matched))
}

// Consumes a whole character so the literal stays valid UTF-8.
fn illegal_handler(lexer: &mut Lexer) -> Token {
    match lexer.remainder().chars().next() {
        Some(ch) => {
            lexer.advance_n(ch.len_utf8());
            MK_TOKEN!(TokenKind::Illegal, ch.to_string())
        }
        None => MK_TOKEN!(TokenKind::EOF, ""),
    }
}

/// Lazily tokenizes `source`, yielding every token up to and including the
/// terminal one.
pub fn lex(source: &str) -> Lexer<'_> {
    Lexer::new(source)
}

/// Collects the whole stream, treating an illegal character as fatal.
///
/// On success the returned tokens always end with `EOF`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source);
    let mut tokens = vec![];

    loop {
        let token = lex.next_token();

        match token.kind {
            TokenKind::Illegal => {
                let offset = lex.position() - token.literal.len();
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken {
                        token: token.literal,
                    },
                    Position::from_offset(offset),
                ));
            }
            TokenKind::EOF => {
                tokens.push(token);
                return Ok(tokens);
            }
            _ => tokens.push(token),
        }
    }
}
