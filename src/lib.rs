#![allow(clippy::module_inception)]

use std::fmt::Write;

use crate::errors::errors::{Error, ErrorTip};

pub mod errors;
pub mod lexer;
pub mod macros;
pub mod repl;

extern crate regex;

/// Byte offset into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position(pub u32);

impl Position {
    pub fn null() -> Self {
        Position(0)
    }

    /// Offsets past `u32::MAX` saturate rather than wrap.
    pub fn from_offset(offset: usize) -> Self {
        Position(u32::try_from(offset).unwrap_or(u32::MAX))
    }
}

/// Returns the 1-based line number, the text of that line (including its
/// terminator) and the byte offset of `position` within it.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos >= source.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((line_number, line.to_string(), pos - start));
        }

        start = end;
        line_number += 1;
    }

    None
}


/// Renders `error` as a caret diagnostic pointing into `source`.
pub fn display_error(error: &Error, source: &str, name: &str) -> String {
    /*
        Error: UnrecognisedToken
        -> main.mk
          |
        1 | let a = @;
          | --------^
    */

    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        let _ = writeln!(out, "Error: {}", error.get_error_name());
    } else {
        let _ = writeln!(out, "Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    let _ = writeln!(out, "-> {}", name);

    let position = error.get_position();
    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let _ = writeln!(out, "{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    let _ = writeln!(out, "{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    let _ = writeln!(out, "{:>padding$} {:->arrows$}", "|", "^");
    out
}

// Indentation is spaces and tabs; both count one column towards the caret.
fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let rest = string.trim_start_matches([' ', '\t']);
    (String::from(rest), string.len() - rest.len())
}
