//! Interactive read-loop that prints the token stream of each line.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::{errors::errors::Error, lexer::lexer::lex};

pub const PROMPT: &str = ">> ";

/// Runs the loop until `input` is exhausted or an empty line is entered.
///
/// Every token of a line is written on its own line, the terminal `EOF` or
/// `ILLEGAL` token included.
pub fn start<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<(), Error> {
    let mut line = String::new();

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            debug!("end of input");
            return Ok(());
        }

        let source = line.trim_end_matches(['\n', '\r']);
        if source.is_empty() {
            debug!("empty line");
            return Ok(());
        }

        for token in lex(source) {
            writeln!(output, "{}", token)?;
        }
    }
}
