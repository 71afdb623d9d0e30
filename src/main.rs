use std::{
    env,
    fs::read_to_string,
    io::{self, Write},
    process::ExitCode,
    sync::Once,
};

use monkey::{display_error, lexer::lexer::tokenize, repl};
use tracing::debug;

const EXIT_SUCCESS: u8 = 0;
const EXIT_FAILURE: u8 = 1;
const EXIT_USAGE: u8 = 2;

static TRACING_INIT: Once = Once::new();

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr).with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();

    let status = match args.as_slice() {
        [] => run_repl(),
        [file_path] => run_file(file_path, io::stdout().lock(), io::stderr().lock()),
        _ => usage(io::stderr().lock()),
    };

    ExitCode::from(status)
}

fn usage<E: Write>(mut err: E) -> u8 {
    let _ = writeln!(err, "usage: monkey [FILE]");
    EXIT_USAGE
}

fn run_repl() -> u8 {
    let user = env::var("USER").unwrap_or_else(|_| String::from("there"));
    println!("Hello {}! This is the Monkey programming language!", user);
    println!("Feel free to type in commands");

    let stdin = io::stdin();
    match repl::start(stdin.lock(), io::stdout()) {
        Ok(()) => EXIT_SUCCESS,
        Err(error) => {
            eprintln!("{}", error);
            EXIT_FAILURE
        }
    }
}

fn run_file<W: Write, E: Write>(file_path: &str, out: W, mut err: E) -> u8 {
    let file_name = file_path.rsplit('/').next().unwrap_or(file_path);

    match read_to_string(file_path) {
        Ok(source) => run_source(&source, file_name, out, err),
        Err(error) => {
            let _ = writeln!(err, "Failed to read {}: {}", file_path, error);
            EXIT_FAILURE
        }
    }
}

/// Prints every token of `source` to `out`, or the diagnostic for its first
/// illegal character to `err`.
fn run_source<W: Write, E: Write>(source: &str, file_name: &str, mut out: W, mut err: E) -> u8 {
    debug!(file = file_name, bytes = source.len(), "tokenizing");

    let tokens = match tokenize(source) {
        Ok(tokens) => tokens,
        Err(error) => {
            let _ = write!(err, "{}", display_error(&error, source, file_name));
            return EXIT_FAILURE;
        }
    };

    for token in &tokens {
        if writeln!(out, "{}", token).is_err() {
            return EXIT_FAILURE;
        }
    }

    debug!(count = tokens.len(), "tokenized");
    EXIT_SUCCESS
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{run_file, run_source, usage, EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE};

    fn run(source: &str) -> (u8, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = run_source(source, "main.mk", &mut out, &mut err);

        (
            status,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_run_source_prints_tokens() {
        let (status, out, err) = run("x != 1;");

        assert_eq!(status, EXIT_SUCCESS);
        assert_eq!(
            out,
            "{Type:IDENT Literal:x}\n\
             {Type:NOT_EQ Literal:!=}\n\
             {Type:INT Literal:1}\n\
             {Type:SEMICOLON Literal:;}\n\
             {Type:EOF Literal:}\n"
        );
        assert_eq!(err, "");
    }

    #[test]
    fn test_run_source_reports_illegal_character() {
        let (status, out, err) = run("let a = @;");

        assert_eq!(status, EXIT_FAILURE);
        assert_eq!(out, "");
        assert_eq!(
            err,
            "Error: UnrecognisedToken\n-> main.mk\n  |\n1 | let a = @;\n  | --------^\n"
        );
    }

    #[test]
    fn test_run_file_missing() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = run_file("does/not/exist.mk", &mut out, &mut err);

        assert_eq!(status, EXIT_FAILURE);
        assert!(out.is_empty());
        assert!(String::from_utf8(err)
            .unwrap()
            .starts_with("Failed to read does/not/exist.mk: "));
    }

    #[test]
    fn test_run_file_reads_source() {
        let path = std::env::temp_dir().join(format!("monkey-run-file-{}.mk", std::process::id()));
        std::fs::write(&path, "let x = 5;\n").unwrap();

        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = run_file(path.to_str().unwrap(), &mut out, &mut err);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(status, EXIT_SUCCESS);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 6);
        assert!(err.is_empty());
    }

    #[test]
    fn test_usage() {
        let mut err = Vec::new();

        assert_eq!(usage(&mut err), EXIT_USAGE);
        assert_eq!(String::from_utf8(err).unwrap(), "usage: monkey [FILE]\n");
    }
}
