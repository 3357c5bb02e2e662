use std::io::Write;
use std::path::PathBuf;

use esparse::{print_parsed, run, Cli, CliError};
use esparse_parser::ast::Stmt;
use esparse_parser::ParseError;
use tempfile::NamedTempFile;

fn source_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn cli(file: PathBuf) -> Cli {
    Cli {
        file,
        dump: false,
        max_depth: 256,
        quiet: false,
        verbose: 0,
    }
}

#[test]
fn parses_file_from_disk() {
    let file = source_file("function f(a,b){return a+b;}\nvar r = f(1,2);");
    let parsed = run(&cli(file.path().to_path_buf())).unwrap();
    assert!(matches!(
        parsed.program.body.as_slice(),
        [Stmt::FnDeclaration(_), Stmt::Var(_)]
    ));
}

#[test]
fn byte_order_mark_is_ignored() {
    let file = source_file("\u{feff}var a = 1");
    assert!(run(&cli(file.path().to_path_buf())).is_ok());
}

#[test]
fn dump_and_summary() {
    let file = source_file("x = 1;");
    let mut cli = cli(file.path().to_path_buf());
    cli.dump = true;
    let parsed = run(&cli).unwrap();

    let mut out = Vec::new();
    print_parsed(&cli, &parsed, &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("Program\n  ExprStmt\n    Assign =\n"), "{}", out);
    assert!(out.contains("(1 top-level elements)"), "{}", out);

    cli.quiet = true;
    cli.dump = false;
    let mut out = Vec::new();
    print_parsed(&cli, &parsed, &mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn syntax_error_exit_code() {
    let file = source_file("var = ;");
    let err = run(&cli(file.path().to_path_buf())).unwrap_err();
    assert_eq!(err.exit_code(), 1);
    match err {
        CliError::Parse { err, .. } => {
            assert!(matches!(err, ParseError::Syntax { line: 1, .. }))
        }
        err => panic!("expected a parse error, got {:?}", err),
    }
}

#[test]
fn lex_error_exit_code() {
    let file = source_file("x = /unterminated");
    let err = run(&cli(file.path().to_path_buf())).unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(matches!(
        err,
        CliError::Parse {
            err: ParseError::Lex { .. },
            ..
        }
    ));
}

#[test]
fn max_depth_flag_is_honoured() {
    let file = source_file(&format!("{}a{};", "[".repeat(40), "]".repeat(40)));
    let mut cli = cli(file.path().to_path_buf());
    assert!(run(&cli).is_ok());

    cli.max_depth = 16;
    let err = run(&cli).unwrap_err();
    assert!(matches!(
        err,
        CliError::Parse {
            err: ParseError::DepthLimitExceeded { limit: 16, .. },
            ..
        }
    ));
}

#[test]
fn missing_file_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let err = run(&cli(dir.path().join("missing.js"))).unwrap_err();
    assert!(matches!(err, CliError::Io { .. }));
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("missing.js"));
}
