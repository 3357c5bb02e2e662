//! Error rendering.

use crate::CliError;
use esparse_parser::ParseError;
use std::io::{self, Write};

/// Renders a parse error against the text it came from, as a labelled source report.
pub fn render_parse_error(
    name: &str,
    content: &str,
    err: &ParseError,
    color: bool,
    out: &mut impl Write,
) -> io::Result<()> {
    use ariadne::{Config, Label, Report, ReportKind, Source};

    // ariadne spans count characters, not bytes; errors at end of input label the last one
    let total = content.chars().count();
    let start = char_index(content, err.offset()).min(total.saturating_sub(1));
    let end = char_index(content, err.offset() + err.len()).clamp(start + 1, total.max(start + 1));

    Report::build(ReportKind::Error, (), start)
        .with_config(Config::default().with_color(color))
        .with_message(format!("{} in {}", err.category(), name))
        .with_label(Label::new(start..end).with_message(err.to_string()))
        .finish()
        .write(Source::from(content), out)
}

/// Reports `err` on stderr.
pub fn report(err: &CliError) {
    let stderr = io::stderr();
    let mut stderr = stderr.lock();
    let rendered = match err {
        CliError::Parse { file, err } => {
            let position = file.as_source().position(err.offset());
            let _ = writeln!(stderr, "error: {}:{}", file.name(), position);
            let color = console::colors_enabled_stderr();
            render_parse_error(file.name(), file.content(), err, color, &mut stderr)
        }
        CliError::Io { .. } => writeln!(stderr, "error: {}", err),
    };
    if let Err(io_err) = rendered {
        tracing::error!("failed to write diagnostics: {}", io_err);
    }
}

fn char_index(content: &str, byte_offset: usize) -> usize {
    let mut offset = byte_offset.min(content.len());
    while !content.is_char_boundary(offset) {
        offset -= 1;
    }
    content[..offset].chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use esparse_parser::parse;

    fn render(source: &str) -> String {
        let err = parse(source).unwrap_err();
        let mut out = Vec::new();
        render_parse_error("test.js", source, &err, false, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn renders_syntax_error_with_source_line() {
        let report = render("var = ;");
        assert!(report.contains("syntax error in test.js"), "{}", report);
        assert!(report.contains("var = ;"), "{}", report);
        assert!(report.contains("unexpected token `=`"), "{}", report);
    }

    #[test]
    fn renders_error_at_end_of_input() {
        let report = render("f(");
        assert!(report.contains("unexpected end of input"), "{}", report);
    }

    #[test]
    fn char_index_counts_characters() {
        assert_eq!(char_index("é = 1", 3), 2);
        assert_eq!(char_index("é", 1), 0);
        assert_eq!(char_index("ab", 10), 2);
    }
}
