//! Source code representation and loading.

use std::{fmt, fs, io, path::Path};

/// Represents source code.
#[derive(Debug, Clone, Copy)]
pub struct Source<'a> {
    /// Name used in diagnostics (usually a file path).
    pub name: &'a str,
    /// Original source code.
    pub content: &'a str,
}

impl<'a> Source<'a> {
    /// Create a new anonymous `Source` holding `content`.
    pub fn new(content: &'a str) -> Self {
        Self {
            name: "<input>",
            content,
        }
    }

    /// Create a new `Source` with a display `name`.
    pub fn named(name: &'a str, content: &'a str) -> Self {
        Self { name, content }
    }

    /// Returns the 1-based line and column of the byte `offset`.
    /// Columns count characters, not bytes. Offsets past the end clamp to the end of input.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.content.len());
        let mut line = 1;
        let mut line_start = 0;
        let mut chars = self.content[..offset].char_indices().peekable();
        while let Some((idx, ch)) = chars.next() {
            let is_break = match ch {
                '\n' | '\u{2028}' | '\u{2029}' => true,
                '\r' => !matches!(chars.peek(), Some((_, '\n'))),
                _ => false,
            };
            if is_break {
                line += 1;
                line_start = idx + ch.len_utf8();
            }
        }
        Position {
            line,
            column: self.content[line_start..offset].chars().count() as u32 + 1,
        }
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new(content)
    }
}

/// A 1-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Source text read whole from disk.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    content: String,
}

impl SourceFile {
    /// Reads the whole file at `path`. A leading byte order mark is dropped.
    pub fn read(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let content = match content.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => content,
        };
        Ok(Self {
            name: path.display().to_string(),
            content,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Borrows the file as a [`Source`].
    pub fn as_source(&self) -> Source<'_> {
        Source::named(&self.name, &self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn position_counts_lines_and_chars() {
        let source: Source = "ab\ncd\r\nef\rg\u{2028}é!".into();
        assert_eq!(source.position(0), Position { line: 1, column: 1 });
        assert_eq!(source.position(4), Position { line: 2, column: 2 });
        assert_eq!(source.position(7), Position { line: 3, column: 1 });
        assert_eq!(source.position(10), Position { line: 4, column: 1 });
        // `!` sits after a two-byte `é`
        let bang = source.content.find('!').unwrap();
        assert_eq!(source.position(bang), Position { line: 5, column: 2 });
    }

    #[test]
    fn position_clamps_past_end() {
        let source = Source::new("x");
        assert_eq!(source.position(100), Position { line: 1, column: 2 });
    }

    #[test]
    fn read_strips_bom() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\u{feff}var a;").unwrap();
        let source_file = SourceFile::read(file.path()).unwrap();
        assert_eq!(source_file.content(), "var a;");
        assert_eq!(source_file.as_source().name, source_file.name());
    }

    #[test]
    fn read_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SourceFile::read(dir.path().join("missing.js")).is_err());
    }
}
