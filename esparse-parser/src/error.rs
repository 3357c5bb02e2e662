//! Parse error taxonomy.

use crate::lexer::TokenKind;
use thiserror::Error;

/// Lexical error categories. Also the error type of the logos lexers.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    #[error("unexpected character")]
    UnexpectedCharacter,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("invalid escape sequence in string literal")]
    InvalidEscape,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("unterminated regular expression literal")]
    UnterminatedRegex,
    #[error("invalid numeric literal")]
    InvalidNumber,
}

/// Any error that aborts a parse. There is no partial output.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("{kind} `{text}` at line {line}, column {column}")]
    Lex {
        kind: LexErrorKind,
        text: String,
        line: u32,
        column: u32,
        offset: usize,
    },
    #[error("unexpected {} at line {line}, column {column}", describe_token(.token, .text))]
    Syntax {
        token: TokenKind,
        text: String,
        line: u32,
        column: u32,
        offset: usize,
    },
    #[error("nesting depth limit of {limit} exceeded at line {line}, column {column}")]
    DepthLimitExceeded {
        limit: usize,
        line: u32,
        column: u32,
        offset: usize,
    },
}

fn describe_token(token: &TokenKind, text: &str) -> String {
    match token {
        TokenKind::Eof => "end of input".to_string(),
        TokenKind::SyntheticSemicolon => "end of statement".to_string(),
        _ => format!("token `{}`", text),
    }
}

impl ParseError {
    pub fn line(&self) -> u32 {
        match self {
            ParseError::Lex { line, .. }
            | ParseError::Syntax { line, .. }
            | ParseError::DepthLimitExceeded { line, .. } => *line,
        }
    }

    pub fn column(&self) -> u32 {
        match self {
            ParseError::Lex { column, .. }
            | ParseError::Syntax { column, .. }
            | ParseError::DepthLimitExceeded { column, .. } => *column,
        }
    }

    /// Byte offset of the offending text in the source.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::Lex { offset, .. }
            | ParseError::Syntax { offset, .. }
            | ParseError::DepthLimitExceeded { offset, .. } => *offset,
        }
    }

    /// Length in bytes of the offending text (at least 1, for labelling).
    pub fn len(&self) -> usize {
        match self {
            ParseError::Lex { text, .. } | ParseError::Syntax { text, .. } => text.len().max(1),
            ParseError::DepthLimitExceeded { .. } => 1,
        }
    }

    /// Short category name used in diagnostics.
    pub fn category(&self) -> &'static str {
        match self {
            ParseError::Lex { .. } => "lex error",
            ParseError::Syntax { .. } => "syntax error",
            ParseError::DepthLimitExceeded { .. } => "nesting too deep",
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
