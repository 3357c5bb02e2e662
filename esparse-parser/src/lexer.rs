//! Token scanner.
//!
//! Line terminators and comments never reach the grammar: they are folded into the
//! [`Token::newline_before`] flag of the next real token. A `/` is always scanned as a
//! divide punctuator; the grammar asks for [`Scanner::scan_regex_literal`] at positions
//! where a regular expression literal may start.

use crate::ast::CommentKind;
use crate::error::{LexErrorKind, ParseError, ParseResult};
use logos::{Lexer, Logos};
use std::{fmt, mem};

#[derive(Debug, Logos, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\x{0B}\x{0C}\x{A0}\x{FEFF}\x{1680}\x{2000}-\x{200A}\x{202F}\x{205F}\x{3000}]+")]
pub enum TokenKind {
    // literals
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xX][0-9a-fA-F]+")]
    NumberLit,
    #[token("\"", string_literal)]
    #[token("'", string_literal)]
    StringLit,
    /// Only produced by [`Scanner::scan_regex_literal`].
    RegexLit,

    // identifiers
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Identifier,

    // keywords
    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("catch")]
    Catch,
    #[token("continue")]
    Continue,
    #[token("debugger")]
    Debugger,
    #[token("default")]
    Default,
    #[token("delete")]
    Delete,
    #[token("do")]
    Do,
    #[token("else")]
    Else,
    #[token("finally")]
    Finally,
    #[token("for")]
    For,
    #[token("function")]
    Function,
    #[token("if")]
    If,
    #[token("in")]
    In,
    #[token("instanceof")]
    Instanceof,
    #[token("new")]
    New,
    #[token("return")]
    Return,
    #[token("switch")]
    Switch,
    #[token("this")]
    This,
    #[token("throw")]
    Throw,
    #[token("try")]
    Try,
    #[token("typeof")]
    Typeof,
    #[token("var")]
    Var,
    #[token("void")]
    Void,
    #[token("while")]
    While,
    #[token("with")]
    With,
    #[token("null")]
    Null,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // punctuation
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token(".")]
    Dot,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    // unary operators
    #[token("!")]
    LogicalNot,
    #[token("~")]
    Tilde,
    #[token("++")]
    Increment,
    #[token("--")]
    Decrement,

    // binary operators
    // - arithmetics
    #[token("+")]
    Plus,
    #[token("-")]
    Minus, // NOTE: can also be unary
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash, // NOTE: can also start a regex literal
    #[token("%")]
    Percent,
    // - shifts
    #[token("<<")]
    ShiftLeft,
    #[token(">>")]
    ShiftRight,
    #[token(">>>")]
    UnsignedShiftRight,
    // - ordering
    #[token("<")]
    LessThan,
    #[token(">")]
    GreaterThan,
    #[token("<=")]
    LessThanEquals,
    #[token(">=")]
    GreaterThanEquals,
    // - equality
    #[token("==")]
    EqualsEquals,
    #[token("!=")]
    NotEquals,
    #[token("===")]
    StrictEquals,
    #[token("!==")]
    StrictNotEquals,
    // - bitwise and logical
    #[token("&")]
    Ampersand,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("&&")]
    LogicalAnd,
    #[token("||")]
    LogicalOr,
    // - assignment
    #[token("=")]
    Equals,
    #[token("+=")]
    PlusEquals,
    #[token("-=")]
    MinusEquals,
    #[token("*=")]
    AsteriskEquals,
    #[token("/=")]
    SlashEquals,
    #[token("%=")]
    PercentEquals,
    #[token("<<=")]
    ShiftLeftEquals,
    #[token(">>=")]
    ShiftRightEquals,
    #[token(">>>=")]
    UnsignedShiftRightEquals,
    #[token("&=")]
    AmpersandEquals,
    #[token("|=")]
    PipeEquals,
    #[token("^=")]
    CaretEquals,

    // trivia, consumed by the scanner
    #[regex(r"[\n\r\x{2028}\x{2029}]+")]
    LineBreak,
    #[regex(r"//[^\n\r\x{2028}\x{2029}]*")]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,

    // synthetic
    /// `;` inserted by automatic semicolon insertion.
    SyntheticSemicolon,
    /// `++` with a line terminator before it. Never a postfix operator.
    RestrictedIncrement,
    /// `--` with a line terminator before it. Never a postfix operator.
    RestrictedDecrement,
    /// Only generated when the underlying lexer is exhausted.
    Eof,
}

/// Future reserved words. These still scan as identifiers.
const FUTURE_RESERVED_WORDS: &[&str] = &[
    "class",
    "const",
    "enum",
    "export",
    "extends",
    "import",
    "super",
    "implements",
    "interface",
    "let",
    "package",
    "private",
    "protected",
    "public",
    "static",
    "yield",
];

fn string_literal(lex: &mut Lexer<TokenKind>) -> Result<(), LexErrorKind> {
    let quote = if lex.slice() == "'" { '\'' } else { '"' };
    let mut result = Ok(());
    let mut chars = lex.remainder().char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, 'x')) => {
                    for _ in 0..2 {
                        if chars.next_if(|(_, c)| c.is_ascii_hexdigit()).is_none() {
                            result = Err(LexErrorKind::InvalidEscape);
                        }
                    }
                }
                Some((_, 'u')) => {
                    for _ in 0..4 {
                        if chars.next_if(|(_, c)| c.is_ascii_hexdigit()).is_none() {
                            result = Err(LexErrorKind::InvalidEscape);
                        }
                    }
                }
                // line continuation
                Some((_, '\r')) => {
                    chars.next_if(|(_, c)| *c == '\n');
                }
                Some(_) => {}
                None => break,
            },
            '\n' | '\r' | '\u{2028}' | '\u{2029}' => {
                lex.bump(idx);
                return Err(LexErrorKind::UnterminatedString);
            }
            c if c == quote => {
                lex.bump(idx + 1);
                return result;
            }
            _ => {}
        }
    }
    lex.bump(lex.remainder().len());
    Err(LexErrorKind::UnterminatedString)
}

fn block_comment(lex: &mut Lexer<TokenKind>) -> Result<(), LexErrorKind> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => {
            lex.bump(lex.remainder().len());
            Err(LexErrorKind::UnterminatedComment)
        }
    }
}

/// Tokens of the regular expression sub-state.
#[derive(Debug, Logos, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
enum RegexPart {
    /// Anything but a line terminator, unescaped `/` or an unclosed `[`.
    /// `/` is legal inside a class.
    #[regex(r"([^\n\r\x{2028}\x{2029}\[\\/]|\\[^\n\r\x{2028}\x{2029}]|\[([^\n\r\x{2028}\x{2029}\]\\]|\\[^\n\r\x{2028}\x{2029}])*\])+")]
    Body,
    /// Closing `/` and flags.
    #[regex(r"/[a-zA-Z0-9_$]*")]
    End,
}

impl TokenKind {
    /// Returns the binary binding power or `None` if invalid binop token.
    /// Every binary operator is left associative. Assignment and `?:` are not handled here.
    pub fn binop_bp(&self) -> Option<(u8, u8)> {
        match self {
            /* Logical or */
            TokenKind::LogicalOr => Some((2, 3)),
            /* Logical and */
            TokenKind::LogicalAnd => Some((4, 5)),
            /* Bitwise */
            TokenKind::Pipe => Some((6, 7)),
            TokenKind::Caret => Some((8, 9)),
            TokenKind::Ampersand => Some((10, 11)),
            /* Equality */
            TokenKind::EqualsEquals
            | TokenKind::NotEquals
            | TokenKind::StrictEquals
            | TokenKind::StrictNotEquals => Some((12, 13)),
            /* Relational */
            TokenKind::LessThan
            | TokenKind::GreaterThan
            | TokenKind::LessThanEquals
            | TokenKind::GreaterThanEquals
            | TokenKind::Instanceof
            | TokenKind::In => Some((14, 15)),
            /* Shift */
            TokenKind::ShiftLeft | TokenKind::ShiftRight | TokenKind::UnsignedShiftRight => {
                Some((16, 17))
            }
            /* Additive */
            TokenKind::Plus | TokenKind::Minus => Some((18, 19)),
            /* Multiplicative */
            TokenKind::Asterisk | TokenKind::Slash | TokenKind::Percent => Some((20, 21)),
            _ => None,
        }
    }

    /// Tokens that begin a prefix unary expression.
    pub fn is_prefix_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Delete
                | TokenKind::Void
                | TokenKind::Typeof
                | TokenKind::Increment
                | TokenKind::Decrement
                | TokenKind::RestrictedIncrement
                | TokenKind::RestrictedDecrement
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Tilde
                | TokenKind::LogicalNot
        )
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Break
                | TokenKind::Case
                | TokenKind::Catch
                | TokenKind::Continue
                | TokenKind::Debugger
                | TokenKind::Default
                | TokenKind::Delete
                | TokenKind::Do
                | TokenKind::Else
                | TokenKind::Finally
                | TokenKind::For
                | TokenKind::Function
                | TokenKind::If
                | TokenKind::In
                | TokenKind::Instanceof
                | TokenKind::New
                | TokenKind::Return
                | TokenKind::Switch
                | TokenKind::This
                | TokenKind::Throw
                | TokenKind::Try
                | TokenKind::Typeof
                | TokenKind::Var
                | TokenKind::Void
                | TokenKind::While
                | TokenKind::With
                | TokenKind::Null
                | TokenKind::True
                | TokenKind::False
        )
    }

    /// An `IdentifierName`: identifiers and every reserved word.
    /// Legal after `.` and as an object literal key.
    pub fn is_identifier_name(&self) -> bool {
        *self == TokenKind::Identifier || self.is_keyword()
    }

    /// Human readable name, used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::NumberLit => "number",
            TokenKind::StringLit => "string",
            TokenKind::RegexLit => "regular expression",
            TokenKind::Identifier => "identifier",
            TokenKind::Break => "break",
            TokenKind::Case => "case",
            TokenKind::Catch => "catch",
            TokenKind::Continue => "continue",
            TokenKind::Debugger => "debugger",
            TokenKind::Default => "default",
            TokenKind::Delete => "delete",
            TokenKind::Do => "do",
            TokenKind::Else => "else",
            TokenKind::Finally => "finally",
            TokenKind::For => "for",
            TokenKind::Function => "function",
            TokenKind::If => "if",
            TokenKind::In => "in",
            TokenKind::Instanceof => "instanceof",
            TokenKind::New => "new",
            TokenKind::Return => "return",
            TokenKind::Switch => "switch",
            TokenKind::This => "this",
            TokenKind::Throw => "throw",
            TokenKind::Try => "try",
            TokenKind::Typeof => "typeof",
            TokenKind::Var => "var",
            TokenKind::Void => "void",
            TokenKind::While => "while",
            TokenKind::With => "with",
            TokenKind::Null => "null",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::OpenBrace => "{",
            TokenKind::CloseBrace => "}",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::Dot => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Question => "?",
            TokenKind::Colon => ":",
            TokenKind::LogicalNot => "!",
            TokenKind::Tilde => "~",
            TokenKind::Increment | TokenKind::RestrictedIncrement => "++",
            TokenKind::Decrement | TokenKind::RestrictedDecrement => "--",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::ShiftLeft => "<<",
            TokenKind::ShiftRight => ">>",
            TokenKind::UnsignedShiftRight => ">>>",
            TokenKind::LessThan => "<",
            TokenKind::GreaterThan => ">",
            TokenKind::LessThanEquals => "<=",
            TokenKind::GreaterThanEquals => ">=",
            TokenKind::EqualsEquals => "==",
            TokenKind::NotEquals => "!=",
            TokenKind::StrictEquals => "===",
            TokenKind::StrictNotEquals => "!==",
            TokenKind::Ampersand => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::LogicalAnd => "&&",
            TokenKind::LogicalOr => "||",
            TokenKind::Equals => "=",
            TokenKind::PlusEquals => "+=",
            TokenKind::MinusEquals => "-=",
            TokenKind::AsteriskEquals => "*=",
            TokenKind::SlashEquals => "/=",
            TokenKind::PercentEquals => "%=",
            TokenKind::ShiftLeftEquals => "<<=",
            TokenKind::ShiftRightEquals => ">>=",
            TokenKind::UnsignedShiftRightEquals => ">>>=",
            TokenKind::AmpersandEquals => "&=",
            TokenKind::PipeEquals => "|=",
            TokenKind::CaretEquals => "^=",
            TokenKind::LineBreak => "line break",
            TokenKind::LineComment | TokenKind::BlockComment => "comment",
            TokenKind::SyntheticSemicolon => "inserted semicolon",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified slice of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
    /// 1-based line.
    pub line: u32,
    /// 1-based column, in characters.
    pub column: u32,
    /// A line terminator (or a block comment spanning one) separates this token from the
    /// previous real token.
    pub newline_before: bool,
}

impl<'a> Token<'a> {
    /// Byte offset one past the last character.
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// A zero-width `;` placed just before `at`.
    pub fn synthetic_semicolon(at: &Token<'a>) -> Self {
        Self {
            kind: TokenKind::SyntheticSemicolon,
            text: "",
            start: at.start,
            line: at.line,
            column: at.column,
            newline_before: at.newline_before,
        }
    }
}

/// A comment seen by the scanner, waiting to be claimed by the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedComment<'a> {
    pub kind: CommentKind,
    /// Comment text without the delimiters.
    pub text: &'a str,
    pub start: usize,
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_identifier_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Converts source text into [`Token`]s on demand.
pub struct Scanner<'a> {
    source: &'a str,
    lexer: Lexer<'a, TokenKind>,
    /// Current line (1-based).
    line: u32,
    /// Byte offset at which the current line starts.
    line_start: usize,
    /// Comments scanned since the last call to [`Scanner::take_comments`].
    comments: Vec<ScannedComment<'a>>,
    finished: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            lexer: TokenKind::lexer(source),
            line: 1,
            line_start: 0,
            comments: Vec::new(),
            finished: false,
        }
    }

    /// Scans the next real token. Returns a [`TokenKind::Eof`] token at the end of input.
    pub fn next_token(&mut self) -> ParseResult<Token<'a>> {
        let mut newline_before = false;
        loop {
            let result = match self.lexer.next() {
                Some(result) => result,
                None => {
                    return Ok(self.token(TokenKind::Eof, self.source.len(), newline_before));
                }
            };
            let span = self.lexer.span();
            let kind = match result {
                Ok(kind) => kind,
                Err(kind) => return Err(self.error(kind, span.start, self.lexer.slice())),
            };

            match kind {
                TokenKind::LineBreak => {
                    self.advance_lines(span.start, span.end);
                    newline_before = true;
                }
                TokenKind::LineComment => self.comments.push(ScannedComment {
                    kind: CommentKind::Line,
                    text: &self.source[span.start + 2..span.end],
                    start: span.start,
                }),
                TokenKind::BlockComment => {
                    if self.advance_lines(span.start, span.end) {
                        newline_before = true;
                    }
                    self.comments.push(ScannedComment {
                        kind: CommentKind::Block,
                        text: &self.source[span.start + 2..span.end - 2],
                        start: span.start,
                    });
                }
                TokenKind::Increment if newline_before => {
                    return Ok(self.token(TokenKind::RestrictedIncrement, span.start, true));
                }
                TokenKind::Decrement if newline_before => {
                    return Ok(self.token(TokenKind::RestrictedDecrement, span.start, true));
                }
                TokenKind::NumberLit => {
                    // a numeral cannot run into an identifier (`3in`, `0x`)
                    let rest = self.lexer.remainder();
                    let tail = rest
                        .find(|c: char| !is_identifier_part(c))
                        .unwrap_or(rest.len());
                    if tail > 0 {
                        let text = &self.source[span.start..span.end + tail];
                        return Err(self.error(LexErrorKind::InvalidNumber, span.start, text));
                    }
                    return Ok(self.token(kind, span.start, newline_before));
                }
                TokenKind::StringLit => {
                    // line continuations
                    let token = self.token(kind, span.start, newline_before);
                    self.advance_lines(span.start, span.end);
                    return Ok(token);
                }
                TokenKind::Identifier => {
                    let text = self.lexer.slice();
                    if FUTURE_RESERVED_WORDS.contains(&text) {
                        tracing::warn!(
                            line = self.line,
                            "the identifier `{}` is a future reserved word",
                            text
                        );
                    }
                    return Ok(self.token(kind, span.start, newline_before));
                }
                _ => return Ok(self.token(kind, span.start, newline_before)),
            }
        }
    }

    /// Rescans the `/` or `/=` token `slash` as the start of a regular expression literal.
    /// Scanning continues after the literal's flags.
    pub fn scan_regex_literal(&mut self, slash: Token<'a>) -> ParseResult<Token<'a>> {
        debug_assert!(matches!(slash.kind, TokenKind::Slash | TokenKind::SlashEquals));
        let mut regex = self.regex_mode(slash.start + 1);

        let end = match (regex.next(), regex.next()) {
            (Some(Ok(RegexPart::Body)), Some(Ok(RegexPart::End))) => regex.span().end,
            _ => {
                let rest = &self.source[slash.start..];
                let len = rest.find(is_line_terminator).unwrap_or(rest.len());
                return Err(ParseError::Lex {
                    kind: LexErrorKind::UnterminatedRegex,
                    text: rest[..len].to_string(),
                    line: slash.line,
                    column: slash.column,
                    offset: slash.start,
                });
            }
        };
        self.normal_mode(end);

        tracing::debug!(line = slash.line, "rescanned `/` as a regular expression literal");
        Ok(Token {
            kind: TokenKind::RegexLit,
            text: &self.source[slash.start..end],
            ..slash
        })
    }

    /// Drains the comments scanned so far, in source order.
    pub fn take_comments(&mut self) -> Vec<ScannedComment<'a>> {
        mem::take(&mut self.comments)
    }

    /// A regex sub-state lexer positioned at `offset`.
    fn regex_mode(&self, offset: usize) -> Lexer<'a, RegexPart> {
        let mut lexer = RegexPart::lexer(self.source);
        lexer.bump(offset);
        lexer
    }

    /// Resumes normal scanning at `offset`.
    fn normal_mode(&mut self, offset: usize) {
        let mut lexer = TokenKind::lexer(self.source);
        lexer.bump(offset);
        self.lexer = lexer;
    }

    fn token(&self, kind: TokenKind, start: usize, newline_before: bool) -> Token<'a> {
        let text = if kind == TokenKind::Eof {
            ""
        } else {
            self.lexer.slice()
        };
        let token = Token {
            kind,
            text,
            start,
            line: self.line,
            column: self.column(start),
            newline_before,
        };
        tracing::trace!(?kind, text, line = token.line, "scanned token");
        token
    }

    fn error(&self, kind: LexErrorKind, start: usize, text: &str) -> ParseError {
        ParseError::Lex {
            kind,
            text: text.to_string(),
            line: self.line,
            column: self.column(start),
            offset: start,
        }
    }

    fn column(&self, offset: usize) -> u32 {
        self.source[self.line_start..offset].chars().count() as u32 + 1
    }

    /// Counts the line terminators in `start..end` (`\r\n` counts once).
    /// Returns `true` if there was at least one.
    fn advance_lines(&mut self, start: usize, end: usize) -> bool {
        let mut found = false;
        let mut chars = self.source[start..end].char_indices().peekable();
        while let Some((idx, ch)) = chars.next() {
            if !is_line_terminator(ch) {
                continue;
            }
            if ch == '\r' && chars.peek().map(|(_, c)| *c) == Some('\n') {
                continue;
            }
            found = true;
            self.line += 1;
            self.line_start = start + idx + ch.len_utf8();
        }
        found
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = ParseResult<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => {
                self.finished = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
