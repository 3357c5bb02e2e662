//! Automatic semicolon insertion.
//!
//! [`TokenStream`] is the only token source the grammar sees. It inserts a `;` in two
//! situations:
//! - after `continue`, `break`, `return` or `throw` when a line terminator follows
//!   (these statements cannot continue on the next line);
//! - on request, when the grammar expects a `;` and finds an offending token that is
//!   `}`, the end of input, or preceded by a line terminator
//!   (see [`TokenStream::insert_semicolon`]).

use crate::error::ParseResult;
use crate::lexer::{ScannedComment, Scanner, Token, TokenKind};

pub struct TokenStream<'a> {
    scanner: Scanner<'a>,
    /// Kind of the last token handed out.
    previous: Option<TokenKind>,
    /// Kind of the token handed out before `previous`.
    before_previous: Option<TokenKind>,
    /// A token to replay after a synthetic `;`.
    requeued: Option<Token<'a>>,
}

impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            scanner: Scanner::new(source),
            previous: None,
            before_previous: None,
            requeued: None,
        }
    }

    /// Returns the next token for the grammar.
    pub fn token(&mut self) -> ParseResult<Token<'a>> {
        if let Some(token) = self.requeued.take() {
            return Ok(self.emit(token));
        }

        let token = self.scanner.next_token()?;
        if token.newline_before && self.restricted_production_ended() {
            tracing::debug!(line = token.line, "inserted semicolon after restricted keyword");
            self.requeued = Some(token);
            return Ok(self.emit(Token::synthetic_semicolon(&token)));
        }
        Ok(self.emit(token))
    }

    /// Asks whether a `;` may be inserted before `offending`, the token the grammar could not
    /// accept where it expected a `;`. If so, `offending` is queued for re-delivery and the
    /// synthetic `;` is returned.
    pub fn insert_semicolon(&mut self, offending: Token<'a>) -> Option<Token<'a>> {
        let allowed = offending.newline_before
            || matches!(offending.kind, TokenKind::CloseBrace | TokenKind::Eof);
        if !allowed {
            return None;
        }
        debug_assert!(self.requeued.is_none());
        tracing::debug!(
            line = offending.line,
            column = offending.column,
            "inserted semicolon before `{}`",
            offending.kind
        );
        self.requeued = Some(offending);
        Some(Token::synthetic_semicolon(&offending))
    }

    /// Rescans `slash`, the last token handed out, as a regular expression literal.
    pub fn scan_regex_literal(&mut self, slash: Token<'a>) -> ParseResult<Token<'a>> {
        let token = self.scanner.scan_regex_literal(slash)?;
        self.previous = Some(token.kind);
        Ok(token)
    }

    /// Drains the comments scanned so far.
    pub fn take_comments(&mut self) -> Vec<ScannedComment<'a>> {
        self.scanner.take_comments()
    }

    fn emit(&mut self, token: Token<'a>) -> Token<'a> {
        self.before_previous = self.previous;
        self.previous = Some(token.kind);
        token
    }

    /// `continue`, `break`, `return` or `throw` was just handed out as a keyword
    /// (not as a property name after `.`).
    fn restricted_production_ended(&self) -> bool {
        matches!(
            self.previous,
            Some(TokenKind::Continue | TokenKind::Break | TokenKind::Return | TokenKind::Throw)
        ) && self.before_previous != Some(TokenKind::Dot)
    }
}
