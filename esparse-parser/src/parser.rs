use crate::asi::TokenStream;
use crate::ast::{Comment, Expr, Program, Stmt};
use crate::config::ParserConfig;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Token, TokenKind};
use esparse_source::Source;

mod expr;
mod stmt;

/// Remaining stack below which [`Parser::nested`] switches to a fresh segment.
const STACK_RED_ZONE: usize = 128 * 1024;
/// Size of each stack segment allocated by [`Parser::nested`].
const STACK_GROWTH: usize = 2 * 1024 * 1024;

/// Grammar variant in effect for an expression.
///
/// This is a grammar parameter in the style of the ES2015 `[In]` annotations, not a
/// runtime mode: every production receives its family from its caller and every call
/// site names the family it expands (`Grammar::operand` for non-leading operands,
/// `Grammar::Normal` inside brackets, parentheses and argument lists). `NoIn` and `NoBf`
/// therefore select different rule sets at fixed positions of the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Grammar {
    Normal,
    /// `in` is not a binary operator (initializer clause of a `for` header).
    NoIn,
    /// The expression cannot start with `{` or `function` (expression statements).
    NoBf,
}

impl Grammar {
    fn allows_in(self) -> bool {
        self != Grammar::NoIn
    }

    /// Grammar of a sub-expression that is not at the start of the enclosing one.
    fn operand(self) -> Grammar {
        match self {
            Grammar::NoIn => Grammar::NoIn,
            Grammar::Normal | Grammar::NoBf => Grammar::Normal,
        }
    }
}

pub struct Parser<'a> {
    /// Cached token for peeking.
    current_token: Token<'a>,
    tokens: TokenStream<'a>,
    /// Source code
    source: &'a Source<'a>,
    config: ParserConfig,
    /// Current nesting depth, bounded by [`ParserConfig::max_depth`].
    depth: usize,
    /// Byte offset just past the last consumed real token.
    last_end: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        Self::with_config(source, ParserConfig::default())
    }

    pub fn with_config(source: &'a Source<'a>, config: ParserConfig) -> Self {
        Self {
            current_token: Token {
                kind: TokenKind::Eof,
                text: "",
                start: 0,
                line: 1,
                column: 1,
                newline_before: false,
            },
            tokens: TokenStream::new(source.content),
            source,
            config,
            depth: 0,
            last_end: 0,
        }
    }
}

impl<'a> Parser<'a> {
    /// Parses the whole source. Either the full tree is returned or the first error.
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let _span = tracing::debug_span!("parse_program", source = self.source.name).entered();
        self.next()?; // prime current_token
        let body = self.parse_source_elements(&[TokenKind::Eof])?;
        tracing::debug!(elements = body.len(), "parsed program");
        Ok(Program { body })
    }

    /// Parses source elements (statements, function declarations and comments) until the
    /// current token is one of `terminators`. The terminator is not consumed.
    fn parse_source_elements(&mut self, terminators: &[TokenKind]) -> ParseResult<Vec<Stmt>> {
        let mut body = Vec::new();
        loop {
            self.flush_comments(&mut body);
            if terminators.contains(&self.current_token.kind) {
                break Ok(body);
            }
            body.push(self.parse_source_element()?);
        }
    }

    /// Moves the comments that sit between the last consumed token and the current token
    /// into `body`. Comments buried inside expressions or statements are dropped.
    fn flush_comments(&mut self, body: &mut Vec<Stmt>) {
        let before = self.current_token.start;
        for comment in self.tokens.take_comments() {
            if comment.start >= self.last_end && comment.start < before {
                body.push(Stmt::Comment(Comment {
                    kind: comment.kind,
                    text: comment.text.to_string(),
                }));
            }
        }
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    /// Advances to the next token and returns the consumed one.
    fn next(&mut self) -> ParseResult<Token<'a>> {
        let token = self.current_token;
        if token.kind != TokenKind::SyntheticSemicolon {
            self.last_end = token.end();
        }
        self.current_token = self.tokens.token()?;
        Ok(token)
    }

    /// Predicate that tests whether the current token is `kind` and eats it if yes as a side effect.
    fn eat(&mut self, kind: TokenKind) -> ParseResult<bool> {
        if self.current_token.kind == kind {
            self.next()?; // eat token
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token<'a>> {
        if self.current_token.kind == kind {
            self.next()
        } else {
            Err(self.unexpected())
        }
    }

    /// Ends a statement. Accepts a real or inserted `;`, or asks the ASI layer to insert
    /// one before the current token.
    fn consume_semicolon(&mut self) -> ParseResult<()> {
        match self.current_token.kind {
            TokenKind::Semicolon | TokenKind::SyntheticSemicolon => {
                self.next()?;
                Ok(())
            }
            _ => match self.tokens.insert_semicolon(self.current_token) {
                Some(semicolon) => {
                    self.current_token = semicolon;
                    self.next()?;
                    Ok(())
                }
                None => Err(self.unexpected()),
            },
        }
    }

    /// Runs `f` one nesting level deeper.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= self.config.max_depth {
            let token = self.current_token;
            return Err(ParseError::DepthLimitExceeded {
                limit: self.config.max_depth,
                line: token.line,
                column: token.column,
                offset: token.start,
            });
        }
        self.depth += 1;
        // one depth unit spans several frames (assignment, lhs, primary, literal)
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || f(self));
        self.depth -= 1;
        result
    }

    /// Builds an unexpected token error for the current token.
    fn unexpected(&self) -> ParseError {
        let token = self.current_token;
        ParseError::Syntax {
            token: token.kind,
            text: token.text.to_string(),
            line: token.line,
            column: token.column,
            offset: token.start,
        }
    }
}

/// Parses `source` with the default configuration.
pub fn parse(source: &str) -> ParseResult<Program> {
    let source = Source::new(source);
    Parser::new(&source).parse_program()
}


#[cfg(test)]
mod tests {
    use super::test_utils::*;
    use super::*;
    use crate::ast::{BinaryOp, CommentKind, Function, VarDeclarator};
    use crate::error::LexErrorKind;

    #[test]
    fn test_parse_is_deterministic() {
        let source = "function f(a) { /* x */ return a ? [a, , 1] : { get b() { return 2; } }; }\n\
                      for (var k in o) if (k) continue; else break;";
        assert_eq!(parse(source), parse(source));
    }

    #[test]
    fn test_function_and_call() {
        let program = program("function f(a,b){return a+b;}\nvar r = f(1,2);");
        assert_eq!(
            program.body,
            vec![
                Stmt::FnDeclaration(Function {
                    ident: Some("f".to_string()),
                    params: vec!["a".to_string(), "b".to_string()],
                    body: vec![Stmt::Return(Some(Expr::Binary {
                        lhs: Box::new(Expr::Identifier("a".to_string())),
                        op: BinaryOp::Add,
                        rhs: Box::new(Expr::Identifier("b".to_string())),
                    }))],
                }),
                Stmt::Var(vec![VarDeclarator {
                    ident: "r".to_string(),
                    initializer: Some(Expr::Call {
                        callee: Box::new(Expr::Identifier("f".to_string())),
                        args: vec![Expr::NumberLit(1.0), Expr::NumberLit(2.0)],
                    }),
                }]),
            ]
        );
    }

    #[test]
    fn test_syntax_error_reports_token() {
        let err = parse("var = ;").unwrap_err();
        assert_eq!(
            err,
            ParseError::Syntax {
                token: TokenKind::Equals,
                text: "=".to_string(),
                line: 1,
                column: 5,
                offset: 4,
            }
        );
        assert_eq!(err.to_string(), "unexpected token `=` at line 1, column 5");
    }

    #[test]
    fn test_syntax_error_at_end_of_input() {
        let err = parse("foo(1,\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Syntax { token: TokenKind::Eof, line: 2, .. }
        ));
        assert!(matches!(
            parse("a b").unwrap_err(),
            ParseError::Syntax { token: TokenKind::Identifier, column: 3, .. }
        ));
    }

    #[test]
    fn test_malformed_regex_is_lex_error() {
        assert!(matches!(
            parse("/foo").unwrap_err(),
            ParseError::Lex { kind: LexErrorKind::UnterminatedRegex, line: 1, .. }
        ));
        assert!(matches!(
            parse("x = /foo\n/").unwrap_err(),
            ParseError::Lex { kind: LexErrorKind::UnterminatedRegex, .. }
        ));
    }

    #[test]
    fn test_depth_limit() {
        let config = ParserConfig::default().with_max_depth(32);

        let nested_parens = format!("{}1{};", "(".repeat(1000), ")".repeat(1000));
        let source = Source::new(&nested_parens);
        let err = Parser::with_config(&source, config).parse_program().unwrap_err();
        assert!(matches!(err, ParseError::DepthLimitExceeded { limit: 32, line: 1, .. }));

        let nested_blocks = format!("{}{}", "{".repeat(1000), "}".repeat(1000));
        let source = Source::new(&nested_blocks);
        let err = Parser::with_config(&source, config).parse_program().unwrap_err();
        assert!(matches!(err, ParseError::DepthLimitExceeded { .. }));

        let unary_chain = format!("{}x;", "!".repeat(1000));
        let source = Source::new(&unary_chain);
        let err = Parser::with_config(&source, config).parse_program().unwrap_err();
        assert!(matches!(err, ParseError::DepthLimitExceeded { .. }));

        // well within the limit
        let source = Source::new("((((a))));");
        assert!(Parser::with_config(&source, config).parse_program().is_ok());
    }

    #[test]
    fn test_default_depth_limit_on_small_stack() {
        fn nested_parens(n: usize) -> String {
            format!("{}1{};", "(".repeat(n), ")".repeat(n))
        }
        fn nested_arrays(n: usize) -> String {
            format!("{}1{};", "[".repeat(n), "]".repeat(n))
        }
        fn nested_objects(n: usize) -> String {
            format!("x = {}1{};", "{a:".repeat(n), "}".repeat(n))
        }

        let handle = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(|| {
                let builders: [fn(usize) -> String; 3] =
                    [nested_parens, nested_arrays, nested_objects];
                for build in builders {
                    let source = build(250);
                    assert!(parse(&source).is_ok(), "{}", source);

                    let source = build(300);
                    assert!(
                        matches!(
                            parse(&source),
                            Err(ParseError::DepthLimitExceeded { limit: 256, line: 1, .. })
                        ),
                        "{}",
                        source
                    );
                }
            })
            .unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_comments_between_source_elements() {
        let program = program(
            "// head\nvar a = /* dropped */ 1;\nfunction f() {\n  /* inner */\n  return;\n}\n// tail",
        );
        let comments: Vec<_> = program
            .body
            .iter()
            .filter_map(|stmt| match stmt {
                Stmt::Comment(comment) => Some((comment.kind, comment.text.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(
            comments,
            vec![(CommentKind::Line, " head"), (CommentKind::Line, " tail")]
        );
        match &program.body[2] {
            Stmt::FnDeclaration(function) => assert_eq!(
                function.body[0],
                Stmt::Comment(Comment {
                    kind: CommentKind::Block,
                    text: " inner ".to_string(),
                })
            ),
            stmt => panic!("expected a function declaration, got {:?}", stmt),
        }
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(program(""), Program::default());
        assert_eq!(program("  \n\t\n"), Program::default());
    }

    #[test]
    fn test_dump_snapshot() {
        insta::assert_snapshot!(dumped("function f(a,b){return a+b;}\nvar r = f(1,2);"), @r###"
        Program
          FnDeclaration f(a, b)
            Return
              Binary +
                Identifier a
                Identifier b
          Var
            VarDeclarator r
              Call
                Identifier f
                NumberLit 1
                NumberLit 2
        "###);
    }
}
