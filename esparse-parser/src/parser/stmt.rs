use super::*;
use crate::ast::{CatchClause, ForInTarget, ForInit, SwitchCase, VarDeclarator};

impl<'a> Parser<'a> {
    /// Parses a source element: a function declaration or a statement.
    pub(crate) fn parse_source_element(&mut self) -> ParseResult<Stmt> {
        match self.current_token.kind {
            TokenKind::Function => {
                self.nested(|p| Ok(Stmt::FnDeclaration(p.parse_function(true)?)))
            }
            _ => self.parse_stmt(),
        }
    }

    /// Parses a statement.
    pub(crate) fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        self.nested(|p| match p.current_token.kind {
            TokenKind::OpenBrace => p.parse_block_stmt(),
            TokenKind::Var => p.parse_var_stmt(),
            TokenKind::Semicolon => {
                p.next()?;
                Ok(Stmt::Empty)
            }
            TokenKind::If => p.parse_if_stmt(),
            TokenKind::Do => p.parse_do_while_stmt(),
            TokenKind::While => p.parse_while_stmt(),
            TokenKind::For => p.parse_for_stmt(),
            TokenKind::Continue | TokenKind::Break => p.parse_jump_stmt(),
            TokenKind::Return => p.parse_return_stmt(),
            TokenKind::With => p.parse_with_stmt(),
            TokenKind::Switch => p.parse_switch_stmt(),
            TokenKind::Throw => p.parse_throw_stmt(),
            TokenKind::Try => p.parse_try_stmt(),
            TokenKind::Debugger => {
                p.next()?;
                p.consume_semicolon()?;
                Ok(Stmt::Debugger)
            }
            _ => p.parse_expr_or_labelled_stmt(),
        })
    }

    pub(crate) fn parse_block_stmt(&mut self) -> ParseResult<Stmt> {
        Ok(Stmt::Block(self.parse_block_body()?))
    }

    fn parse_block_body(&mut self) -> ParseResult<Vec<Stmt>> {
        self.expect(TokenKind::OpenBrace)?;
        let body = self.parse_source_elements(&[TokenKind::CloseBrace])?;
        self.expect(TokenKind::CloseBrace)?;
        Ok(body)
    }

    fn parse_var_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Var)?;
        let declarations = self.parse_var_declarations(Grammar::Normal)?;
        self.consume_semicolon()?;
        Ok(Stmt::Var(declarations))
    }

    /// Parses `a = 1, b, c = 2`.
    fn parse_var_declarations(&mut self, g: Grammar) -> ParseResult<Vec<VarDeclarator>> {
        let mut declarations = Vec::new();
        loop {
            let ident = self.parse_binding_identifier()?;
            let initializer = if self.eat(TokenKind::Equals)? {
                Some(self.parse_assignment(g)?)
            } else {
                None
            };
            declarations.push(VarDeclarator { ident, initializer });

            if !self.eat(TokenKind::Comma)? {
                break Ok(declarations);
            }
        }
    }

    /// Parses an expression statement, or a labelled statement when the expression is a
    /// lone identifier followed by `:`.
    fn parse_expr_or_labelled_stmt(&mut self) -> ParseResult<Stmt> {
        let first = self.current_token;
        let expr = self.parse_expression(Grammar::NoBf)?;

        if let Expr::Identifier(label) = &expr {
            let lone_identifier =
                first.kind == TokenKind::Identifier && self.last_end == first.end();
            if lone_identifier && self.current_token.kind == TokenKind::Colon {
                let label = label.clone();
                self.next()?;
                let body = self.parse_stmt()?;
                return Ok(Stmt::Labelled {
                    label,
                    body: Box::new(body),
                });
            }
        }

        self.consume_semicolon()?;
        Ok(Stmt::ExprStmt(expr))
    }

    /* Statements.Control */
    fn parse_if_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::If)?;
        let test = self.parse_paren_expression()?;
        let consequent = self.parse_stmt()?;
        // binds to the innermost `if`
        let alternate = if self.eat(TokenKind::Else)? {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::If {
            test,
            consequent: Box::new(consequent),
            alternate,
        })
    }

    fn parse_do_while_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Do)?;
        let body = self.parse_stmt()?;
        self.expect(TokenKind::While)?;
        let test = self.parse_paren_expression()?;
        self.consume_semicolon()?;
        Ok(Stmt::DoWhile {
            body: Box::new(body),
            test,
        })
    }

    fn parse_while_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::While)?;
        let test = self.parse_paren_expression()?;
        let body = self.parse_stmt()?;
        Ok(Stmt::While {
            test,
            body: Box::new(body),
        })
    }

    /// Parses a three-clause `for` or a `for-in`. The header is parsed without `in` as an
    /// operator until it is clear which of the two it is.
    fn parse_for_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::OpenParen)?;

        let init = match self.current_token.kind {
            TokenKind::Semicolon => None,
            TokenKind::Var => {
                self.next()?;
                let mut declarations = self.parse_var_declarations(Grammar::NoIn)?;
                if declarations.len() == 1 && self.eat(TokenKind::In)? {
                    let target = ForInTarget::Var(declarations.remove(0));
                    return self.parse_for_in_rest(target);
                }
                Some(ForInit::Var(declarations))
            }
            kind if kind.is_prefix_operator() => {
                let first = self.parse_assignment(Grammar::NoIn)?;
                Some(ForInit::Expr(self.parse_sequence_rest(first, Grammar::NoIn)?))
            }
            _ => {
                let lhs = self.parse_lhs(Grammar::NoIn)?;
                if self.eat(TokenKind::In)? {
                    return self.parse_for_in_rest(ForInTarget::Expr(lhs));
                }
                let first = self.parse_assignment_rest(lhs, Grammar::NoIn)?;
                Some(ForInit::Expr(self.parse_sequence_rest(first, Grammar::NoIn)?))
            }
        };

        // never an inserted semicolon
        self.expect(TokenKind::Semicolon)?;
        let test = if self.current_token.kind == TokenKind::Semicolon {
            None
        } else {
            Some(self.parse_expression(Grammar::Normal)?)
        };
        self.expect(TokenKind::Semicolon)?;
        let update = if self.current_token.kind == TokenKind::CloseParen {
            None
        } else {
            Some(self.parse_expression(Grammar::Normal)?)
        };
        self.expect(TokenKind::CloseParen)?;

        let body = self.parse_stmt()?;
        Ok(Stmt::For {
            init,
            test,
            update,
            body: Box::new(body),
        })
    }

    /// Parses `object) body` after `for (target in`.
    fn parse_for_in_rest(&mut self, target: ForInTarget) -> ParseResult<Stmt> {
        let object = self.parse_expression(Grammar::Normal)?;
        self.expect(TokenKind::CloseParen)?;
        let body = self.parse_stmt()?;
        Ok(Stmt::ForIn {
            target,
            object,
            body: Box::new(body),
        })
    }

    /// Parses `continue` or `break` with an optional label on the same line.
    fn parse_jump_stmt(&mut self) -> ParseResult<Stmt> {
        let keyword = self.next()?;
        let label = if self.current_token.kind == TokenKind::Identifier {
            Some(self.next()?.text.to_string())
        } else {
            None
        };
        self.consume_semicolon()?;
        Ok(if keyword.kind == TokenKind::Continue {
            Stmt::Continue(label)
        } else {
            Stmt::Break(label)
        })
    }

    fn parse_return_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Return)?;
        let arg = match self.current_token.kind {
            TokenKind::Semicolon
            | TokenKind::SyntheticSemicolon
            | TokenKind::CloseBrace
            | TokenKind::Eof => None,
            _ => Some(self.parse_expression(Grammar::Normal)?),
        };
        self.consume_semicolon()?;
        Ok(Stmt::Return(arg))
    }

    fn parse_with_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::With)?;
        let object = self.parse_paren_expression()?;
        let body = self.parse_stmt()?;
        Ok(Stmt::With {
            object,
            body: Box::new(body),
        })
    }

    fn parse_switch_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Switch)?;
        let discriminant = self.parse_paren_expression()?;
        self.expect(TokenKind::OpenBrace)?;

        let mut cases = Vec::new();
        let mut has_default = false;
        while !self.eat(TokenKind::CloseBrace)? {
            let test = match self.current_token.kind {
                TokenKind::Case => {
                    self.next()?;
                    Some(self.parse_expression(Grammar::Normal)?)
                }
                // at most one `default`
                TokenKind::Default if !has_default => {
                    self.next()?;
                    has_default = true;
                    None
                }
                _ => return Err(self.unexpected()),
            };
            self.expect(TokenKind::Colon)?;
            let body = self.parse_source_elements(&[
                TokenKind::Case,
                TokenKind::Default,
                TokenKind::CloseBrace,
            ])?;
            cases.push(SwitchCase { test, body });
        }

        Ok(Stmt::Switch {
            discriminant,
            cases,
        })
    }

    fn parse_throw_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Throw)?;
        // `throw` followed by a line break gets an inserted `;` and fails here
        let arg = self.parse_expression(Grammar::Normal)?;
        self.consume_semicolon()?;
        Ok(Stmt::Throw(arg))
    }

    fn parse_try_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Try)?;
        let block = self.parse_block_stmt()?;

        let handler = if self.eat(TokenKind::Catch)? {
            self.expect(TokenKind::OpenParen)?;
            let param = self.parse_binding_identifier()?;
            self.expect(TokenKind::CloseParen)?;
            let body = self.parse_block_body()?;
            Some(CatchClause { param, body })
        } else {
            None
        };
        let finalizer = if self.eat(TokenKind::Finally)? {
            Some(Box::new(self.parse_block_stmt()?))
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.unexpected());
        }
        Ok(Stmt::Try {
            block: Box::new(block),
            handler,
            finalizer,
        })
    }

    /// Parses `( expression )`.
    fn parse_paren_expression(&mut self) -> ParseResult<Expr> {
        self.expect(TokenKind::OpenParen)?;
        let expr = self.parse_expression(Grammar::Normal)?;
        self.expect(TokenKind::CloseParen)?;
        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::{dumped, program};
    use super::*;
    use crate::visitor::{NodeKind, NodeRef};

    fn kinds(source: &str) -> Vec<NodeKind> {
        program(source)
            .body
            .iter()
            .map(|stmt| NodeRef::Stmt(stmt).kind())
            .collect()
    }

    #[test]
    fn test_asi_at_line_break() {
        assert_eq!(
            program("var p = 1\nvar q = 2").body,
            vec![
                Stmt::Var(vec![VarDeclarator {
                    ident: "p".to_string(),
                    initializer: Some(Expr::NumberLit(1.0)),
                }]),
                Stmt::Var(vec![VarDeclarator {
                    ident: "q".to_string(),
                    initializer: Some(Expr::NumberLit(2.0)),
                }]),
            ]
        );
        assert!(parse("var p = 1 var q = 2").is_err());
    }

    #[test]
    fn test_asi_before_close_brace_and_eof() {
        insta::assert_snapshot!(dumped("{ a() } b"), @r###"
        Program
          Block
            ExprStmt
              Call
                Identifier a
          ExprStmt
            Identifier b
        "###);
    }

    #[test]
    fn test_asi_after_return() {
        assert_eq!(
            program("return\n100").body,
            vec![Stmt::Return(None), Stmt::ExprStmt(Expr::NumberLit(1.0e2))]
        );
        assert_eq!(
            program("return 100").body,
            vec![Stmt::Return(Some(Expr::NumberLit(100.0)))]
        );
    }

    #[test]
    fn test_asi_after_break_and_continue() {
        insta::assert_snapshot!(dumped("a: while (x) { if (y) continue\na; break a }"), @r###"
        Program
          Labelled a
            While
              Identifier x
              Block
                If
                  Identifier y
                  Continue
                ExprStmt
                  Identifier a
                Break a
        "###);
    }

    #[test]
    fn test_throw_requires_expression_on_same_line() {
        assert!(parse("throw\nerr;").is_err());
        assert_eq!(
            program("throw err").body,
            vec![Stmt::Throw(Expr::Identifier("err".to_string()))]
        );
    }

    #[test]
    fn test_restricted_postfix() {
        insta::assert_snapshot!(dumped("a\n++b"), @r###"
        Program
          ExprStmt
            Identifier a
          ExprStmt
            Unary ++
              Identifier b
        "###);
        assert!(matches!(
            program("a++\nb").body.as_slice(),
            [Stmt::ExprStmt(Expr::Unary { is_postfix: true, .. }), Stmt::ExprStmt(_)]
        ));
    }

    #[test]
    fn test_dangling_else() {
        insta::assert_snapshot!(dumped("if (a) if (b) c; else d;"), @r###"
        Program
          If
            Identifier a
            If
              Identifier b
              ExprStmt
                Identifier c
              ExprStmt
                Identifier d
        "###);
        insta::assert_snapshot!(dumped("if (a) b\nelse c"), @r###"
        Program
          If
            Identifier a
            ExprStmt
              Identifier b
            ExprStmt
              Identifier c
        "###);
    }

    #[test]
    fn test_for_in() {
        insta::assert_snapshot!(dumped("for (x in y) {}"), @r###"
        Program
          ForIn
            Identifier x
            Identifier y
            Block
        "###);
        insta::assert_snapshot!(dumped("for (var k in a.b) ;"), @r###"
        Program
          ForIn
            VarDeclarator k
            DotAccess .b
              Identifier a
            Empty
        "###);
        insta::assert_snapshot!(dumped("for (a[0].b in c, d) {}"), @r###"
        Program
          ForIn
            DotAccess .b
              BracketAccess
                Identifier a
                NumberLit 0
            Sequence
              Identifier c
              Identifier d
            Block
        "###);
    }

    #[test]
    fn test_for_three_clauses() {
        insta::assert_snapshot!(dumped("for (x = 1; x < y; x++) {}"), @r###"
        Program
          For
            Assign =
              Identifier x
              NumberLit 1
            Binary <
              Identifier x
              Identifier y
            Unary ++ (postfix)
              Identifier x
            Block
        "###);
        insta::assert_snapshot!(dumped("for (var i = 0, n = (a in b); ;) break;"), @r###"
        Program
          For
            VarDeclarator i
              NumberLit 0
            VarDeclarator n
              Binary in
                Identifier a
                Identifier b
            Break
        "###);
        assert_eq!(
            program("for (;;) {}").body,
            vec![Stmt::For {
                init: None,
                test: None,
                update: None,
                body: Box::new(Stmt::Block(vec![])),
            }]
        );
    }

    #[test]
    fn test_for_header_rejects_bare_in() {
        assert!(parse("for (x = a in b; x; x++) {}").is_err());
        assert!(parse("for (var x = a in b; x; x++) {}").is_err());
        assert!(parse("for (var a, b in c) {}").is_err());
        // parenthesized `in` is fine
        assert!(parse("for (x = (a in b); x; x++) {}").is_ok());
        // no semicolon insertion inside the header
        assert!(parse("for (a\nb\nc) {}").is_err());
    }

    #[test]
    fn test_var_for_in_with_initializer() {
        assert!(matches!(
            program("for (var a = 1 in o) {}").body.as_slice(),
            [Stmt::ForIn {
                target: ForInTarget::Var(VarDeclarator { initializer: Some(_), .. }),
                ..
            }]
        ));
    }

    #[test]
    fn test_iteration() {
        assert_eq!(
            kinds("do x++; while (x < 10)\nwhile (true) {}"),
            vec![NodeKind::DoWhile, NodeKind::While]
        );
        assert!(parse("do x++ while (x)").is_err());
    }

    #[test]
    fn test_switch() {
        insta::assert_snapshot!(
            dumped("switch (x) { case 1: a(); case 2: default: b(); break; case 3: }"),
            @r###"
        Program
          Switch
            Identifier x
            SwitchCase case
              NumberLit 1
              ExprStmt
                Call
                  Identifier a
            SwitchCase case
              NumberLit 2
            SwitchCase default
              ExprStmt
                Call
                  Identifier b
              Break
            SwitchCase case
              NumberLit 3
        "###
        );
        assert!(parse("switch (x) { default: a; default: b; }").is_err());
        assert!(parse("switch (x) { a; }").is_err());
        assert_eq!(kinds("switch (x) {}"), vec![NodeKind::Switch]);
    }

    #[test]
    fn test_labelled() {
        assert_eq!(
            program("outer: for (;;) continue outer;").body,
            vec![Stmt::Labelled {
                label: "outer".to_string(),
                body: Box::new(Stmt::For {
                    init: None,
                    test: None,
                    update: None,
                    body: Box::new(Stmt::Continue(Some("outer".to_string()))),
                }),
            }]
        );
        // not a lone identifier
        assert!(parse("(a): b;").is_err());
        assert!(parse("a.b: c;").is_err());
    }

    #[test]
    fn test_try() {
        insta::assert_snapshot!(dumped("try { a } catch (e) { b } finally { c }"), @r###"
        Program
          Try
            Block
              ExprStmt
                Identifier a
            CatchClause e
              ExprStmt
                Identifier b
            Block
              ExprStmt
                Identifier c
        "###);
        assert_eq!(
            program("try {} finally {}").body,
            vec![Stmt::Try {
                block: Box::new(Stmt::Block(vec![])),
                handler: None,
                finalizer: Some(Box::new(Stmt::Block(vec![]))),
            }]
        );
        assert!(parse("try {}").is_err());
        assert!(parse("try a; catch (e) {}").is_err());
    }

    #[test]
    fn test_simple_statements() {
        assert_eq!(
            kinds(";debugger\nwith (o) x;"),
            vec![NodeKind::Empty, NodeKind::Debugger, NodeKind::With]
        );
        assert_eq!(
            program("var a, b = 2;").body,
            vec![Stmt::Var(vec![
                VarDeclarator {
                    ident: "a".to_string(),
                    initializer: None,
                },
                VarDeclarator {
                    ident: "b".to_string(),
                    initializer: Some(Expr::NumberLit(2.0)),
                },
            ])]
        );
    }

    #[test]
    fn test_expression_statement_cannot_start_with_function_or_brace() {
        // `{` opens a block
        assert_eq!(kinds("{}"), vec![NodeKind::Block]);
        assert!(parse("if (a) function f() {}").is_err());
        assert!(parse("while (a) function () {};").is_err());
        assert_eq!(kinds("(function () {});"), vec![NodeKind::ExprStmt]);
    }

    #[test]
    fn test_function_declarations_in_blocks() {
        insta::assert_snapshot!(dumped("if (a) { function f() {} f(); }"), @r###"
        Program
          If
            Identifier a
            Block
              FnDeclaration f()
              ExprStmt
                Call
                  Identifier f
        "###);
        assert!(parse("function () {}").is_err());
    }

    #[test]
    fn test_comments_in_case_bodies() {
        insta::assert_snapshot!(dumped("switch (x) {\ncase 1:\n  // one\n  a;\n}"), @r###"
        Program
          Switch
            Identifier x
            SwitchCase case
              NumberLit 1
              Comment Line " one"
              ExprStmt
                Identifier a
        "###);
    }
}
