use super::*;
use crate::ast::{AssignOp, BinaryOp, Function, LogicalOp, Property, PropertyKey, UnaryOp};
use crate::error::LexErrorKind;
use crate::literal::{cook_string, parse_number, split_regex};

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses a comma-separated expression.
    pub(crate) fn parse_expression(&mut self, g: Grammar) -> ParseResult<Expr> {
        let first = self.parse_assignment(g)?;
        self.parse_sequence_rest(first, g)
    }

    /// Parses the `, b, c` tail of a comma expression whose first operand is `first`.
    pub(crate) fn parse_sequence_rest(&mut self, first: Expr, g: Grammar) -> ParseResult<Expr> {
        if self.current_token.kind != TokenKind::Comma {
            return Ok(first);
        }
        let mut exprs = vec![first];
        while self.eat(TokenKind::Comma)? {
            exprs.push(self.parse_assignment(g.operand())?);
        }
        Ok(Expr::Sequence(exprs))
    }

    /// Parses an assignment expression (which includes conditional and binary expressions).
    pub(crate) fn parse_assignment(&mut self, g: Grammar) -> ParseResult<Expr> {
        self.nested(|p| {
            if p.current_token.kind.is_prefix_operator() {
                // a prefix expression is never an assignment target
                let operand = p.parse_unary(g)?;
                let lhs = p.parse_binary(operand, 0, g)?;
                return p.parse_conditional_rest(lhs, g);
            }
            let lhs = p.parse_lhs(g)?;
            p.parse_assignment_rest(lhs, g)
        })
    }

    /// Continues an assignment expression after its left-hand-side expression `lhs`.
    pub(crate) fn parse_assignment_rest(&mut self, lhs: Expr, g: Grammar) -> ParseResult<Expr> {
        if let Some(op) = assign_op(self.current_token.kind) {
            self.next()?;
            let value = self.parse_assignment(g.operand())?;
            return Ok(Expr::Assign {
                target: Box::new(lhs),
                op,
                value: Box::new(value),
            });
        }
        let operand = self.parse_postfix(lhs)?;
        let lhs = self.parse_binary(operand, 0, g)?;
        self.parse_conditional_rest(lhs, g)
    }

    fn parse_conditional_rest(&mut self, test: Expr, g: Grammar) -> ParseResult<Expr> {
        if !self.eat(TokenKind::Question)? {
            return Ok(test);
        }
        let consequent = self.parse_assignment(Grammar::Normal)?;
        self.expect(TokenKind::Colon)?;
        let alternate = self.parse_assignment(g.operand())?;
        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    /// Parses binary operators with a binding power of at least `min_bp`, starting from the
    /// already parsed operand `lhs`.
    fn parse_binary(&mut self, mut lhs: Expr, min_bp: u8, g: Grammar) -> ParseResult<Expr> {
        loop {
            let kind = self.current_token.kind;
            if kind == TokenKind::In && !g.allows_in() {
                break; // `in` ends the initializer of a for header
            }
            let (l_bp, r_bp) = match kind.binop_bp() {
                Some(bp) => bp,
                None => break, // not a valid binop, stop parsing
            };
            if l_bp < min_bp {
                break; // less than the min_bp, stop parsing
            }

            // self.current_token is a valid binop
            self.next()?;

            let operand = self.parse_unary(g.operand())?;
            let rhs = self.parse_binary(operand, r_bp, g.operand())?;

            lhs = binary_expr(lhs, kind, rhs);
        }

        Ok(lhs)
    }

    /// Parses a unary expression: prefix operators applied to a postfix expression.
    fn parse_unary(&mut self, g: Grammar) -> ParseResult<Expr> {
        let op = match prefix_op(self.current_token.kind) {
            Some(op) => op,
            None => {
                let lhs = self.parse_lhs(g)?;
                return self.parse_postfix(lhs);
            }
        };
        self.next()?;
        let arg = self.nested(|p| p.parse_unary(g.operand()))?;
        Ok(Expr::Unary {
            op,
            arg: Box::new(arg),
            is_postfix: false,
        })
    }

    /// Applies a postfix `++`/`--` to `expr`. A `++`/`--` on a new line is a prefix operator
    /// of the next statement and is left alone.
    fn parse_postfix(&mut self, expr: Expr) -> ParseResult<Expr> {
        let op = match self.current_token.kind {
            TokenKind::Increment => UnaryOp::Increment,
            TokenKind::Decrement => UnaryOp::Decrement,
            _ => return Ok(expr),
        };
        self.next()?;
        Ok(Expr::Unary {
            op,
            arg: Box::new(expr),
            is_postfix: true,
        })
    }

    /* Expressions.LeftHandSide */
    /// Parses a left-hand-side expression: member accesses, calls and `new`.
    pub(crate) fn parse_lhs(&mut self, g: Grammar) -> ParseResult<Expr> {
        let mut expr = if self.current_token.kind == TokenKind::New {
            self.parse_new()?
        } else {
            self.parse_primary(g)?
        };
        loop {
            expr = self.parse_member_tail(expr)?;
            if self.current_token.kind != TokenKind::OpenParen {
                break Ok(expr);
            }
            let args = self.parse_arguments()?;
            expr = Expr::Call {
                callee: Box::new(expr),
                args,
            };
        }
    }

    /// Parses `new callee(args)`. The argument list is optional and binds to the innermost
    /// `new` (`new new A()()`).
    fn parse_new(&mut self) -> ParseResult<Expr> {
        self.nested(|p| {
            p.expect(TokenKind::New)?;
            let callee = if p.current_token.kind == TokenKind::New {
                p.parse_new()?
            } else {
                p.parse_primary(Grammar::Normal)?
            };
            let callee = p.parse_member_tail(callee)?;
            let args = if p.current_token.kind == TokenKind::OpenParen {
                p.parse_arguments()?
            } else {
                Vec::new()
            };
            Ok(Expr::New {
                callee: Box::new(callee),
                args,
            })
        })
    }

    /// Parses any number of `.name` and `[expr]` accesses on `object`.
    fn parse_member_tail(&mut self, mut object: Expr) -> ParseResult<Expr> {
        loop {
            object = match self.current_token.kind {
                TokenKind::Dot => {
                    self.next()?;
                    Expr::DotAccess {
                        object: Box::new(object),
                        property: self.parse_identifier_name()?,
                    }
                }
                TokenKind::OpenBracket => {
                    self.next()?;
                    let property = self.parse_expression(Grammar::Normal)?;
                    self.expect(TokenKind::CloseBracket)?;
                    Expr::BracketAccess {
                        object: Box::new(object),
                        property: Box::new(property),
                    }
                }
                _ => break Ok(object),
            };
        }
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<Expr>> {
        self.expect(TokenKind::OpenParen)?;
        let mut args = Vec::new();

        if !self.eat(TokenKind::CloseParen)? {
            loop {
                args.push(self.parse_assignment(Grammar::Normal)?);

                if self.eat(TokenKind::CloseParen)? {
                    break;
                }
                self.expect(TokenKind::Comma)?;
            }
        }

        Ok(args)
    }

    /* Expressions.Primary */
    /// Parses a primary (atom) expression.
    fn parse_primary(&mut self, g: Grammar) -> ParseResult<Expr> {
        let token = self.current_token;
        match token.kind {
            TokenKind::This => {
                self.next()?;
                Ok(Expr::This)
            }
            TokenKind::Identifier => {
                self.next()?;
                Ok(Expr::Identifier(token.text.to_string()))
            }
            TokenKind::Null => {
                self.next()?;
                Ok(Expr::NullLit)
            }
            TokenKind::True | TokenKind::False => {
                self.next()?;
                Ok(Expr::BoolLit(token.kind == TokenKind::True))
            }
            TokenKind::NumberLit => {
                let value = parse_number(token.text).ok_or_else(|| ParseError::Lex {
                    kind: LexErrorKind::InvalidNumber,
                    text: token.text.to_string(),
                    line: token.line,
                    column: token.column,
                    offset: token.start,
                })?;
                self.next()?;
                Ok(Expr::NumberLit(value))
            }
            TokenKind::StringLit => {
                self.next()?;
                Ok(Expr::StringLit(cook_string(token.text)))
            }
            // a `/` in operand position starts a regular expression
            TokenKind::Slash | TokenKind::SlashEquals => {
                let regex = self.tokens.scan_regex_literal(token)?;
                self.current_token = regex;
                self.next()?;
                let (pattern, flags) = split_regex(regex.text);
                Ok(Expr::RegexLit {
                    pattern: pattern.to_string(),
                    flags: flags.to_string(),
                })
            }
            TokenKind::OpenBracket => self.parse_array_literal(),
            TokenKind::OpenBrace if g != Grammar::NoBf => self.parse_object_literal(),
            TokenKind::Function if g != Grammar::NoBf => {
                Ok(Expr::Function(self.parse_function(false)?))
            }
            TokenKind::OpenParen => {
                self.next()?;
                let expr = self.parse_expression(Grammar::Normal)?;
                self.expect(TokenKind::CloseParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected()),
        }
    }

    /* Expressions.Literals */
    /// Parses an array literal. Elisions become `None`; a trailing comma adds nothing.
    fn parse_array_literal(&mut self) -> ParseResult<Expr> {
        self.expect(TokenKind::OpenBracket)?;
        let mut elements = Vec::new();
        loop {
            match self.current_token.kind {
                TokenKind::CloseBracket => break,
                TokenKind::Comma => {
                    self.next()?;
                    elements.push(None);
                }
                _ => {
                    elements.push(Some(self.parse_assignment(Grammar::Normal)?));
                    if self.current_token.kind != TokenKind::CloseBracket {
                        self.expect(TokenKind::Comma)?;
                    }
                }
            }
        }
        self.expect(TokenKind::CloseBracket)?;
        Ok(Expr::ArrayLit(elements))
    }

    fn parse_object_literal(&mut self) -> ParseResult<Expr> {
        self.expect(TokenKind::OpenBrace)?;
        let mut properties = Vec::new();
        while self.current_token.kind != TokenKind::CloseBrace {
            properties.push(self.parse_property()?);
            if self.current_token.kind != TokenKind::CloseBrace {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::CloseBrace)?;
        Ok(Expr::ObjectLit(properties))
    }

    /// Parses `key: value`, `get key() {}` or `set key(v) {}`.
    fn parse_property(&mut self) -> ParseResult<Property> {
        let token = self.current_token;
        let key = if token.kind == TokenKind::Identifier && matches!(token.text, "get" | "set") {
            self.next()?;
            if self.current_token.kind != TokenKind::Colon {
                return self.parse_accessor(token.text == "get");
            }
            // plain property named `get` or `set`
            PropertyKey::Identifier(token.text.to_string())
        } else {
            self.parse_property_key()?
        };
        self.expect(TokenKind::Colon)?;
        let value = self.parse_assignment(Grammar::Normal)?;
        Ok(Property::Init { key, value })
    }

    fn parse_accessor(&mut self, is_getter: bool) -> ParseResult<Property> {
        let key = self.parse_property_key()?;
        self.expect(TokenKind::OpenParen)?;
        if is_getter {
            self.expect(TokenKind::CloseParen)?;
            let body = self.parse_function_body()?;
            Ok(Property::Get { key, body })
        } else {
            let param = self.parse_binding_identifier()?;
            self.expect(TokenKind::CloseParen)?;
            let body = self.parse_function_body()?;
            Ok(Property::Set { key, param, body })
        }
    }

    fn parse_property_key(&mut self) -> ParseResult<PropertyKey> {
        let token = self.current_token;
        let key = match token.kind {
            TokenKind::StringLit => PropertyKey::StringLit(cook_string(token.text)),
            TokenKind::NumberLit => match parse_number(token.text) {
                Some(value) => PropertyKey::NumberLit(value),
                None => return Err(self.unexpected()),
            },
            kind if kind.is_identifier_name() => PropertyKey::Identifier(token.text.to_string()),
            _ => return Err(self.unexpected()),
        };
        self.next()?;
        Ok(key)
    }

    /* Functions */
    /// Parses `function name?(params) { body }`. Declarations require the name.
    pub(crate) fn parse_function(&mut self, requires_name: bool) -> ParseResult<Function> {
        self.expect(TokenKind::Function)?;
        let ident = if self.current_token.kind == TokenKind::Identifier {
            Some(self.parse_binding_identifier()?)
        } else if requires_name {
            return Err(self.unexpected());
        } else {
            None
        };

        self.expect(TokenKind::OpenParen)?;
        let mut params = Vec::new();
        if !self.eat(TokenKind::CloseParen)? {
            loop {
                params.push(self.parse_binding_identifier()?);

                if self.eat(TokenKind::CloseParen)? {
                    break;
                }
                self.expect(TokenKind::Comma)?;
            }
        }

        let body = self.parse_function_body()?;
        Ok(Function {
            ident,
            params,
            body,
        })
    }

    fn parse_function_body(&mut self) -> ParseResult<Vec<Stmt>> {
        self.expect(TokenKind::OpenBrace)?;
        let body = self.parse_source_elements(&[TokenKind::CloseBrace])?;
        self.expect(TokenKind::CloseBrace)?;
        Ok(body)
    }

    /* Identifiers */
    /// Parses an identifier that names a variable, parameter or label.
    pub(crate) fn parse_binding_identifier(&mut self) -> ParseResult<String> {
        Ok(self.expect(TokenKind::Identifier)?.text.to_string())
    }

    /// Parses a property name after `.`: any identifier, reserved words included.
    fn parse_identifier_name(&mut self) -> ParseResult<String> {
        if self.current_token.kind.is_identifier_name() {
            Ok(self.next()?.text.to_string())
        } else {
            Err(self.unexpected())
        }
    }
}

fn prefix_op(kind: TokenKind) -> Option<UnaryOp> {
    Some(match kind {
        TokenKind::Delete => UnaryOp::Delete,
        TokenKind::Void => UnaryOp::Void,
        TokenKind::Typeof => UnaryOp::Typeof,
        TokenKind::Increment | TokenKind::RestrictedIncrement => UnaryOp::Increment,
        TokenKind::Decrement | TokenKind::RestrictedDecrement => UnaryOp::Decrement,
        TokenKind::Plus => UnaryOp::Plus,
        TokenKind::Minus => UnaryOp::Minus,
        TokenKind::Tilde => UnaryOp::BitNot,
        TokenKind::LogicalNot => UnaryOp::LogicalNot,
        _ => return None,
    })
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Equals => AssignOp::Assign,
        TokenKind::AsteriskEquals => AssignOp::Mul,
        TokenKind::SlashEquals => AssignOp::Div,
        TokenKind::PercentEquals => AssignOp::Mod,
        TokenKind::PlusEquals => AssignOp::Add,
        TokenKind::MinusEquals => AssignOp::Sub,
        TokenKind::ShiftLeftEquals => AssignOp::ShiftLeft,
        TokenKind::ShiftRightEquals => AssignOp::ShiftRight,
        TokenKind::UnsignedShiftRightEquals => AssignOp::UnsignedShiftRight,
        TokenKind::AmpersandEquals => AssignOp::BitAnd,
        TokenKind::CaretEquals => AssignOp::BitXor,
        TokenKind::PipeEquals => AssignOp::BitOr,
        _ => return None,
    })
}

/// Builds the node for binary operator `kind`. `kind` must have a binding power.
fn binary_expr(lhs: Expr, kind: TokenKind, rhs: Expr) -> Expr {
    let logical = match kind {
        TokenKind::LogicalAnd => Some(LogicalOp::And),
        TokenKind::LogicalOr => Some(LogicalOp::Or),
        _ => None,
    };
    if let Some(op) = logical {
        return Expr::Logical {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        };
    }
    let op = match kind {
        TokenKind::Asterisk => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::ShiftLeft => BinaryOp::ShiftLeft,
        TokenKind::ShiftRight => BinaryOp::ShiftRight,
        TokenKind::UnsignedShiftRight => BinaryOp::UnsignedShiftRight,
        TokenKind::LessThan => BinaryOp::LessThan,
        TokenKind::GreaterThan => BinaryOp::GreaterThan,
        TokenKind::LessThanEquals => BinaryOp::LessThanEquals,
        TokenKind::GreaterThanEquals => BinaryOp::GreaterThanEquals,
        TokenKind::Instanceof => BinaryOp::Instanceof,
        TokenKind::In => BinaryOp::In,
        TokenKind::EqualsEquals => BinaryOp::Equals,
        TokenKind::NotEquals => BinaryOp::NotEquals,
        TokenKind::StrictEquals => BinaryOp::StrictEquals,
        TokenKind::StrictNotEquals => BinaryOp::StrictNotEquals,
        TokenKind::Ampersand => BinaryOp::BitAnd,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::Pipe => BinaryOp::BitOr,
        _ => unreachable!("`{}` is not a binary operator", kind),
    };
    Expr::Binary {
        lhs: Box::new(lhs),
        op,
        rhs: Box::new(rhs),
    }
}
