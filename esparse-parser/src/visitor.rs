//! Visitor pattern for AST nodes.
//!
//! [`NodeRef`] is a borrowed view over every node type. Its [`NodeRef::kind`] and
//! [`NodeRef::children`] are enough to walk the whole tree without matching on variants;
//! the `walk_*` functions (and therefore every default [`Visitor`] method) are built on it.

use crate::ast::{
    CatchClause, Expr, ForInTarget, ForInit, Program, Property, Stmt, SwitchCase, VarDeclarator,
};

/// Variant tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    // statements
    Block,
    Var,
    Empty,
    ExprStmt,
    If,
    DoWhile,
    While,
    For,
    ForIn,
    Continue,
    Break,
    Return,
    With,
    Switch,
    Labelled,
    Throw,
    Try,
    Debugger,
    FnDeclaration,
    Comment,
    // expressions
    This,
    Identifier,
    NullLit,
    BoolLit,
    NumberLit,
    StringLit,
    RegexLit,
    ArrayLit,
    /// A hole in an array literal.
    Elision,
    ObjectLit,
    Function,
    Unary,
    Binary,
    Logical,
    Assign,
    Conditional,
    DotAccess,
    BracketAccess,
    Call,
    New,
    Sequence,
    // auxiliary
    Property,
    VarDeclarator,
    SwitchCase,
    CatchClause,
}

/// Borrowed reference to any node of the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'ast> {
    Program(&'ast Program),
    Stmt(&'ast Stmt),
    Expr(&'ast Expr),
    Elision,
    Property(&'ast Property),
    VarDeclarator(&'ast VarDeclarator),
    SwitchCase(&'ast SwitchCase),
    CatchClause(&'ast CatchClause),
}

impl<'ast> NodeRef<'ast> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Program(_) => NodeKind::Program,
            NodeRef::Stmt(stmt) => match stmt {
                Stmt::Block(_) => NodeKind::Block,
                Stmt::Var(_) => NodeKind::Var,
                Stmt::Empty => NodeKind::Empty,
                Stmt::ExprStmt(_) => NodeKind::ExprStmt,
                Stmt::If { .. } => NodeKind::If,
                Stmt::DoWhile { .. } => NodeKind::DoWhile,
                Stmt::While { .. } => NodeKind::While,
                Stmt::For { .. } => NodeKind::For,
                Stmt::ForIn { .. } => NodeKind::ForIn,
                Stmt::Continue(_) => NodeKind::Continue,
                Stmt::Break(_) => NodeKind::Break,
                Stmt::Return(_) => NodeKind::Return,
                Stmt::With { .. } => NodeKind::With,
                Stmt::Switch { .. } => NodeKind::Switch,
                Stmt::Labelled { .. } => NodeKind::Labelled,
                Stmt::Throw(_) => NodeKind::Throw,
                Stmt::Try { .. } => NodeKind::Try,
                Stmt::Debugger => NodeKind::Debugger,
                Stmt::FnDeclaration(_) => NodeKind::FnDeclaration,
                Stmt::Comment(_) => NodeKind::Comment,
            },
            NodeRef::Expr(expr) => match expr {
                Expr::This => NodeKind::This,
                Expr::Identifier(_) => NodeKind::Identifier,
                Expr::NullLit => NodeKind::NullLit,
                Expr::BoolLit(_) => NodeKind::BoolLit,
                Expr::NumberLit(_) => NodeKind::NumberLit,
                Expr::StringLit(_) => NodeKind::StringLit,
                Expr::RegexLit { .. } => NodeKind::RegexLit,
                Expr::ArrayLit(_) => NodeKind::ArrayLit,
                Expr::ObjectLit(_) => NodeKind::ObjectLit,
                Expr::Function(_) => NodeKind::Function,
                Expr::Unary { .. } => NodeKind::Unary,
                Expr::Binary { .. } => NodeKind::Binary,
                Expr::Logical { .. } => NodeKind::Logical,
                Expr::Assign { .. } => NodeKind::Assign,
                Expr::Conditional { .. } => NodeKind::Conditional,
                Expr::DotAccess { .. } => NodeKind::DotAccess,
                Expr::BracketAccess { .. } => NodeKind::BracketAccess,
                Expr::Call { .. } => NodeKind::Call,
                Expr::New { .. } => NodeKind::New,
                Expr::Sequence(_) => NodeKind::Sequence,
            },
            NodeRef::Elision => NodeKind::Elision,
            NodeRef::Property(_) => NodeKind::Property,
            NodeRef::VarDeclarator(_) => NodeKind::VarDeclarator,
            NodeRef::SwitchCase(_) => NodeKind::SwitchCase,
            NodeRef::CatchClause(_) => NodeKind::CatchClause,
        }
    }

    /// Direct children, in source order.
    pub fn children(&self) -> Vec<NodeRef<'ast>> {
        fn stmts(body: &[Stmt]) -> impl Iterator<Item = NodeRef<'_>> {
            body.iter().map(NodeRef::Stmt)
        }

        let mut children = Vec::new();
        match *self {
            NodeRef::Program(program) => children.extend(stmts(&program.body)),
            NodeRef::Stmt(stmt) => match stmt {
                Stmt::Block(body) => children.extend(stmts(body)),
                Stmt::Var(decls) => children.extend(decls.iter().map(NodeRef::VarDeclarator)),
                Stmt::ExprStmt(expr) | Stmt::Throw(expr) => children.push(NodeRef::Expr(expr)),
                Stmt::If {
                    test,
                    consequent,
                    alternate,
                } => {
                    children.push(NodeRef::Expr(test));
                    children.push(NodeRef::Stmt(consequent));
                    children.extend(alternate.as_deref().map(NodeRef::Stmt));
                }
                Stmt::DoWhile { body, test } => {
                    children.push(NodeRef::Stmt(body));
                    children.push(NodeRef::Expr(test));
                }
                Stmt::While { test, body } => {
                    children.push(NodeRef::Expr(test));
                    children.push(NodeRef::Stmt(body));
                }
                Stmt::For {
                    init,
                    test,
                    update,
                    body,
                } => {
                    match init {
                        Some(ForInit::Var(decls)) => {
                            children.extend(decls.iter().map(NodeRef::VarDeclarator))
                        }
                        Some(ForInit::Expr(expr)) => children.push(NodeRef::Expr(expr)),
                        None => {}
                    }
                    children.extend(test.iter().map(NodeRef::Expr));
                    children.extend(update.iter().map(NodeRef::Expr));
                    children.push(NodeRef::Stmt(body));
                }
                Stmt::ForIn {
                    target,
                    object,
                    body,
                } => {
                    children.push(match target {
                        ForInTarget::Var(decl) => NodeRef::VarDeclarator(decl),
                        ForInTarget::Expr(expr) => NodeRef::Expr(expr),
                    });
                    children.push(NodeRef::Expr(object));
                    children.push(NodeRef::Stmt(body));
                }
                Stmt::Return(expr) => children.extend(expr.iter().map(NodeRef::Expr)),
                Stmt::With { object, body } => {
                    children.push(NodeRef::Expr(object));
                    children.push(NodeRef::Stmt(body));
                }
                Stmt::Switch {
                    discriminant,
                    cases,
                } => {
                    children.push(NodeRef::Expr(discriminant));
                    children.extend(cases.iter().map(NodeRef::SwitchCase));
                }
                Stmt::Labelled { body, .. } => children.push(NodeRef::Stmt(body)),
                Stmt::Try {
                    block,
                    handler,
                    finalizer,
                } => {
                    children.push(NodeRef::Stmt(block));
                    children.extend(handler.iter().map(NodeRef::CatchClause));
                    children.extend(finalizer.as_deref().map(NodeRef::Stmt));
                }
                Stmt::FnDeclaration(function) => children.extend(stmts(&function.body)),
                Stmt::Empty
                | Stmt::Continue(_)
                | Stmt::Break(_)
                | Stmt::Debugger
                | Stmt::Comment(_) => {}
            },
            NodeRef::Expr(expr) => match expr {
                Expr::ArrayLit(elements) => {
                    children.extend(elements.iter().map(|element| match element {
                        Some(expr) => NodeRef::Expr(expr),
                        None => NodeRef::Elision,
                    }))
                }
                Expr::ObjectLit(properties) => {
                    children.extend(properties.iter().map(NodeRef::Property))
                }
                Expr::Function(function) => children.extend(stmts(&function.body)),
                Expr::Unary { arg, .. } => children.push(NodeRef::Expr(arg)),
                Expr::Binary { lhs, rhs, .. } | Expr::Logical { lhs, rhs, .. } => {
                    children.push(NodeRef::Expr(lhs));
                    children.push(NodeRef::Expr(rhs));
                }
                Expr::Assign { target, value, .. } => {
                    children.push(NodeRef::Expr(target));
                    children.push(NodeRef::Expr(value));
                }
                Expr::Conditional {
                    test,
                    consequent,
                    alternate,
                } => {
                    children.push(NodeRef::Expr(test));
                    children.push(NodeRef::Expr(consequent));
                    children.push(NodeRef::Expr(alternate));
                }
                Expr::DotAccess { object, .. } => children.push(NodeRef::Expr(object)),
                Expr::BracketAccess { object, property } => {
                    children.push(NodeRef::Expr(object));
                    children.push(NodeRef::Expr(property));
                }
                Expr::Call { callee, args } | Expr::New { callee, args } => {
                    children.push(NodeRef::Expr(callee));
                    children.extend(args.iter().map(NodeRef::Expr));
                }
                Expr::Sequence(exprs) => children.extend(exprs.iter().map(NodeRef::Expr)),
                Expr::This
                | Expr::Identifier(_)
                | Expr::NullLit
                | Expr::BoolLit(_)
                | Expr::NumberLit(_)
                | Expr::StringLit(_)
                | Expr::RegexLit { .. } => {}
            },
            NodeRef::Elision => {}
            NodeRef::Property(property) => match property {
                Property::Init { value, .. } => children.push(NodeRef::Expr(value)),
                Property::Get { body, .. } | Property::Set { body, .. } => {
                    children.extend(stmts(body))
                }
            },
            NodeRef::VarDeclarator(decl) => {
                children.extend(decl.initializer.iter().map(NodeRef::Expr))
            }
            NodeRef::SwitchCase(case) => {
                children.extend(case.test.iter().map(NodeRef::Expr));
                children.extend(stmts(&case.body));
            }
            NodeRef::CatchClause(clause) => children.extend(stmts(&clause.body)),
        }
        children
    }

    /// Tag followed by the node's scalar fields (names, operators, literal values).
    pub fn label(&self) -> String {
        let kind = format!("{:?}", self.kind());
        let detail = match *self {
            NodeRef::Stmt(stmt) => match stmt {
                Stmt::Continue(Some(label)) | Stmt::Break(Some(label)) => label.clone(),
                Stmt::Labelled { label, .. } => label.clone(),
                Stmt::FnDeclaration(function) => function_signature(function),
                Stmt::Comment(comment) => format!("{:?} {:?}", comment.kind, comment.text),
                _ => String::new(),
            },
            NodeRef::Expr(expr) => match expr {
                Expr::Identifier(ident) => ident.clone(),
                Expr::BoolLit(val) => val.to_string(),
                Expr::NumberLit(val) => val.to_string(),
                Expr::StringLit(val) => format!("{:?}", val),
                Expr::RegexLit { pattern, flags } => format!("/{}/{}", pattern, flags),
                Expr::Function(function) => function_signature(function),
                Expr::Unary {
                    op, is_postfix, ..
                } => {
                    if *is_postfix {
                        format!("{} (postfix)", op)
                    } else {
                        op.to_string()
                    }
                }
                Expr::Binary { op, .. } => op.to_string(),
                Expr::Logical { op, .. } => op.to_string(),
                Expr::Assign { op, .. } => op.to_string(),
                Expr::DotAccess { property, .. } => format!(".{}", property),
                _ => String::new(),
            },
            NodeRef::Property(property) => match property {
                Property::Init { key, .. } => key.to_string(),
                Property::Get { key, .. } => format!("get {}", key),
                Property::Set { key, param, .. } => format!("set {}({})", key, param),
            },
            NodeRef::VarDeclarator(decl) => decl.ident.clone(),
            NodeRef::SwitchCase(case) => {
                if case.test.is_some() {
                    "case".to_string()
                } else {
                    "default".to_string()
                }
            }
            NodeRef::CatchClause(clause) => clause.param.clone(),
            NodeRef::Program(_) | NodeRef::Elision => String::new(),
        };
        if detail.is_empty() {
            kind
        } else {
            format!("{} {}", kind, detail)
        }
    }
}

fn function_signature(function: &crate::ast::Function) -> String {
    format!(
        "{}({})",
        function.ident.as_deref().unwrap_or("<anonymous>"),
        function.params.join(", ")
    )
}

pub trait Visitor<'ast>: Sized {
    /// Entry point for generic traversal. Dispatches statements and expressions to
    /// [`Self::visit_stmt`] and [`Self::visit_expr`]; every other node is walked.
    fn visit_node(&mut self, node: NodeRef<'ast>) {
        match node {
            NodeRef::Program(program) => self.visit_program(program),
            NodeRef::Stmt(stmt) => self.visit_stmt(stmt),
            NodeRef::Expr(expr) => self.visit_expr(expr),
            _ => walk_node(self, node),
        }
    }
    fn visit_program(&mut self, program: &'ast Program) {
        walk_node(self, NodeRef::Program(program));
    }
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
}

/// Visits every child of `node`.
pub fn walk_node<'ast>(visitor: &mut impl Visitor<'ast>, node: NodeRef<'ast>) {
    for child in node.children() {
        visitor.visit_node(child);
    }
}

pub fn walk_stmt<'ast>(visitor: &mut impl Visitor<'ast>, stmt: &'ast Stmt) {
    walk_node(visitor, NodeRef::Stmt(stmt));
}

pub fn walk_expr<'ast>(visitor: &mut impl Visitor<'ast>, expr: &'ast Expr) {
    walk_node(visitor, NodeRef::Expr(expr));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[derive(Default)]
    struct IdentCollector<'ast> {
        idents: Vec<&'ast str>,
    }

    impl<'ast> Visitor<'ast> for IdentCollector<'ast> {
        fn visit_expr(&mut self, expr: &'ast Expr) {
            if let Expr::Identifier(ident) = expr {
                self.idents.push(ident);
            }
            walk_expr(self, expr);
        }
    }

    #[test]
    fn test_visitor_reaches_nested_expressions() {
        let program = parse("function f(a) { return a + b[c]; }\nvar x = { k: d, get y() { return e; } };")
            .unwrap();
        let mut collector = IdentCollector::default();
        collector.visit_program(&program);
        assert_eq!(collector.idents, vec!["a", "b", "c", "d", "e"]);
    }

    fn count_kinds(node: NodeRef, kinds: &mut Vec<NodeKind>) {
        kinds.push(node.kind());
        for child in node.children() {
            count_kinds(child, kinds);
        }
    }

    #[test]
    fn test_generic_walk_without_matching_variants() {
        let program = parse("for (var i = 0; i < 2; i++) { [1, , 2]; }").unwrap();
        let mut kinds = Vec::new();
        count_kinds(NodeRef::Program(&program), &mut kinds);
        assert_eq!(
            kinds,
            vec![
                NodeKind::Program,
                NodeKind::For,
                NodeKind::VarDeclarator,
                NodeKind::NumberLit,
                NodeKind::Binary,
                NodeKind::Identifier,
                NodeKind::NumberLit,
                NodeKind::Unary,
                NodeKind::Identifier,
                NodeKind::Block,
                NodeKind::ExprStmt,
                NodeKind::ArrayLit,
                NodeKind::NumberLit,
                NodeKind::Elision,
                NodeKind::NumberLit,
            ]
        );
    }

    #[test]
    fn test_labels() {
        let program = parse("x++; f = function (a, b) {};").unwrap();
        let first = NodeRef::Stmt(&program.body[0]);
        assert_eq!(first.children()[0].label(), "Unary ++ (postfix)");
        let assign = NodeRef::Stmt(&program.body[1]).children()[0];
        assert_eq!(assign.label(), "Assign =");
        assert_eq!(assign.children()[1].label(), "Function <anonymous>(a, b)");
    }
}
