//! ECMAScript 5 syntax tree.
//!
//! Nodes own their children and are never mutated after construction.

use std::fmt;

/// Root of a parsed source unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Statements, function declarations and comments, in source order.
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    /// Text between the delimiters.
    pub text: String,
}

/// A function declaration or expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Always present for declarations.
    pub ident: Option<String>,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    This,
    /// An identifier (e.g. `foo`).
    Identifier(String),
    NullLit,
    BoolLit(bool),
    NumberLit(f64),
    /// Cooked string value (escapes resolved).
    StringLit(String),
    /// A regular expression literal (e.g. `/foo/g`).
    RegexLit {
        pattern: String,
        flags: String,
    },
    /// An array literal. `None` marks a hole (e.g. `[1, , 2]`).
    ArrayLit(Vec<Option<Expr>>),
    ObjectLit(Vec<Property>),
    Function(Function),
    /// A unary expression (e.g. `!a`, `typeof a`, `a++`).
    Unary {
        op: UnaryOp,
        arg: Box<Expr>,
        is_postfix: bool,
    },
    /// A binary expression (e.g. `1+1`).
    Binary {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },
    /// `&&` and `||`.
    Logical {
        lhs: Box<Expr>,
        op: LogicalOp,
        rhs: Box<Expr>,
    },
    /// An assignment (e.g. `a = b`, `a += 1`).
    Assign {
        target: Box<Expr>,
        op: AssignOp,
        value: Box<Expr>,
    },
    /// `test ? consequent : alternate`
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    /// `object.property`
    DotAccess {
        object: Box<Expr>,
        property: String,
    },
    /// `object[property]`
    BracketAccess {
        object: Box<Expr>,
        property: Box<Expr>,
    },
    /// A call expression (e.g. `foo(1, bar)`).
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `new callee(args)`. `new Foo` has no arguments.
    New {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// Comma operator (e.g. `a, b, c`).
    Sequence(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    Identifier(String),
    StringLit(String),
    NumberLit(f64),
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Identifier(ident) => write!(f, "{}", ident),
            PropertyKey::StringLit(val) => write!(f, "{:?}", val),
            PropertyKey::NumberLit(val) => write!(f, "{}", val),
        }
    }
}

/// A member of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    /// `key: value`
    Init { key: PropertyKey, value: Expr },
    /// `get key() { body }`
    Get { key: PropertyKey, body: Vec<Stmt> },
    /// `set key(param) { body }`
    Set {
        key: PropertyKey,
        param: String,
        body: Vec<Stmt>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub ident: String,
    pub initializer: Option<Expr>,
}

/// Initializer clause of a three-clause `for`.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Var(Vec<VarDeclarator>),
    Expr(Expr),
}

/// Left side of `for (... in ...)`.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInTarget {
    Var(VarDeclarator),
    Expr(Expr),
}

/// A `case` clause, or the `default` clause when `test` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub test: Option<Expr>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub param: String,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Vec<Stmt>),
    /// `var a = 1, b;`
    Var(Vec<VarDeclarator>),
    Empty,
    ExprStmt(Expr),
    If {
        test: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
    },
    DoWhile {
        body: Box<Stmt>,
        test: Expr,
    },
    While {
        test: Expr,
        body: Box<Stmt>,
    },
    For {
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    ForIn {
        target: ForInTarget,
        object: Expr,
        body: Box<Stmt>,
    },
    Continue(Option<String>),
    Break(Option<String>),
    Return(Option<Expr>),
    With {
        object: Expr,
        body: Box<Stmt>,
    },
    /// Clauses (including `default`) in source order.
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
    },
    Labelled {
        label: String,
        body: Box<Stmt>,
    },
    Throw(Expr),
    /// `block` and `finalizer` are always [`Stmt::Block`].
    Try {
        block: Box<Stmt>,
        handler: Option<CatchClause>,
        finalizer: Option<Box<Stmt>>,
    },
    Debugger,
    FnDeclaration(Function),
    Comment(Comment),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Delete,
    Void,
    Typeof,
    Increment,
    Decrement,
    Plus,
    Minus,
    BitNot,
    LogicalNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    LessThan,
    GreaterThan,
    LessThanEquals,
    GreaterThanEquals,
    Instanceof,
    In,
    Equals,
    NotEquals,
    StrictEquals,
    StrictNotEquals,
    BitAnd,
    BitXor,
    BitOr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    BitAnd,
    BitXor,
    BitOr,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Delete => "delete",
            UnaryOp::Void => "void",
            UnaryOp::Typeof => "typeof",
            UnaryOp::Increment => "++",
            UnaryOp::Decrement => "--",
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::BitNot => "~",
            UnaryOp::LogicalNot => "!",
        }
    }
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
            BinaryOp::UnsignedShiftRight => ">>>",
            BinaryOp::LessThan => "<",
            BinaryOp::GreaterThan => ">",
            BinaryOp::LessThanEquals => "<=",
            BinaryOp::GreaterThanEquals => ">=",
            BinaryOp::Instanceof => "instanceof",
            BinaryOp::In => "in",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::StrictEquals => "===",
            BinaryOp::StrictNotEquals => "!==",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitXor => "^",
            BinaryOp::BitOr => "|",
        }
    }
}

impl LogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::ShiftLeft => "<<=",
            AssignOp::ShiftRight => ">>=",
            AssignOp::UnsignedShiftRight => ">>>=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitXor => "^=",
            AssignOp::BitOr => "|=",
        }
    }
}

macro_rules! impl_display_as_str {
    ($($ty: ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

impl_display_as_str!(UnaryOp, BinaryOp, LogicalOp, AssignOp);
