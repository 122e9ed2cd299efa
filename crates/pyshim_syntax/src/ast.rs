//! Abstract Syntax Tree definitions for the Python subset pyshim consumes.
//!
//! The tree is produced by an external parser and handed to the code generator as a borrowed structure. Codegen
//! never mutates or frees nodes; it only reads them.
//!
//! All node types derive `serde` traits so a parsed program can be exchanged as JSON (see [`crate::load`]).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub node: T,
    #[serde(default)]
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    /// Wrap a node with an empty span (synthesized nodes, tests).
    pub fn bare(node: T) -> Self {
        Self {
            node,
            span: Span::default(),
        }
    }
}

/// Identifier
pub type Ident = String;

/// A compilation unit: the module body in source order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    /// Original source text, when the producer supplies it (used for diagnostics only).
    #[serde(default)]
    pub source: Option<String>,
    pub body: Vec<Spanned<Stmt>>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// `import calendar` / `import calendar as cal`
    Import(ImportStmt),
    /// `from bisect import bisect_left, insort as ins`
    ImportFrom(ImportFromStmt),
    /// `x = expr`
    Assign(Ident, Spanned<Expr>),
    /// Expression statement
    Expr(Spanned<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportStmt {
    pub module: Ident,
    #[serde(default)]
    pub alias: Option<Ident>,
}

impl ImportStmt {
    /// The name the module is bound to in the importing scope.
    pub fn binding(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.module)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportFromStmt {
    pub module: Ident,
    pub names: Vec<ImportItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportItem {
    pub name: Ident,
    #[serde(default)]
    pub alias: Option<Ident>,
}

impl ImportItem {
    pub fn binding(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Identifier
    Name(Ident),
    /// Literal constant
    Literal(Literal),
    /// Binary operation: `a + b`, `a < b`, `a and b`
    Binary(Box<Spanned<Expr>>, BinaryOp, Box<Spanned<Expr>>),
    /// Unary operation: `-x`, `not x`, `~x`
    Unary(UnaryOp, Box<Spanned<Expr>>),
    /// Call: `f(a, b, key=c)`
    Call(Box<Spanned<Expr>>, Vec<CallArg>),
    /// Attribute access: `x.attr`
    Attribute(Box<Spanned<Expr>>, Ident),
    /// Subscript: `x[i]`
    Subscript(Box<Spanned<Expr>>, Box<Spanned<Expr>>),
    /// Conditional expression: `a if cond else b`
    IfExp {
        cond: Box<Spanned<Expr>>,
        then: Box<Spanned<Expr>>,
        orelse: Box<Spanned<Expr>>,
    },
    /// `lambda x, y: body`
    Lambda(Vec<Ident>, Box<Spanned<Expr>>),
    /// Tuple: `(a, b)`
    Tuple(Vec<Spanned<Expr>>),
    /// List literal: `[a, b, c]`
    List(Vec<Spanned<Expr>>),
    /// Dict literal: `{k: v, ...}`
    Dict(Vec<(Spanned<Expr>, Spanned<Expr>)>),
}

impl Expr {
    /// Short human-readable name of the node kind (for diagnostics).
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Name(_) => "name",
            Expr::Literal(_) => "constant",
            Expr::Binary(..) => "binary operation",
            Expr::Unary(..) => "unary operation",
            Expr::Call(..) => "call",
            Expr::Attribute(..) => "attribute",
            Expr::Subscript(..) => "subscript",
            Expr::IfExp { .. } => "conditional expression",
            Expr::Lambda(..) => "lambda",
            Expr::Tuple(_) => "tuple",
            Expr::List(_) => "list",
            Expr::Dict(_) => "dict",
        }
    }

    /// Whether this is the explicit `None` constant.
    pub fn is_none_literal(&self) -> bool {
        matches!(self, Expr::Literal(Literal::None))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Bool(bool),
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CallArg {
    Positional(Spanned<Expr>),
    Named(Ident, Spanned<Expr>),
}

impl CallArg {
    pub fn value(&self) -> &Spanned<Expr> {
        match self {
            CallArg::Positional(e) | CallArg::Named(_, e) => e,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv, // // (Python-style floor division)
    Mod,
    Pow,
    BitAnd,
    BitOr,
    BitXor,
    LShift,
    RShift,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
    In,
    NotIn,
    Is,
    IsNot,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::Gt
                | BinaryOp::LtEq
                | BinaryOp::GtEq
                | BinaryOp::In
                | BinaryOp::NotIn
                | BinaryOp::Is
                | BinaryOp::IsNot
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::LShift => "<<",
            BinaryOp::RShift => ">>",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::In => "in",
            BinaryOp::NotIn => "not in",
            BinaryOp::Is => "is",
            BinaryOp::IsNot => "is not",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
    Invert,
}

// ============================================================================
// Construction helpers
// ============================================================================

/// Terse constructors for building trees by hand (tests, synthesized calls).
pub mod build {
    use super::*;

    pub fn name(id: &str) -> Spanned<Expr> {
        Spanned::bare(Expr::Name(id.to_string()))
    }

    pub fn int(v: i64) -> Spanned<Expr> {
        Spanned::bare(Expr::Literal(Literal::Int(v)))
    }

    pub fn float(v: f64) -> Spanned<Expr> {
        Spanned::bare(Expr::Literal(Literal::Float(v)))
    }

    pub fn str(v: &str) -> Spanned<Expr> {
        Spanned::bare(Expr::Literal(Literal::Str(v.to_string())))
    }

    pub fn boolean(v: bool) -> Spanned<Expr> {
        Spanned::bare(Expr::Literal(Literal::Bool(v)))
    }

    pub fn none() -> Spanned<Expr> {
        Spanned::bare(Expr::Literal(Literal::None))
    }

    pub fn list(items: Vec<Spanned<Expr>>) -> Spanned<Expr> {
        Spanned::bare(Expr::List(items))
    }

    pub fn attr(base: Spanned<Expr>, attr: &str) -> Spanned<Expr> {
        Spanned::bare(Expr::Attribute(Box::new(base), attr.to_string()))
    }

    pub fn binary(lhs: Spanned<Expr>, op: BinaryOp, rhs: Spanned<Expr>) -> Spanned<Expr> {
        Spanned::bare(Expr::Binary(Box::new(lhs), op, Box::new(rhs)))
    }

    pub fn call(func: Spanned<Expr>, args: Vec<Spanned<Expr>>) -> Spanned<Expr> {
        Spanned::bare(Expr::Call(
            Box::new(func),
            args.into_iter().map(CallArg::Positional).collect(),
        ))
    }

    /// `module.symbol(args...)`
    pub fn module_call(module: &str, symbol: &str, args: Vec<Spanned<Expr>>) -> Spanned<Expr> {
        call(attr(name(module), symbol), args)
    }

    pub fn lambda(params: &[&str], body: Spanned<Expr>) -> Spanned<Expr> {
        Spanned::bare(Expr::Lambda(
            params.iter().map(|p| p.to_string()).collect(),
            Box::new(body),
        ))
    }

    pub fn import(module: &str) -> Spanned<Stmt> {
        Spanned::bare(Stmt::Import(ImportStmt {
            module: module.to_string(),
            alias: None,
        }))
    }

    pub fn expr_stmt(expr: Spanned<Expr>) -> Spanned<Stmt> {
        Spanned::bare(Stmt::Expr(expr))
    }

    pub fn assign(target: &str, value: Spanned<Expr>) -> Spanned<Stmt> {
        Spanned::bare(Stmt::Assign(target.to_string(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge() {
        let a = Span::new(4, 9);
        let b = Span::new(1, 6);
        assert_eq!(a.merge(b), Span::new(1, 9));
    }

    #[test]
    fn test_import_binding_prefers_alias() {
        let plain = ImportStmt {
            module: "calendar".into(),
            alias: None,
        };
        let aliased = ImportStmt {
            module: "calendar".into(),
            alias: Some("cal".into()),
        };
        assert_eq!(plain.binding(), "calendar");
        assert_eq!(aliased.binding(), "cal");
    }

    #[test]
    fn test_none_literal_detection() {
        assert!(build::none().node.is_none_literal());
        assert!(!build::int(0).node.is_none_literal());
        assert!(!build::name("None").node.is_none_literal());
    }

    #[test]
    fn test_comparison_ops() {
        assert!(BinaryOp::Lt.is_comparison());
        assert!(BinaryOp::IsNot.is_comparison());
        assert!(!BinaryOp::Add.is_comparison());
        assert!(!BinaryOp::And.is_comparison());
    }
}
