//! Type inference seam for code generation.
//!
//! Inference proper belongs to the frontend. Codegen only needs a coarse answer for a handful of handlers that
//! pick an emission strategy by type (scalar vs. collection, string vs. number), so it talks to inference through
//! the [`TypeInferrer`] trait. Inference failures never stop code generation: [`crate::backend::NativeCodegen::infer`]
//! maps them to [`NativeType::Unknown`].
//!
//! [`ShapeInferrer`] is the default implementation: it reads types off literal shapes and remembers the types of
//! names bound by simple assignments (see [`scan_bindings`]).

use std::collections::HashMap;

use pyshim_syntax::ast::{BinaryOp, Expr, Literal, Program, Spanned, Stmt, UnaryOp};
use thiserror::Error;

/// Coarse static type of a Python expression, as far as codegen cares.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeType {
    Int,
    Float,
    Bool,
    Str,
    Bytes,
    None,
    List(Box<NativeType>),
    Tuple(Vec<NativeType>),
    Dict(Box<NativeType>, Box<NativeType>),
    Callable,
    Unknown,
}

impl NativeType {
    /// Lists, tuples, dicts, strings and bytes.
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            NativeType::List(_) | NativeType::Tuple(_) | NativeType::Dict(..) | NativeType::Str | NativeType::Bytes
        )
    }

    /// Types that can never be iterated.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            NativeType::Int | NativeType::Float | NativeType::Bool | NativeType::None
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, NativeType::Int | NativeType::Float | NativeType::Bool)
    }

    /// Element type of a homogeneous sequence.
    pub fn element(&self) -> Option<NativeType> {
        match self {
            NativeType::List(elem) => Some((**elem).clone()),
            NativeType::Str | NativeType::Bytes => Some(NativeType::Int),
            _ => None,
        }
    }

    /// Zig spelling of a scalar type, if it has a fixed one.
    pub fn zig_type(&self) -> Option<&'static str> {
        match self {
            NativeType::Int => Some("i64"),
            NativeType::Float => Some("f64"),
            NativeType::Bool => Some("bool"),
            NativeType::Str | NativeType::Bytes => Some("[]const u8"),
            _ => None,
        }
    }

    /// Least upper bound of two types (`Int ⊔ Float = Float`, anything else that differs is `Unknown`).
    pub fn unify(&self, other: &NativeType) -> NativeType {
        match (self, other) {
            (a, b) if a == b => a.clone(),
            (NativeType::Int, NativeType::Float) | (NativeType::Float, NativeType::Int) => NativeType::Float,
            _ => NativeType::Unknown,
        }
    }
}

/// Why inference could not produce a type.
#[derive(Debug, Error, PartialEq)]
pub enum InferError {
    #[error("name `{0}` has no known binding")]
    UnboundName(String),

    #[error("cannot infer the type of a {0}")]
    NotInferable(&'static str),
}

/// The inference collaborator consulted by type-directed handlers.
pub trait TypeInferrer {
    fn infer_expr(&self, expr: &Spanned<Expr>) -> Result<NativeType, InferError>;
}

/// An inferrer that knows nothing; every query fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInference;

impl TypeInferrer for NoInference {
    fn infer_expr(&self, expr: &Spanned<Expr>) -> Result<NativeType, InferError> {
        Err(InferError::NotInferable(expr.node.kind_name()))
    }
}

/// Shape-based inference over literals and previously bound names.
#[derive(Debug, Default, Clone)]
pub struct ShapeInferrer {
    bindings: HashMap<String, NativeType>,
}

impl ShapeInferrer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the type of a name.
    pub fn bind(&mut self, name: &str, ty: NativeType) {
        self.bindings.insert(name.to_string(), ty);
    }

    pub fn binding(&self, name: &str) -> Option<&NativeType> {
        self.bindings.get(name)
    }

    fn infer(&self, expr: &Expr) -> Result<NativeType, InferError> {
        match expr {
            Expr::Literal(lit) => Ok(match lit {
                Literal::Int(_) => NativeType::Int,
                Literal::Float(_) => NativeType::Float,
                Literal::Str(_) => NativeType::Str,
                Literal::Bytes(_) => NativeType::Bytes,
                Literal::Bool(_) => NativeType::Bool,
                Literal::None => NativeType::None,
            }),
            Expr::Name(name) => self
                .bindings
                .get(name)
                .cloned()
                .ok_or_else(|| InferError::UnboundName(name.clone())),
            Expr::List(items) => {
                let elem = self.unify_all(items.iter().map(|i| &i.node));
                Ok(NativeType::List(Box::new(elem)))
            }
            Expr::Tuple(items) => Ok(NativeType::Tuple(
                items
                    .iter()
                    .map(|i| self.infer(&i.node).unwrap_or(NativeType::Unknown))
                    .collect(),
            )),
            Expr::Dict(pairs) => {
                let key = self.unify_all(pairs.iter().map(|(k, _)| &k.node));
                let value = self.unify_all(pairs.iter().map(|(_, v)| &v.node));
                Ok(NativeType::Dict(Box::new(key), Box::new(value)))
            }
            Expr::Lambda(..) => Ok(NativeType::Callable),
            Expr::Unary(UnaryOp::Not, _) => Ok(NativeType::Bool),
            Expr::Unary(_, operand) => self.infer(&operand.node),
            Expr::Binary(lhs, op, rhs) => self.infer_binary(&lhs.node, *op, &rhs.node),
            Expr::IfExp { then, orelse, .. } => {
                let a = self.infer(&then.node)?;
                let b = self.infer(&orelse.node)?;
                Ok(a.unify(&b))
            }
            Expr::Subscript(base, _) => match self.infer(&base.node)? {
                NativeType::List(elem) => Ok(*elem),
                NativeType::Dict(_, value) => Ok(*value),
                NativeType::Str => Ok(NativeType::Str),
                NativeType::Bytes => Ok(NativeType::Int),
                _ => Err(InferError::NotInferable(expr.kind_name())),
            },
            Expr::Call(..) | Expr::Attribute(..) => Err(InferError::NotInferable(expr.kind_name())),
        }
    }

    fn infer_binary(&self, lhs: &Expr, op: BinaryOp, rhs: &Expr) -> Result<NativeType, InferError> {
        if op.is_comparison() {
            return Ok(NativeType::Bool);
        }
        let l = self.infer(lhs)?;
        let r = self.infer(rhs)?;
        match op {
            BinaryOp::And | BinaryOp::Or => Ok(l.unify(&r)),
            BinaryOp::Div => Ok(NativeType::Float),
            BinaryOp::Add if l == NativeType::Str && r == NativeType::Str => Ok(NativeType::Str),
            BinaryOp::Add => match (&l, &r) {
                (NativeType::List(a), NativeType::List(b)) => Ok(NativeType::List(Box::new(a.unify(b)))),
                _ => Ok(numeric_result(&l, &r)),
            },
            _ => Ok(numeric_result(&l, &r)),
        }
    }

    fn unify_all<'e>(&self, mut items: impl Iterator<Item = &'e Expr>) -> NativeType {
        let Some(first) = items.next() else {
            return NativeType::Unknown;
        };
        let mut acc = self.infer(first).unwrap_or(NativeType::Unknown);
        for item in items {
            acc = acc.unify(&self.infer(item).unwrap_or(NativeType::Unknown));
        }
        acc
    }
}

fn numeric_result(l: &NativeType, r: &NativeType) -> NativeType {
    match (l, r) {
        (NativeType::Int | NativeType::Bool, NativeType::Int | NativeType::Bool) => NativeType::Int,
        (NativeType::Float, t) | (t, NativeType::Float) if t.is_numeric() => NativeType::Float,
        _ => NativeType::Unknown,
    }
}

impl TypeInferrer for ShapeInferrer {
    fn infer_expr(&self, expr: &Spanned<Expr>) -> Result<NativeType, InferError> {
        self.infer(&expr.node)
    }
}

/// Build a [`ShapeInferrer`] from the simple assignments in a program.
///
/// Names assigned more than once with different types end up `Unknown`.
pub fn scan_bindings(program: &Program) -> ShapeInferrer {
    let mut inferrer = ShapeInferrer::new();
    for stmt in &program.body {
        if let Stmt::Assign(target, value) = &stmt.node {
            let ty = inferrer.infer(&value.node).unwrap_or(NativeType::Unknown);
            let merged = match inferrer.binding(target) {
                Some(prev) => prev.unify(&ty),
                None => ty,
            };
            inferrer.bind(target, merged);
        }
    }
    tracing::debug!(bindings = inferrer.bindings.len(), "scanned program bindings");
    inferrer
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyshim_syntax::ast::build::*;

    #[test]
    fn test_literal_shapes() {
        let inf = ShapeInferrer::new();
        assert_eq!(inf.infer_expr(&int(1)), Ok(NativeType::Int));
        assert_eq!(inf.infer_expr(&none()), Ok(NativeType::None));
        assert_eq!(
            inf.infer_expr(&list(vec![int(1), float(2.0)])),
            Ok(NativeType::List(Box::new(NativeType::Float)))
        );
        assert_eq!(
            inf.infer_expr(&list(vec![])),
            Ok(NativeType::List(Box::new(NativeType::Unknown)))
        );
    }

    #[test]
    fn test_unbound_name_is_an_error() {
        let inf = ShapeInferrer::new();
        assert_eq!(
            inf.infer_expr(&name("data")),
            Err(InferError::UnboundName("data".into()))
        );
    }

    #[test]
    fn test_scan_bindings_tracks_assignments() {
        let program = Program {
            source: None,
            body: vec![
                assign("xs", list(vec![int(3), int(1)])),
                assign("name", str("ada")),
                assign("n", int(1)),
                assign("n", str("one")),
            ],
        };
        let inf = scan_bindings(&program);
        assert_eq!(inf.binding("xs"), Some(&NativeType::List(Box::new(NativeType::Int))));
        assert_eq!(inf.binding("name"), Some(&NativeType::Str));
        assert_eq!(inf.binding("n"), Some(&NativeType::Unknown));
    }

    #[test]
    fn test_binary_types() {
        let inf = ShapeInferrer::new();
        assert_eq!(
            inf.infer_expr(&binary(int(1), BinaryOp::Div, int(2))),
            Ok(NativeType::Float)
        );
        assert_eq!(
            inf.infer_expr(&binary(int(1), BinaryOp::Lt, name("unbound"))),
            Ok(NativeType::Bool)
        );
        assert_eq!(
            inf.infer_expr(&binary(str("a"), BinaryOp::Add, str("b"))),
            Ok(NativeType::Str)
        );
    }

    #[test]
    fn test_no_inference_always_fails() {
        assert!(NoInference.infer_expr(&int(1)).is_err());
    }

    #[test]
    fn test_scalar_and_collection_classes() {
        assert!(NativeType::Int.is_scalar());
        assert!(!NativeType::Unknown.is_scalar());
        assert!(NativeType::Str.is_collection());
        assert!(!NativeType::Unknown.is_collection());
    }
}
