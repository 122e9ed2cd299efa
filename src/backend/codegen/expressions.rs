//! Expression emission for code generation
//!
//! Renders one borrowed expression node as Zig text. Calls that resolve to an emulated stdlib symbol are routed
//! through the dispatcher. A symbol read without a call expands only if it is a constant; stdlib functions cannot be
//! passed around as values. Everything else is rendered structurally.

use pyshim_syntax::ast::{BinaryOp, CallArg, Expr, Literal, Spanned, UnaryOp};

use crate::backend::dispatch::CallArgs;
use crate::backend::infer::NativeType;
use crate::backend::zig_emitter::{to_zig_ident, zig_float_literal, zig_string_literal};

use super::{CodegenError, CodegenResult, NativeCodegen};

/// Whether `expr` is the explicit `None` constant.
///
/// Optional parameters may be passed as `None` explicitly, so handlers check the argument itself instead of relying
/// on the argument count.
pub fn is_none_arg(expr: &Spanned<Expr>) -> bool {
    expr.node.is_none_literal()
}

impl NativeCodegen<'_> {
    /// Emit an expression.
    pub fn gen_expr(&mut self, expr: &Spanned<Expr>) -> CodegenResult<()> {
        match &expr.node {
            Expr::Name(name) => self.gen_name(name, expr),
            Expr::Literal(lit) => {
                self.gen_literal(lit);
                Ok(())
            }
            Expr::Binary(lhs, op, rhs) => self.gen_binary(lhs, *op, rhs),
            Expr::Unary(op, operand) => {
                self.emit(match op {
                    UnaryOp::Neg => "(-",
                    UnaryOp::Not => "(!",
                    UnaryOp::Invert => "(~",
                });
                self.gen_expr(operand)?;
                self.emit(")");
                Ok(())
            }
            Expr::Call(func, args) => self.gen_call(func, args, expr),
            Expr::Attribute(base, attr) => {
                if let Expr::Name(binding) = &base.node {
                    if let Some(module) = self.imports.module(binding) {
                        return self.read_symbol(module, attr, expr.span);
                    }
                }
                self.gen_expr(base)?;
                self.emit(".");
                self.emit(&to_zig_ident(attr));
                Ok(())
            }
            Expr::Subscript(base, index) => self.gen_subscript(base, index),
            Expr::IfExp { cond, then, orelse } => {
                self.emit("(if (");
                self.gen_expr(cond)?;
                self.emit(") ");
                self.gen_expr(then)?;
                self.emit(" else ");
                self.gen_expr(orelse)?;
                self.emit(")");
                Ok(())
            }
            Expr::Lambda(params, body) => self.gen_lambda(params, body, expr),
            Expr::Tuple(items) => self.gen_anon_list(items),
            Expr::List(items) => {
                let elem = match self.infer(expr) {
                    NativeType::List(elem) => elem.zig_type(),
                    _ => None,
                };
                match elem {
                    Some(ty) if !items.is_empty() => {
                        self.emitf(format_args!("&[_]{}{{ ", ty))?;
                        self.gen_comma_list(items)?;
                        self.emit(" }");
                        Ok(())
                    }
                    _ => self.gen_anon_list(items),
                }
            }
            Expr::Dict(pairs) => {
                self.emit("runtime.PyDict.fromPairs(allocator, .{");
                for (i, (key, value)) in pairs.iter().enumerate() {
                    self.emit(if i == 0 { " .{ " } else { ", .{ " });
                    self.gen_expr(key)?;
                    self.emit(", ");
                    self.gen_expr(value)?;
                    self.emit(" }");
                }
                self.emit(if pairs.is_empty() { "})" } else { " })" });
                Ok(())
            }
        }
    }

    fn gen_name(&mut self, name: &str, expr: &Spanned<Expr>) -> CodegenResult<()> {
        if let Some((module, symbol)) = self.imports.symbol(name) {
            let symbol = symbol.to_string();
            return self.read_symbol(module, &symbol, expr.span);
        }
        if self.imports.module(name).is_some() {
            return Err(CodegenError::unsupported(
                format!("module `{}` used as a value", name),
                expr.span,
            ));
        }
        self.emit(&to_zig_ident(name));
        Ok(())
    }

    fn gen_literal(&mut self, lit: &Literal) {
        match lit {
            Literal::Int(v) => self.emit(&v.to_string()),
            Literal::Float(v) => self.emit(&zig_float_literal(*v)),
            Literal::Str(s) => self.emit(&zig_string_literal(s.as_bytes())),
            Literal::Bytes(b) => self.emit(&zig_string_literal(b)),
            Literal::Bool(true) => self.emit("true"),
            Literal::Bool(false) => self.emit("false"),
            Literal::None => self.emit("null"),
        }
    }

    fn gen_binary(&mut self, lhs: &Spanned<Expr>, op: BinaryOp, rhs: &Spanned<Expr>) -> CodegenResult<()> {
        let strings = self.infer(lhs) == NativeType::Str || self.infer(rhs) == NativeType::Str;
        match op {
            BinaryOp::Eq | BinaryOp::NotEq if strings => {
                self.emit(if op == BinaryOp::Eq { "std.mem.eql(u8, " } else { "!std.mem.eql(u8, " });
                self.gen_pair(lhs, rhs)
            }
            // Only `lessThan` exists; the other orderings swap or negate it.
            BinaryOp::Lt | BinaryOp::GtEq if strings => {
                self.emit(if op == BinaryOp::Lt { "std.mem.lessThan(u8, " } else { "!std.mem.lessThan(u8, " });
                self.gen_pair(lhs, rhs)
            }
            BinaryOp::Gt | BinaryOp::LtEq if strings => {
                self.emit(if op == BinaryOp::Gt { "std.mem.lessThan(u8, " } else { "!std.mem.lessThan(u8, " });
                self.gen_pair(rhs, lhs)
            }
            BinaryOp::Is | BinaryOp::IsNot if is_none_arg(rhs) => {
                self.emit("(");
                self.gen_expr(lhs)?;
                self.emit(if op == BinaryOp::Is { " == null)" } else { " != null)" });
                Ok(())
            }
            BinaryOp::In | BinaryOp::NotIn => {
                self.emit(if op == BinaryOp::In { "runtime.contains(" } else { "!runtime.contains(" });
                self.gen_pair(rhs, lhs)
            }
            BinaryOp::FloorDiv => {
                self.emit("@divFloor(");
                self.gen_pair(lhs, rhs)
            }
            BinaryOp::Mod => {
                self.emit("@mod(");
                self.gen_pair(lhs, rhs)
            }
            BinaryOp::Pow => {
                self.emit("runtime.pow(");
                self.gen_pair(lhs, rhs)
            }
            BinaryOp::Add if strings => {
                self.emit("runtime.concat(allocator, ");
                self.gen_pair(lhs, rhs)
            }
            _ => {
                let symbol = match op {
                    BinaryOp::Add => "+",
                    BinaryOp::Sub => "-",
                    BinaryOp::Mul => "*",
                    BinaryOp::Div => "/",
                    BinaryOp::BitAnd => "&",
                    BinaryOp::BitOr => "|",
                    BinaryOp::BitXor => "^",
                    BinaryOp::LShift => "<<",
                    BinaryOp::RShift => ">>",
                    BinaryOp::Eq | BinaryOp::Is => "==",
                    BinaryOp::NotEq | BinaryOp::IsNot => "!=",
                    BinaryOp::Lt => "<",
                    BinaryOp::Gt => ">",
                    BinaryOp::LtEq => "<=",
                    BinaryOp::GtEq => ">=",
                    BinaryOp::And => "and",
                    BinaryOp::Or => "or",
                    BinaryOp::FloorDiv | BinaryOp::Mod | BinaryOp::Pow | BinaryOp::In | BinaryOp::NotIn => {
                        unreachable!("handled above")
                    }
                };
                self.emit("(");
                self.gen_expr(lhs)?;
                self.emitf(format_args!(" {} ", symbol))?;
                self.gen_expr(rhs)?;
                self.emit(")");
                Ok(())
            }
        }
    }

    /// `a, b)`: the caller has written the opening `name(`.
    fn gen_pair(&mut self, a: &Spanned<Expr>, b: &Spanned<Expr>) -> CodegenResult<()> {
        self.gen_expr(a)?;
        self.emit(", ");
        self.gen_expr(b)?;
        self.emit(")");
        Ok(())
    }

    fn gen_call(&mut self, func: &Spanned<Expr>, args: &[CallArg], expr: &Spanned<Expr>) -> CodegenResult<()> {
        if let Some((module, symbol)) = self.resolve_callee(func) {
            let call_args = CallArgs::from_call(args, expr.span);
            return self.dispatch(module, &symbol, &call_args);
        }

        if let Some(CallArg::Named(keyword, value)) = args.iter().find(|a| matches!(a, CallArg::Named(..))) {
            return Err(CodegenError::unsupported(
                format!("keyword argument `{}` in a call to a non-stdlib function", keyword),
                value.span,
            ));
        }

        self.gen_expr(func)?;
        self.emit("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            self.gen_expr(arg.value())?;
        }
        self.emit(")");
        Ok(())
    }

    fn gen_subscript(&mut self, base: &Spanned<Expr>, index: &Spanned<Expr>) -> CodegenResult<()> {
        if let NativeType::Dict(..) = self.infer(base) {
            self.gen_expr(base)?;
            self.emit(".get(");
            self.gen_expr(index)?;
            self.emit(").?");
            return Ok(());
        }
        match &index.node {
            Expr::Literal(Literal::Int(i)) if *i >= 0 => {
                self.gen_expr(base)?;
                self.emitf(format_args!("[{}]", i))?;
                Ok(())
            }
            // Negative and computed indices go through the runtime so Python's wrap-around applies.
            _ => {
                self.emit("runtime.index(");
                self.gen_pair(base, index)
            }
        }
    }

    /// Render `lambda a, b: body` as an anonymous struct's function.
    fn gen_lambda(&mut self, params: &[String], body: &Spanned<Expr>, expr: &Spanned<Expr>) -> CodegenResult<()> {
        let return_type = match params.first() {
            Some(first) => format!("@TypeOf({})", to_zig_ident(first)),
            None => match self.infer(body).zig_type() {
                Some(ty) => ty.to_string(),
                None => {
                    return Err(CodegenError::unsupported(
                        "lambda without parameters whose result type is unknown",
                        expr.span,
                    ));
                }
            },
        };

        self.emit("struct { fn call(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            self.emitf(format_args!("{}: anytype", to_zig_ident(param)))?;
        }
        self.emitf(format_args!(") {} {{ ", return_type))?;
        // Zig rejects unused parameters.
        for param in params {
            if !mentions(body, param) {
                self.emitf(format_args!("_ = {}; ", to_zig_ident(param)))?;
            }
        }
        self.emit("return ");
        self.gen_expr(body)?;
        self.emit("; } }.call");
        Ok(())
    }

    fn gen_anon_list(&mut self, items: &[Spanned<Expr>]) -> CodegenResult<()> {
        if items.is_empty() {
            self.emit(".{}");
            return Ok(());
        }
        self.emit(".{ ");
        self.gen_comma_list(items)?;
        self.emit(" }");
        Ok(())
    }

    /// Emit `items` separated by `, `.
    pub(crate) fn gen_comma_list(&mut self, items: &[Spanned<Expr>]) -> CodegenResult<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            self.gen_expr(item)?;
        }
        Ok(())
    }
}

/// Whether `name` occurs free in `expr`.
fn mentions(expr: &Spanned<Expr>, name: &str) -> bool {
    match &expr.node {
        Expr::Name(n) => n == name,
        Expr::Literal(_) => false,
        Expr::Binary(l, _, r) | Expr::Subscript(l, r) => mentions(l, name) || mentions(r, name),
        Expr::Unary(_, e) | Expr::Attribute(e, _) => mentions(e, name),
        Expr::Call(func, args) => mentions(func, name) || args.iter().any(|a| mentions(a.value(), name)),
        Expr::IfExp { cond, then, orelse } => {
            mentions(cond, name) || mentions(then, name) || mentions(orelse, name)
        }
        Expr::Lambda(params, body) => !params.iter().any(|p| p == name) && mentions(body, name),
        Expr::Tuple(items) | Expr::List(items) => items.iter().any(|i| mentions(i, name)),
        Expr::Dict(pairs) => pairs.iter().any(|(k, v)| mentions(k, name) || mentions(v, name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::infer::ShapeInferrer;
    use pyshim_syntax::ast::Span;
    use pyshim_syntax::ast::build::*;

    fn render(expr: &Spanned<Expr>) -> String {
        let mut cg = NativeCodegen::without_inference();
        cg.gen_expr(expr).unwrap();
        cg.finish()
    }

    #[test]
    fn test_literals() {
        assert_eq!(render(&int(42)), "42");
        assert_eq!(render(&float(0.5)), "0.5");
        assert_eq!(render(&str("hi\n")), "\"hi\\n\"");
        assert_eq!(render(&none()), "null");
        assert_eq!(render(&boolean(true)), "true");
    }

    #[test]
    fn test_operators() {
        assert_eq!(render(&binary(name("a"), BinaryOp::Add, int(1))), "(a + 1)");
        assert_eq!(render(&binary(name("a"), BinaryOp::Mod, int(7))), "@mod(a, 7)");
        assert_eq!(render(&binary(name("a"), BinaryOp::And, name("b"))), "(a and b)");
        assert_eq!(render(&binary(name("x"), BinaryOp::Is, none())), "(x == null)");
        assert_eq!(render(&binary(int(1), BinaryOp::In, name("xs"))), "runtime.contains(xs, 1)");
    }

    #[test]
    fn test_string_comparison_uses_mem() {
        let inferrer = ShapeInferrer::new();
        let mut cg = NativeCodegen::new(&inferrer);
        cg.gen_expr(&binary(str("a"), BinaryOp::Eq, name("s"))).unwrap();
        cg.emit(" ");
        cg.gen_expr(&binary(str("a"), BinaryOp::Gt, str("b"))).unwrap();
        assert_eq!(
            cg.finish(),
            "std.mem.eql(u8, \"a\", s) std.mem.lessThan(u8, \"b\", \"a\")"
        );
    }

    #[test]
    fn test_list_literal_typing() {
        let inferrer = ShapeInferrer::new();
        let mut cg = NativeCodegen::new(&inferrer);
        cg.gen_expr(&list(vec![int(1), int(2)])).unwrap();
        cg.emit(" ");
        cg.gen_expr(&list(vec![name("a"), int(2)])).unwrap();
        cg.emit(" ");
        cg.gen_expr(&list(vec![])).unwrap();
        assert_eq!(cg.finish(), "&[_]i64{ 1, 2 } .{ a, 2 } .{}");
    }

    #[test]
    fn test_lambda_discards_unused_params() {
        let out = render(&lambda(&["acc", "x"], binary(name("acc"), BinaryOp::Mul, int(2))));
        assert_eq!(
            out,
            "struct { fn call(acc: anytype, x: anytype) @TypeOf(acc) { _ = x; return (acc * 2); } }.call"
        );
    }

    #[test]
    fn test_keyword_on_plain_call_is_unsupported() {
        let call = Spanned::bare(Expr::Call(
            Box::new(name("f")),
            vec![CallArg::Named("key".into(), int(1))],
        ));
        let mut cg = NativeCodegen::without_inference();
        let err = cg.gen_expr(&call).unwrap_err();
        assert!(matches!(err, CodegenError::Unsupported { .. }));
    }

    #[test]
    fn test_module_constant_read_expands() {
        let mut cg = NativeCodegen::without_inference();
        cg.register_import("calendar", Some("cal"), Span::default()).unwrap();
        cg.gen_expr(&attr(name("cal"), "SUNDAY")).unwrap();
        assert_eq!(cg.finish(), "6");
    }

    #[test]
    fn test_function_read_as_value_is_unsupported() {
        let mut cg = NativeCodegen::without_inference();
        cg.register_import("calendar", None, Span::default()).unwrap();
        let read = Spanned::new(
            Expr::Attribute(Box::new(name("calendar")), "isleap".into()),
            Span::new(4, 19),
        );
        match cg.gen_expr(&read).unwrap_err() {
            CodegenError::Unsupported { construct, span } => {
                assert_eq!(construct, "`calendar.isleap` used as a value");
                assert_eq!(span, Span::new(4, 19));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(cg.output(), "");
    }

    #[test]
    fn test_from_imported_function_read_as_value_is_unsupported() {
        let mut cg = NativeCodegen::without_inference();
        cg.register_from_import("json", "dumps", Some("encode"), Span::default()).unwrap();
        cg.register_from_import("errno", "ENOENT", None, Span::default()).unwrap();
        let err = cg.gen_expr(&name("encode")).unwrap_err();
        assert!(err.to_string().contains("`json.dumps` used as a value"));
        cg.gen_expr(&name("ENOENT")).unwrap();
        assert_eq!(cg.finish(), "2");
    }

    #[test]
    fn test_none_arg_is_structural() {
        assert!(is_none_arg(&none()));
        assert!(!is_none_arg(&name("None")));
    }

    #[test]
    fn test_subscript_forms() {
        assert_eq!(
            render(&Spanned::bare(Expr::Subscript(Box::new(name("xs")), Box::new(int(0))))),
            "xs[0]"
        );
        assert_eq!(
            render(&Spanned::bare(Expr::Subscript(Box::new(name("xs")), Box::new(int(-1))))),
            "runtime.index(xs, -1)"
        );
    }
}
