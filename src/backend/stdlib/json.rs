//! `json`: serialization.
//!
//! `dumps` of a value whose type is known to be a scalar is formatted inline; strings are quoted by the runtime; everything
//! else goes through the runtime serializer, which also handles `indent=`.

use super::{c, f, t};
use crate::backend::codegen::{CodegenResult, NativeCodegen, is_none_arg};
use crate::backend::dispatch::{CallArgs, ModuleTable};
use crate::backend::infer::NativeType;
use pyshim_core::lang::stdlib::StdModuleId;

pub static TABLE: ModuleTable = ModuleTable {
    module: StdModuleId::Json,
    entries: &[
        ("dumps", f(dumps)),
        ("loads", t(1, "try runtime.json.loads(allocator, $0)", "null")),
        ("dump", t(2, "try runtime.json.dump(allocator, $0, $1)", "{}")),
        ("load", t(1, "try runtime.json.load(allocator, $0)", "null")),
        ("JSONDecodeError", c("error.JSONDecodeError")),
        ("JSONEncoder", c("runtime.json.Encoder")),
        ("JSONDecoder", c("runtime.json.Decoder")),
    ],
};

/// `dumps(obj, indent=None)`
fn dumps(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let Some(obj) = args.arg(0, "obj") else {
        cg.emit("\"null\"");
        return Ok(());
    };
    let indent = args.named("indent").filter(|e| !is_none_arg(e));
    match cg.infer(obj) {
        NativeType::None => cg.emit("\"null\""),
        NativeType::Int | NativeType::Float => {
            cg.emit("try std.fmt.allocPrint(allocator, \"{d}\", .{ ");
            cg.gen_expr(obj)?;
            cg.emit(" })");
        }
        NativeType::Bool => {
            cg.emit("(if (");
            cg.gen_expr(obj)?;
            cg.emit(") \"true\" else \"false\")");
        }
        NativeType::Str => {
            cg.emit("try runtime.json.quote(allocator, ");
            cg.gen_expr(obj)?;
            cg.emit(")");
        }
        _ => match indent {
            Some(width) => {
                cg.emit("try runtime.json.dumpsIndent(allocator, ");
                cg.gen_expr(obj)?;
                cg.emit(", ");
                cg.gen_expr(width)?;
                cg.emit(")");
            }
            None => {
                cg.emit("try runtime.json.dumps(allocator, ");
                cg.gen_expr(obj)?;
                cg.emit(")");
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::infer::ShapeInferrer;
    use pyshim_syntax::ast::build::*;
    use pyshim_syntax::ast::{CallArg, Span};

    fn render(args: &[pyshim_syntax::ast::Spanned<pyshim_syntax::ast::Expr>]) -> String {
        let inferrer = ShapeInferrer::new();
        let mut cg = NativeCodegen::new(&inferrer);
        dumps(&mut cg, &CallArgs::from_slice(args)).unwrap();
        cg.finish()
    }

    #[test]
    fn test_scalars_format_inline() {
        assert_eq!(render(&[int(3)]), "try std.fmt.allocPrint(allocator, \"{d}\", .{ 3 })");
        assert_eq!(render(&[boolean(true)]), "(if (true) \"true\" else \"false\")");
        assert_eq!(render(&[none()]), "\"null\"");
        assert_eq!(render(&[str("hi")]), "try runtime.json.quote(allocator, \"hi\")");
    }

    #[test]
    fn test_collections_use_runtime() {
        assert_eq!(render(&[name("payload")]), "try runtime.json.dumps(allocator, payload)");
    }

    #[test]
    fn test_indent_keyword() {
        let call = vec![
            CallArg::Positional(name("payload")),
            CallArg::Named("indent".into(), int(2)),
        ];
        let mut cg = NativeCodegen::without_inference();
        dumps(&mut cg, &CallArgs::from_call(&call, Span::default())).unwrap();
        assert_eq!(cg.finish(), "try runtime.json.dumpsIndent(allocator, payload, 2)");
    }

    #[test]
    fn test_missing_object() {
        assert_eq!(render(&[]), "\"null\"");
    }
}
