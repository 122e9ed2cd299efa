//! `functools`: higher-order helpers.
//!
//! `reduce` picks its strategy from the inferred type of the iterable. A value known to be a scalar is a Python
//! `TypeError` at run time; it is reported as a Zig `@compileError` instead so the mistake surfaces when the output is
//! built. Decorators that only affect caching or metadata lower to the function itself.

use super::{bind_sequence, body, c, elem_type, f, t};
use crate::backend::codegen::{CodegenResult, NativeCodegen, is_none_arg};
use crate::backend::dispatch::{CallArgs, ModuleTable};
use pyshim_core::lang::stdlib::StdModuleId;
use pyshim_syntax::ast::{Expr, Literal};

pub static TABLE: ModuleTable = ModuleTable {
    module: StdModuleId::Functools,
    entries: &[
        ("reduce", f(reduce)),
        ("partial", f(partial)),
        ("lru_cache", f(lru_cache)),
        ("cache", t(1, "$0", "runtime.functools.identity")),
        ("wraps", c("runtime.functools.identity")),
        ("update_wrapper", t(1, "$0", "null")),
        ("total_ordering", t(1, "$0", "runtime.functools.identity")),
        ("cmp_to_key", t(1, "runtime.functools.cmpToKey($0)", "null")),
        ("cached_property", t(1, "$0", "runtime.functools.identity")),
        ("WRAPPER_ASSIGNMENTS", c("&[_][]const u8{ \"__module__\", \"__name__\", \"__qualname__\", \"__doc__\" }")),
        ("WRAPPER_UPDATES", c("&[_][]const u8{ \"__dict__\" }")),
    ],
};

/// `reduce(function, iterable[, initial])`
fn reduce(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let (Some(func), Some(iterable)) = (args.get(0), args.get(1)) else {
        cg.emit("null");
        return Ok(());
    };
    if cg.infer(iterable).is_scalar() {
        cg.emit("@compileError(\"reduce() arg 2 must support iteration\")");
        return Ok(());
    }
    let initial = args.arg(2, "initial");
    let label = cg.emit_unique_block_start("reduce");
    cg.emit_block_bind(&label, "f", func)?;
    let ty = bind_sequence(cg, &label, "items", iterable)?;
    let elem = ty.element();
    let acc_type = elem_type(elem.as_ref(), &label.local("items"));
    match initial {
        Some(init) => {
            cg.emit_indent();
            cg.emitf(format_args!("var {}: {} = ", label.local("acc"), acc_type))?;
            cg.gen_expr(init)?;
            cg.emit(";\n");
            body(
                cg,
                &label,
                "for ({l}_items) |{l}_x| {l}_acc = {l}_f({l}_acc, {l}_x);",
            );
        }
        None => {
            body(
                cg,
                &label,
                &format!(
                    "if ({{l}}_items.len == 0) return error.TypeError;
                    var {{l}}_acc: {acc_type} = {{l}}_items[0];
                    for ({{l}}_items[1..]) |{{l}}_x| {{l}}_acc = {{l}}_f({{l}}_acc, {{l}}_x);"
                ),
            );
        }
    }
    cg.emit_block_yield(&label, &label.local("acc"));
    Ok(())
}

/// `partial(func, *args)`: binds the leading positional arguments.
fn partial(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let Some(func) = args.get(0) else {
        cg.emit("null");
        return Ok(());
    };
    cg.emit("runtime.functools.partial(allocator, ");
    cg.gen_expr(func)?;
    cg.emit(", .{");
    let mut index = 1;
    while let Some(arg) = args.get(index) {
        cg.emit(if index == 1 { " " } else { ", " });
        cg.gen_expr(arg)?;
        index += 1;
    }
    cg.emit(if index == 1 { "})" } else { " })" });
    Ok(())
}

/// `lru_cache` is used both bare (`@lru_cache`) and called with a size (`@lru_cache(maxsize=128)`).
///
/// Called with a size or `None` it returns the identity decorator; applied directly to a function it returns that
/// function.
fn lru_cache(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    match args.get(0) {
        Some(arg) if !is_none_arg(arg) && !matches!(arg.node, Expr::Literal(Literal::Int(_))) => cg.gen_expr(arg),
        _ => {
            cg.emit("runtime.functools.identity");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::infer::ShapeInferrer;
    use pyshim_syntax::ast::build::*;

    #[test]
    fn test_reduce_over_scalar_is_compile_error() {
        let inferrer = ShapeInferrer::new();
        let mut cg = NativeCodegen::new(&inferrer);
        reduce(&mut cg, &CallArgs::from_slice(&[name("add"), int(5)])).unwrap();
        assert_eq!(cg.labels_allocated(), 0);
        assert_eq!(cg.finish(), "@compileError(\"reduce() arg 2 must support iteration\")");
    }

    #[test]
    fn test_reduce_without_initial_seeds_from_first() {
        let inferrer = ShapeInferrer::new();
        let mut cg = NativeCodegen::new(&inferrer);
        let items = list(vec![int(1), int(2), int(3)]);
        reduce(&mut cg, &CallArgs::from_slice(&[name("add"), items])).unwrap();
        let out = cg.finish();
        assert!(out.contains("const reduce_0_f = add;"));
        assert!(out.contains("const reduce_0_items = &[_]i64{ 1, 2, 3 };"));
        assert!(out.contains("if (reduce_0_items.len == 0) return error.TypeError;"));
        assert!(out.contains("var reduce_0_acc: i64 = reduce_0_items[0];"));
        assert!(out.contains("for (reduce_0_items[1..]) |reduce_0_x| reduce_0_acc = reduce_0_f(reduce_0_acc, reduce_0_x);"));
        assert!(out.ends_with("break :reduce_0 reduce_0_acc;\n}"));
    }

    #[test]
    fn test_reduce_with_initial_over_unknown_iterable() {
        let mut cg = NativeCodegen::without_inference();
        reduce(&mut cg, &CallArgs::from_slice(&[name("f"), name("xs"), int(0)])).unwrap();
        let out = cg.finish();
        assert!(out.contains("const reduce_0_items = runtime.asSlice(xs);"));
        assert!(out.contains("var reduce_0_acc: @TypeOf(reduce_0_items[0]) = 0;"));
        assert!(!out.contains("error.TypeError"));
    }

    #[test]
    fn test_partial_binds_leading_args() {
        let mut cg = NativeCodegen::without_inference();
        partial(&mut cg, &CallArgs::from_slice(&[name("pow"), int(2)])).unwrap();
        cg.emit(" ");
        partial(&mut cg, &CallArgs::from_slice(&[name("g")])).unwrap();
        assert_eq!(cg.finish(), "runtime.functools.partial(allocator, pow, .{ 2 }) runtime.functools.partial(allocator, g, .{})");
    }

    #[test]
    fn test_lru_cache_forms() {
        let mut cg = NativeCodegen::without_inference();
        lru_cache(&mut cg, &CallArgs::from_slice(&[int(128)])).unwrap();
        cg.emit(" ");
        lru_cache(&mut cg, &CallArgs::from_slice(&[none()])).unwrap();
        cg.emit(" ");
        lru_cache(&mut cg, &CallArgs::from_slice(&[name("fib")])).unwrap();
        assert_eq!(cg.finish(), "runtime.functools.identity runtime.functools.identity fib");
    }
}
