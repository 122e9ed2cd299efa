//! `bisect`: binary search over sorted sequences.
//!
//! Searches are inlined as a lower/upper-bound loop over the sequence; insertions run the same search and insert into
//! the runtime list in place.

use super::{bind_sequence, body, c, f, less_than};
use crate::backend::codegen::{BlockLabel, CodegenResult, NativeCodegen};
use crate::backend::codegen::is_none_arg;
use crate::backend::dispatch::{CallArgs, ModuleTable};
use crate::backend::infer::NativeType;
use pyshim_core::lang::stdlib::StdModuleId;

pub static TABLE: ModuleTable = ModuleTable {
    module: StdModuleId::Bisect,
    entries: &[
        ("bisect_left", f(bisect_left)),
        ("bisect_right", f(bisect_right)),
        ("bisect", f(bisect_right)),
        ("insort_left", f(insort_left)),
        ("insort_right", f(insort_right)),
        ("insort", f(insort_right)),
        ("__all__", c("&[_][]const u8{ \"bisect\", \"bisect_left\", \"bisect_right\", \"insort\", \"insort_left\", \"insort_right\" }")),
    ],
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

fn bisect_left(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    search(cg, args, Side::Left, "bisect_left")
}

fn bisect_right(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    search(cg, args, Side::Right, "bisect_right")
}

fn insort_left(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    insort(cg, args, Side::Left, "insort_left")
}

fn insort_right(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    insort(cg, args, Side::Right, "insort_right")
}

/// `bisect_*(a, x, lo=0, hi=len(a))`, yielding the insertion index as `i64`.
fn search(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>, side: Side, base: &str) -> CodegenResult<()> {
    let (Some(seq), Some(value)) = (args.arg(0, "a"), args.arg(1, "x")) else {
        cg.emit("0");
        return Ok(());
    };
    let label = cg.emit_unique_block_start(base);
    let ty = bind_sequence(cg, &label, "a", seq)?;
    cg.emit_block_bind(&label, "x", value)?;
    emit_bounds(cg, &label, args, "{l}_a.len")?;
    emit_search_loop(cg, &label, "{l}_a", ty.element().as_ref(), side);
    cg.emit_block_yield(&label, &format!("@as(i64, @intCast({}))", label.local("lo")));
    Ok(())
}

/// `insort_*(a, x, lo=0, hi=len(a))`: the list is a runtime list and is modified in place.
fn insort(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>, side: Side, base: &str) -> CodegenResult<()> {
    let (Some(list), Some(value)) = (args.arg(0, "a"), args.arg(1, "x")) else {
        cg.emit("{}");
        return Ok(());
    };
    let label = cg.emit_unique_block_start(base);
    let elem = cg.infer(list).element();
    cg.emit_block_bind(&label, "list", list)?;
    cg.emit_block_bind(&label, "x", value)?;
    emit_bounds(cg, &label, args, "{l}_list.items.len")?;
    emit_search_loop(cg, &label, "{l}_list.items", elem.as_ref(), side);
    cg.emit_block_line(&label, "try {l}_list.insert(allocator, {l}_lo, {l}_x);");
    cg.emit_block_yield(&label, "{}");
    Ok(())
}

/// Declare `{l}_lo` and `{l}_hi` from the optional `lo`/`hi` arguments.
fn emit_bounds(cg: &mut NativeCodegen<'_>, label: &BlockLabel, args: &CallArgs<'_>, len: &str) -> CodegenResult<()> {
    match args.arg(2, "lo").filter(|lo| !is_none_arg(lo)) {
        Some(lo) => cg.emit_block_bind_wrapped(label, "lo_init", "@as(usize, @intCast(", lo, "))")?,
        None => cg.emit_block_line(label, "const {l}_lo_init: usize = 0;"),
    }
    match args.arg(3, "hi").filter(|hi| !is_none_arg(hi)) {
        Some(hi) => cg.emit_block_bind_wrapped(label, "hi_init", "@as(usize, @intCast(", hi, "))")?,
        None => cg.emit_block_line(label, &format!("const {{l}}_hi_init: usize = {};", len)),
    }
    cg.emit_block_line(label, "var {l}_lo: usize = {l}_lo_init;");
    cg.emit_block_line(label, "var {l}_hi: usize = {l}_hi_init;");
    Ok(())
}

/// Narrow `{l}_lo`/`{l}_hi` to the insertion point of `{l}_x` in `items`.
fn emit_search_loop(cg: &mut NativeCodegen<'_>, label: &BlockLabel, items: &str, elem: Option<&NativeType>, side: Side) {
    let probe = format!("{}[{{l}}_mid]", items);
    // Left: advance while a[mid] < x. Right: advance while not (x < a[mid]).
    let advance = match side {
        Side::Left => less_than(elem, &probe, "{l}_x"),
        Side::Right => format!("!({})", less_than(elem, "{l}_x", &probe)),
    };
    body(
        cg,
        label,
        &format!(
            "while ({{l}}_lo < {{l}}_hi) {{
                const {{l}}_mid = {{l}}_lo + ({{l}}_hi - {{l}}_lo) / 2;
                if ({advance}) {{
                    {{l}}_lo = {{l}}_mid + 1;
                }} else {{
                    {{l}}_hi = {{l}}_mid;
                }}
            }}"
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::infer::ShapeInferrer;
    use pyshim_syntax::ast::build::*;

    #[test]
    fn test_bisect_left_emits_search_loop() {
        let args = [list(vec![int(1), int(2), int(4)]), int(3)];
        let inferrer = ShapeInferrer::new();
        let mut cg = NativeCodegen::new(&inferrer);
        bisect_left(&mut cg, &CallArgs::from_slice(&args)).unwrap();
        let out = cg.finish();
        assert!(out.starts_with("bisect_left_0: {\n"));
        assert!(out.contains("const bisect_left_0_a = &[_]i64{ 1, 2, 4 };"));
        assert!(out.contains("while (bisect_left_0_lo < bisect_left_0_hi) {"));
        assert!(out.contains("if (bisect_left_0_a[bisect_left_0_mid] < bisect_left_0_x) {"));
        assert!(out.ends_with("break :bisect_left_0 @as(i64, @intCast(bisect_left_0_lo));\n}"));
    }

    #[test]
    fn test_bisect_right_negates_comparison() {
        let args = [name("xs"), int(3)];
        let mut cg = NativeCodegen::without_inference();
        bisect_right(&mut cg, &CallArgs::from_slice(&args)).unwrap();
        let out = cg.finish();
        assert!(out.contains("const bisect_right_0_a = runtime.asSlice(xs);"));
        assert!(out.contains("if (!(bisect_right_0_x < bisect_right_0_a[bisect_right_0_mid])) {"));
    }

    #[test]
    fn test_string_elements_use_mem_compare() {
        let args = [list(vec![str("a"), str("c")]), str("b")];
        let inferrer = ShapeInferrer::new();
        let mut cg = NativeCodegen::new(&inferrer);
        bisect_left(&mut cg, &CallArgs::from_slice(&args)).unwrap();
        assert!(cg.output().contains("std.mem.lessThan(u8, bisect_left_0_a[bisect_left_0_mid], bisect_left_0_x)"));
    }

    #[test]
    fn test_explicit_bounds() {
        let args = [name("xs"), int(3), int(1), none()];
        let mut cg = NativeCodegen::without_inference();
        bisect_left(&mut cg, &CallArgs::from_slice(&args)).unwrap();
        let out = cg.finish();
        assert!(out.contains("const bisect_left_0_lo_init = @as(usize, @intCast(1));"));
        assert!(out.contains("const bisect_left_0_hi_init: usize = bisect_left_0_a.len;"));
    }

    #[test]
    fn test_insort_inserts_into_list() {
        let args = [name("xs"), int(3)];
        let mut cg = NativeCodegen::without_inference();
        insort_right(&mut cg, &CallArgs::from_slice(&args)).unwrap();
        let out = cg.finish();
        assert!(out.contains("try insort_right_0_list.insert(allocator, insort_right_0_lo, insort_right_0_x);"));
        assert!(out.ends_with("break :insort_right_0 {};\n}"));
    }

    #[test]
    fn test_defaults() {
        let args = [name("xs")];
        let mut cg = NativeCodegen::without_inference();
        bisect_left(&mut cg, &CallArgs::from_slice(&args)).unwrap();
        cg.emit(" ");
        insort_left(&mut cg, &CallArgs::from_slice(&args)).unwrap();
        assert_eq!(cg.finish(), "0 {}");
    }
}
