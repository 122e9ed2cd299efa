//! `heapq`: binary min-heap over a runtime list.
//!
//! Heap operations work on `list.items` in place. Sift-up and sift-down are inlined per call site; popping from an
//! empty heap returns `error.IndexError` from the enclosing function.

use super::{bind_sequence, body, elem_type, f, less_than, sort_fn, t};
use crate::backend::codegen::{BlockLabel, CodegenResult, NativeCodegen};
use crate::backend::dispatch::{CallArgs, ModuleTable};
use crate::backend::infer::NativeType;
use pyshim_core::lang::stdlib::StdModuleId;

pub static TABLE: ModuleTable = ModuleTable {
    module: StdModuleId::Heapq,
    entries: &[
        ("heappush", f(heappush)),
        ("heappop", f(heappop)),
        ("heapify", f(heapify)),
        ("heappushpop", f(heappushpop)),
        ("heapreplace", f(heapreplace)),
        ("nsmallest", f(nsmallest)),
        ("nlargest", f(nlargest)),
        ("merge", t(1, "try runtime.heapq.merge(allocator, $0)", "&.{}")),
    ],
};

/// Element type of the heap behind `expr`, as far as inference knows.
fn heap_elem(cg: &NativeCodegen<'_>, args: &CallArgs<'_>) -> Option<NativeType> {
    args.get(0).and_then(|heap| cg.infer(heap).element())
}

/// Restore the heap property upward from `start` over `items`.
fn sift_up(cg: &mut NativeCodegen<'_>, label: &BlockLabel, items: &str, start: &str, elem: Option<&NativeType>) {
    let cond = less_than(elem, &format!("{items}[{{l}}_pos]"), &format!("{items}[{{l}}_parent]"));
    body(
        cg,
        label,
        &format!(
            "var {{l}}_pos: usize = {start};
            while ({{l}}_pos > 0) {{
                const {{l}}_parent = ({{l}}_pos - 1) / 2;
                if (!({cond})) break;
                std.mem.swap(@TypeOf({items}[0]), &{items}[{{l}}_pos], &{items}[{{l}}_parent]);
                {{l}}_pos = {{l}}_parent;
            }}"
        ),
    );
}

/// Restore the heap property downward from `start` over `items`.
fn sift_down(
    cg: &mut NativeCodegen<'_>,
    label: &BlockLabel,
    items: &str,
    start: &str,
    elem: Option<&NativeType>,
) {
    let right_smaller = less_than(
        elem,
        &format!("{items}[{{l}}_child + 1]"),
        &format!("{items}[{{l}}_child]"),
    );
    let stop = less_than(
        elem,
        &format!("{items}[{{l}}_min]"),
        &format!("{items}[{{l}}_pos]"),
    );
    body(
        cg,
        label,
        &format!(
            "var {{l}}_pos: usize = {start};
            while (true) {{
                const {{l}}_child = 2 * {{l}}_pos + 1;
                if ({{l}}_child >= {items}.len) break;
                var {{l}}_min = {{l}}_child;
                if ({{l}}_child + 1 < {items}.len and {right_smaller}) {{l}}_min = {{l}}_child + 1;
                if (!({stop})) break;
                std.mem.swap(@TypeOf({items}[0]), &{items}[{{l}}_pos], &{items}[{{l}}_min]);
                {{l}}_pos = {{l}}_min;
            }}"
        ),
    );
}

/// `heappush(heap, item)`
fn heappush(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let (Some(heap), Some(item)) = (args.get(0), args.get(1)) else {
        cg.emit("{}");
        return Ok(());
    };
    let elem = heap_elem(cg, args);
    let label = cg.emit_unique_block_start("heappush");
    cg.emit_block_bind(&label, "heap", heap)?;
    cg.emit_block_bind(&label, "item", item)?;
    cg.emit_block_line(&label, "try {l}_heap.append(allocator, {l}_item);");
    sift_up(cg, &label, "{l}_heap.items", "{l}_heap.items.len - 1", elem.as_ref());
    cg.emit_block_yield(&label, "{}");
    Ok(())
}

/// `heappop(heap)`
fn heappop(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let Some(heap) = args.get(0) else {
        cg.emit("null");
        return Ok(());
    };
    let elem = heap_elem(cg, args);
    let label = cg.emit_unique_block_start("heappop");
    cg.emit_block_bind(&label, "heap", heap)?;
    body(
        cg,
        &label,
        "if ({l}_heap.items.len == 0) return error.IndexError;
        const {l}_top = {l}_heap.items[0];
        {l}_heap.items[0] = {l}_heap.items[{l}_heap.items.len - 1];
        {l}_heap.items.len -= 1;",
    );
    sift_down(cg, &label, "{l}_heap.items", "0", elem.as_ref());
    cg.emit_block_yield(&label, &label.local("top"));
    Ok(())
}

/// `heapify(x)`
fn heapify(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let Some(heap) = args.get(0) else {
        cg.emit("{}");
        return Ok(());
    };
    let elem = heap_elem(cg, args);
    let label = cg.emit_unique_block_start("heapify");
    cg.emit_block_bind(&label, "heap", heap)?;
    body(
        cg,
        &label,
        "var {l}_i: usize = {l}_heap.items.len / 2;
        while ({l}_i > 0) {
            {l}_i -= 1;",
    );
    sift_down(cg, &label, "{l}_heap.items", "{l}_i", elem.as_ref());
    body(cg, &label, "}");
    cg.emit_block_yield(&label, "{}");
    Ok(())
}

/// `heappushpop(heap, item)`: push then pop, without growing the list.
fn heappushpop(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let (Some(heap), Some(item)) = (args.get(0), args.get(1)) else {
        cg.emit("null");
        return Ok(());
    };
    let elem = heap_elem(cg, args);
    let label = cg.emit_unique_block_start("heappushpop");
    cg.emit_block_bind(&label, "heap", heap)?;
    cg.emit_block_var(&label, "item", item)?;
    let smaller = less_than(elem.as_ref(), "{l}_heap.items[0]", "{l}_item");
    body(
        cg,
        &label,
        &format!(
            "if ({{l}}_heap.items.len > 0 and {smaller}) {{
                std.mem.swap(@TypeOf({{l}}_item), &{{l}}_heap.items[0], &{{l}}_item);"
        ),
    );
    sift_down(cg, &label, "{l}_heap.items", "0", elem.as_ref());
    body(cg, &label, "}");
    cg.emit_block_yield(&label, &label.local("item"));
    Ok(())
}

/// `heapreplace(heap, item)`: pop then push.
fn heapreplace(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let (Some(heap), Some(item)) = (args.get(0), args.get(1)) else {
        cg.emit("null");
        return Ok(());
    };
    let elem = heap_elem(cg, args);
    let label = cg.emit_unique_block_start("heapreplace");
    cg.emit_block_bind(&label, "heap", heap)?;
    cg.emit_block_bind(&label, "item", item)?;
    body(
        cg,
        &label,
        "if ({l}_heap.items.len == 0) return error.IndexError;
        const {l}_top = {l}_heap.items[0];
        {l}_heap.items[0] = {l}_item;",
    );
    sift_down(cg, &label, "{l}_heap.items", "0", elem.as_ref());
    cg.emit_block_yield(&label, &label.local("top"));
    Ok(())
}

fn nsmallest(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    select_n(cg, args, "nsmallest", false)
}

fn nlargest(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    select_n(cg, args, "nlargest", true)
}

/// `nsmallest(n, iterable)` / `nlargest(n, iterable)`: sort a copy and take a prefix.
fn select_n(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>, base: &str, descending: bool) -> CodegenResult<()> {
    let (Some(n), Some(iterable)) = (args.get(0), args.get(1)) else {
        cg.emit("&.{}");
        return Ok(());
    };
    let label = cg.emit_unique_block_start(base);
    cg.emit_block_bind_wrapped(&label, "n", "@as(usize, @intCast(", n, "))")?;
    let ty = bind_sequence(cg, &label, "src", iterable)?;
    let elem = ty.element();
    let elem_ty = elem_type(elem.as_ref(), &label.local("src"));
    let sorter = sort_fn(elem.as_ref(), &label.local("src"), descending);
    body(
        cg,
        &label,
        &format!(
            "const {{l}}_buf = try allocator.dupe({elem_ty}, {{l}}_src);
            std.mem.sort({elem_ty}, {{l}}_buf, {{}}, {sorter});"
        ),
    );
    cg.emit_block_yield(&label, &format!("{0}[0..@min({1}, {0}.len)]", label.local("buf"), label.local("n")));
    Ok(())
}
