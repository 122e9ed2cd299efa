//! Dispatch tables for the emulated standard-library modules.
//!
//! Each submodule exposes one `pub static TABLE: ModuleTable`. Most entries are plain data built with the `c` (constant)
//! and `t` (template) constructors; computed symbols use `f` with a handler from the same file.
//!
//! Computed handlers share a few conventions:
//! - the result is a labeled value block from [`NativeCodegen::emit_unique_block_start`];
//! - every local is named through the block's label, so nested and repeated blocks never collide;
//! - arguments are bound to locals once, in call order, before any loop reads them;
//! - with too few arguments the handler writes its default literal and renders nothing.

use pyshim_core::lang::stdlib::StdModuleId;
use pyshim_syntax::ast::{Expr, Spanned};

use super::codegen::{BlockLabel, CodegenResult, NativeCodegen};
use super::dispatch::{Handler, ModuleTable, Shim};
use super::infer::NativeType;

pub mod bisect;
pub mod calendar;
pub mod codecs;
pub mod csv;
pub mod errno;
pub mod fnmatch;
pub mod functools;
pub mod glob;
pub mod heapq;
pub mod io;
pub mod json;
pub mod mmap;
pub mod secrets;
pub mod select;
pub mod socket;
pub mod ssl;
pub mod statistics;
pub mod uuid;

/// Every dispatch table, in module-name order.
pub static TABLES: &[&ModuleTable] = &[
    &bisect::TABLE,
    &calendar::TABLE,
    &codecs::TABLE,
    &csv::TABLE,
    &errno::TABLE,
    &fnmatch::TABLE,
    &functools::TABLE,
    &glob::TABLE,
    &heapq::TABLE,
    &io::TABLE,
    &json::TABLE,
    &mmap::TABLE,
    &secrets::TABLE,
    &select::TABLE,
    &socket::TABLE,
    &ssl::TABLE,
    &statistics::TABLE,
    &uuid::TABLE,
];

/// The dispatch table for `module`.
pub fn table_for(module: StdModuleId) -> &'static ModuleTable {
    match module {
        StdModuleId::Bisect => &bisect::TABLE,
        StdModuleId::Calendar => &calendar::TABLE,
        StdModuleId::Codecs => &codecs::TABLE,
        StdModuleId::Csv => &csv::TABLE,
        StdModuleId::Errno => &errno::TABLE,
        StdModuleId::Fnmatch => &fnmatch::TABLE,
        StdModuleId::Functools => &functools::TABLE,
        StdModuleId::Glob => &glob::TABLE,
        StdModuleId::Heapq => &heapq::TABLE,
        StdModuleId::Io => &io::TABLE,
        StdModuleId::Json => &json::TABLE,
        StdModuleId::Mmap => &mmap::TABLE,
        StdModuleId::Secrets => &secrets::TABLE,
        StdModuleId::Select => &select::TABLE,
        StdModuleId::Socket => &socket::TABLE,
        StdModuleId::Ssl => &ssl::TABLE,
        StdModuleId::Statistics => &statistics::TABLE,
        StdModuleId::Uuid => &uuid::TABLE,
    }
}

// ============================================================================
// Table constructors
// ============================================================================

pub(crate) const fn c(text: &'static str) -> Shim {
    Shim::Const(text)
}

pub(crate) const fn t(min_args: usize, template: &'static str, default: &'static str) -> Shim {
    Shim::Template {
        min_args,
        template,
        default,
    }
}

pub(crate) const fn f(handler: Handler) -> Shim {
    Shim::Custom(handler)
}

// ============================================================================
// Shared emission helpers
// ============================================================================

/// Emit a multi-line block body.
///
/// `{l}` expands to the label name, so `{l}_lo` is the block-local `lo`. A line ending in `{` indents the lines after
/// it and a line starting with `}` is dedented first; blank lines are skipped.
pub(crate) fn body(cg: &mut NativeCodegen<'_>, label: &BlockLabel, text: &str) {
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('}') {
            cg.dedent();
        }
        cg.emit_block_line(label, line);
        if line.ends_with('{') {
            cg.indent();
        }
    }
}

/// Bind `expr` as a readable sequence named `{l}_<local>`.
///
/// Values already known to be slices are bound directly; anything else goes through `runtime.asSlice`.
pub(crate) fn bind_sequence(
    cg: &mut NativeCodegen<'_>,
    label: &BlockLabel,
    local: &str,
    expr: &Spanned<Expr>,
) -> CodegenResult<NativeType> {
    let ty = cg.infer(expr);
    let typed_literal = matches!(&expr.node, Expr::List(items) if !items.is_empty())
        && ty.element().is_some_and(|e| e.zig_type().is_some());
    if typed_literal || matches!(ty, NativeType::Str | NativeType::Bytes) {
        cg.emit_block_bind(label, local, expr)?;
    } else {
        cg.emit_block_bind_wrapped(label, local, "runtime.asSlice(", expr, ")")?;
    }
    Ok(ty)
}

/// Zig expression for `a < b` over elements of type `elem`.
pub(crate) fn less_than(elem: Option<&NativeType>, a: &str, b: &str) -> String {
    match elem {
        Some(NativeType::Str) | Some(NativeType::Bytes) => format!("std.mem.lessThan(u8, {}, {})", a, b),
        _ => format!("{} < {}", a, b),
    }
}

/// Zig expression for `a == b` over elements of type `elem`.
pub(crate) fn equals(elem: Option<&NativeType>, a: &str, b: &str) -> String {
    match elem {
        Some(NativeType::Str) | Some(NativeType::Bytes) => format!("std.mem.eql(u8, {}, {})", a, b),
        _ => format!("{} == {}", a, b),
    }
}

/// A `lessThan` function usable with `std.mem.sort` for elements of `elem`, given the slice local `seq`.
pub(crate) fn sort_fn(elem: Option<&NativeType>, seq: &str, descending: bool) -> String {
    match elem {
        Some(NativeType::Str) | Some(NativeType::Bytes) => {
            let (x, y) = if descending { ("b", "a") } else { ("a", "b") };
            format!(
                "struct {{ fn lt(_: void, a: []const u8, b: []const u8) bool {{ return std.mem.lessThan(u8, {}, {}); }} }}.lt",
                x, y
            )
        }
        _ => format!(
            "std.sort.{}({})",
            if descending { "desc" } else { "asc" },
            elem_type(elem, seq)
        ),
    }
}

/// Element type expression for the slice local `seq`.
pub(crate) fn elem_type(elem: Option<&NativeType>, seq: &str) -> String {
    match elem.and_then(NativeType::zig_type) {
        Some(ty) => ty.to_string(),
        None => format!("@TypeOf({}[0])", seq),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_module_has_a_table() {
        for info in pyshim_core::lang::stdlib::STDLIB_MODULES {
            assert_eq!(table_for(info.id).module, info.id, "{}", info.canonical);
        }
        assert_eq!(TABLES.len(), pyshim_core::lang::stdlib::STDLIB_MODULES.len());
    }

    #[test]
    fn test_body_indents_braces() {
        let mut cg = NativeCodegen::without_inference();
        let label = cg.emit_unique_block_start("demo");
        body(&mut cg, &label, "while (true) {\n    break;\n}");
        cg.emit_block_yield(&label, "0");
        assert_eq!(
            cg.output(),
            "demo_0: {\n    while (true) {\n        break;\n    }\n    break :demo_0 0;\n}"
        );
    }

    #[test]
    fn test_string_comparisons() {
        assert_eq!(less_than(Some(&NativeType::Int), "a", "b"), "a < b");
        assert_eq!(less_than(Some(&NativeType::Str), "a", "b"), "std.mem.lessThan(u8, a, b)");
        assert_eq!(equals(None, "a", "b"), "a == b");
    }
}
