//! `glob`: pathname pattern expansion.
//!
//! `glob` lists the pattern's directory and keeps the entries whose name matches the last path component, using the
//! same inline matcher as `fnmatch`. Hidden entries only match patterns that start with a dot. Results are sorted.

use super::fnmatch::emit_wildcard_match;
use super::{body, c, f, t};
use crate::backend::codegen::{CodegenResult, NativeCodegen};
use crate::backend::dispatch::{CallArgs, ModuleTable};
use pyshim_core::lang::stdlib::StdModuleId;

pub static TABLE: ModuleTable = ModuleTable {
    module: StdModuleId::Glob,
    entries: &[
        ("glob", f(glob)),
        ("iglob", f(glob)),
        ("escape", f(escape)),
        ("has_magic", t(1, "(std.mem.indexOfAny(u8, $0, \"*?[\") != null)", "false")),
        ("magic_check", c("\"*?[\"")),
    ],
};

/// `glob(pathname)` / `iglob(pathname)`
fn glob(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let Some(pattern) = args.arg(0, "pathname") else {
        cg.emit("&.{}");
        return Ok(());
    };
    let label = cg.emit_unique_block_start("glob");
    cg.emit_block_bind(&label, "pattern", pattern)?;
    body(
        cg,
        &label,
        "const {l}_parent = std.fs.path.dirname({l}_pattern);
        const {l}_base = std.fs.path.basename({l}_pattern);
        var {l}_out = std.ArrayList([]const u8).init(allocator);
        var {l}_dir = std.fs.cwd().openDir({l}_parent orelse \".\", .{ .iterate = true }) catch break :{l} {l}_out.items;
        defer {l}_dir.close();
        var {l}_it = {l}_dir.iterate();
        while (try {l}_it.next()) |{l}_entry| {
            if ({l}_entry.name.len > 0 and {l}_entry.name[0] == '.' and !std.mem.startsWith(u8, {l}_base, \".\")) continue;",
    );
    cg.emit_indent();
    cg.emitf(format_args!("const {} = ", label.local("hit")))?;
    emit_wildcard_match(cg, &format!("{}.name", label.local("entry")), &label.local("base"));
    cg.emit(";\n");
    body(
        cg,
        &label,
        "if (!{l}_hit) continue;
        if ({l}_parent) |{l}_p| {
            try {l}_out.append(try std.fs.path.join(allocator, &.{ {l}_p, {l}_entry.name }));
        } else {
            try {l}_out.append(try allocator.dupe(u8, {l}_entry.name));
        }
        }
        std.mem.sort([]const u8, {l}_out.items, {}, struct { fn lt(_: void, a: []const u8, b: []const u8) bool { return std.mem.lessThan(u8, a, b); } }.lt);",
    );
    cg.emit_block_yield(&label, &format!("{}.items", label.local("out")));
    Ok(())
}

/// `escape(pathname)`: wrap every magic character in brackets.
fn escape(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let Some(path) = args.get(0) else {
        cg.emit("\"\"");
        return Ok(());
    };
    let label = cg.emit_unique_block_start("escape");
    cg.emit_block_bind(&label, "src", path)?;
    body(
        cg,
        &label,
        "var {l}_out = std.ArrayList(u8).init(allocator);
        for ({l}_src) |{l}_c| {
            if ({l}_c == '*' or {l}_c == '?' or {l}_c == '[') {
                try {l}_out.append('[');
                try {l}_out.append({l}_c);
                try {l}_out.append(']');
            } else {
                try {l}_out.append({l}_c);
            }
        }",
    );
    cg.emit_block_yield(&label, &format!("try {}.toOwnedSlice()", label.local("out")));
    Ok(())
}
