//! `fnmatch`: shell-style wildcard matching.
//!
//! Matching is inlined as a backtracking scan supporting `*` and `?`; every other pattern byte matches itself.
//! Matching is case-sensitive, as on POSIX. `translate` of a literal pattern is computed at compile time.

use super::{bind_sequence, body, f};
use crate::backend::codegen::{CodegenResult, NativeCodegen};
use crate::backend::dispatch::{CallArgs, ModuleTable};
use crate::backend::zig_emitter::zig_string_literal;
use pyshim_core::lang::stdlib::StdModuleId;
use pyshim_syntax::ast::{Expr, Literal};

pub static TABLE: ModuleTable = ModuleTable {
    module: StdModuleId::Fnmatch,
    entries: &[
        ("fnmatch", f(fnmatch)),
        ("fnmatchcase", f(fnmatch)),
        ("filter", f(filter)),
        ("translate", f(translate)),
    ],
};

/// Emit a labeled block yielding whether `name` matches `pattern`; both are Zig expressions of type `[]const u8`.
pub(crate) fn emit_wildcard_match(cg: &mut NativeCodegen<'_>, name: &str, pattern: &str) {
    let label = cg.emit_unique_block_start("match");
    body(
        cg,
        &label,
        &format!(
            "const {{l}}_n = {name};
            const {{l}}_p = {pattern};
            var {{l}}_ni: usize = 0;
            var {{l}}_pi: usize = 0;
            var {{l}}_star: ?usize = null;
            var {{l}}_mark: usize = 0;
            while ({{l}}_ni < {{l}}_n.len) {{
                if ({{l}}_pi < {{l}}_p.len and {{l}}_p[{{l}}_pi] == '*') {{
                    {{l}}_star = {{l}}_pi;
                    {{l}}_mark = {{l}}_ni;
                    {{l}}_pi += 1;
                    continue;
                }}
                if ({{l}}_pi < {{l}}_p.len and ({{l}}_p[{{l}}_pi] == '?' or {{l}}_p[{{l}}_pi] == {{l}}_n[{{l}}_ni])) {{
                    {{l}}_ni += 1;
                    {{l}}_pi += 1;
                    continue;
                }}
                if ({{l}}_star) |{{l}}_s| {{
                    {{l}}_pi = {{l}}_s + 1;
                    {{l}}_mark += 1;
                    {{l}}_ni = {{l}}_mark;
                    continue;
                }}
                break :{{l}} false;
            }}
            while ({{l}}_pi < {{l}}_p.len and {{l}}_p[{{l}}_pi] == '*') {{l}}_pi += 1;"
        ),
    );
    cg.emit_block_yield(&label, &format!("{} == {}.len", label.local("pi"), label.local("p")));
}

/// `fnmatch(name, pat)` / `fnmatchcase(name, pat)`
fn fnmatch(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let (Some(name), Some(pattern)) = (args.get(0), args.get(1)) else {
        cg.emit("false");
        return Ok(());
    };
    let label = cg.emit_unique_block_start("fnmatch");
    cg.emit_block_bind(&label, "name", name)?;
    cg.emit_block_bind(&label, "pat", pattern)?;
    cg.emit_block_break(&label);
    emit_wildcard_match(cg, &label.local("name"), &label.local("pat"));
    cg.emit_block_end(&label);
    Ok(())
}

/// `filter(names, pat)`: the names that match, in order.
fn filter(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let (Some(names), Some(pattern)) = (args.get(0), args.get(1)) else {
        cg.emit("&.{}");
        return Ok(());
    };
    let label = cg.emit_unique_block_start("filter");
    bind_sequence(cg, &label, "names", names)?;
    cg.emit_block_bind(&label, "pat", pattern)?;
    body(
        cg,
        &label,
        "var {l}_out = std.ArrayList([]const u8).init(allocator);
        for ({l}_names) |{l}_name| {",
    );
    cg.emit_indent();
    cg.emitf(format_args!("const {} = ", label.local("hit")))?;
    emit_wildcard_match(cg, &label.local("name"), &label.local("pat"));
    cg.emit(";\n");
    body(
        cg,
        &label,
        "if ({l}_hit) try {l}_out.append({l}_name);
        }",
    );
    cg.emit_block_yield(&label, &format!("try {}.toOwnedSlice()", label.local("out")));
    Ok(())
}

/// `translate(pat)`: the regular expression equivalent of a shell pattern.
fn translate(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let Some(pattern) = args.get(0) else {
        cg.emit("\"\"");
        return Ok(());
    };
    if let Expr::Literal(Literal::Str(text)) = &pattern.node {
        cg.emit(&zig_string_literal(translate_pattern(text).as_bytes()));
        return Ok(());
    }
    cg.emit("try runtime.fnmatch.translate(allocator, ");
    cg.gen_expr(pattern)?;
    cg.emit(")");
    Ok(())
}

/// Translate a shell pattern to a regular expression the way CPython does for `*`, `?` and literal text.
pub fn translate_pattern(pattern: &str) -> String {
    let mut out = String::from("(?s:");
    for ch in pattern.chars() {
        match ch {
            '*' => {
                if !out.ends_with(".*") {
                    out.push_str(".*");
                }
            }
            '?' => out.push('.'),
            c if c.is_alphanumeric() || c == '_' => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out.push_str(")\\Z");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyshim_syntax::ast::build::*;

    #[test]
    fn test_translate_literal_patterns() {
        assert_eq!(translate_pattern("*.py"), "(?s:.*\\.py)\\Z");
        assert_eq!(translate_pattern("a?c"), "(?s:a.c)\\Z");
        assert_eq!(translate_pattern("**x"), "(?s:.*x)\\Z");
    }

    #[test]
    fn test_translate_handler_folds_literal() {
        let mut cg = NativeCodegen::without_inference();
        translate(&mut cg, &CallArgs::from_slice(&[str("*.py")])).unwrap();
        assert_eq!(cg.finish(), "\"(?s:.*\\\\.py)\\\\Z\"");
    }

    #[test]
    fn test_fnmatch_nests_match_block() {
        let mut cg = NativeCodegen::without_inference();
        fnmatch(&mut cg, &CallArgs::from_slice(&[str("a.py"), str("*.py")])).unwrap();
        let out = cg.finish();
        assert!(out.starts_with("fnmatch_0: {\n    const fnmatch_0_name = \"a.py\";"));
        assert!(out.contains("break :fnmatch_0 match_1: {\n"));
        assert!(out.contains("if (match_1_star) |match_1_s| {"));
        assert!(out.contains("break :match_1 false;"));
        assert!(out.contains("break :match_1 match_1_pi == match_1_p.len;\n    };\n}"));
        assert_eq!(out.matches('{').count(), out.matches('}').count());
    }

    #[test]
    fn test_filter_collects_matches() {
        let mut cg = NativeCodegen::without_inference();
        filter(&mut cg, &CallArgs::from_slice(&[name("files"), str("*.txt")])).unwrap();
        let out = cg.finish();
        assert!(out.contains("const filter_0_names = runtime.asSlice(files);"));
        assert!(out.contains("const filter_0_hit = match_1: {\n"));
        assert!(out.contains("if (filter_0_hit) try filter_0_out.append(filter_0_name);"));
        assert_eq!(out.matches('{').count(), out.matches('}').count());
    }

    #[test]
    fn test_defaults() {
        let mut cg = NativeCodegen::without_inference();
        fnmatch(&mut cg, &CallArgs::from_slice(&[str("a")])).unwrap();
        cg.emit(" ");
        filter(&mut cg, &CallArgs::from_slice(&[])).unwrap();
        assert_eq!(cg.finish(), "false &.{}");
    }
}
