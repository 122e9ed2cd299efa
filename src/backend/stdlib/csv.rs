//! `csv`: delimited text.
//!
//! `reader` splits each input line on the delimiter (`,` unless the `delimiter` keyword says otherwise) into a slice of
//! rows. Quoting is not interpreted. `writer` and the dict variants wrap runtime objects.

use super::{bind_sequence, body, c, f, t};
use crate::backend::codegen::{CodegenResult, NativeCodegen};
use crate::backend::dispatch::{CallArgs, ModuleTable};
use pyshim_core::lang::stdlib::StdModuleId;
use pyshim_syntax::ast::{Expr, Literal};

pub static TABLE: ModuleTable = ModuleTable {
    module: StdModuleId::Csv,
    entries: &[
        ("reader", f(reader)),
        ("writer", f(writer)),
        ("DictReader", t(1, "try runtime.csv.DictReader.init(allocator, $0)", "runtime.csv.DictReader.empty()")),
        ("DictWriter", t(2, "try runtime.csv.DictWriter.init(allocator, $0, $1)", "runtime.csv.DictWriter.empty()")),
        ("QUOTE_MINIMAL", c("0")),
        ("QUOTE_ALL", c("1")),
        ("QUOTE_NONNUMERIC", c("2")),
        ("QUOTE_NONE", c("3")),
        ("register_dialect", c("{}")),
        ("unregister_dialect", c("{}")),
        ("list_dialects", c("&[_][]const u8{ \"excel\", \"excel-tab\", \"unix\" }")),
        ("field_size_limit", c("131072")),
        ("Error", c("error.CsvError")),
    ],
};

/// Zig expression for the delimiter byte of a `reader`/`writer` call, or `None` when it must be rendered.
fn literal_delimiter(args: &CallArgs<'_>) -> Option<String> {
    match args.named("delimiter") {
        None => Some("','".to_string()),
        Some(expr) => match &expr.node {
            Expr::Literal(Literal::Str(s)) if s.len() == 1 => Some(byte_literal(s.as_bytes()[0])),
            _ => None,
        },
    }
}

fn byte_literal(b: u8) -> String {
    match b {
        b'\t' => "'\\t'".to_string(),
        b'\'' | b'\\' => b.to_string(),
        0x20..=0x7e => format!("'{}'", b as char),
        _ => b.to_string(),
    }
}

/// Emit the delimiter byte: a literal, or the first byte of the rendered keyword value.
fn emit_delimiter(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    match (literal_delimiter(args), args.named("delimiter")) {
        (Some(byte), _) => cg.emit(&byte),
        (None, Some(expr)) => {
            cg.emit("(");
            cg.gen_expr(expr)?;
            cg.emit(")[0]");
        }
        (None, None) => cg.emit("','"),
    }
    Ok(())
}

/// `reader(lines, delimiter=',')`
fn reader(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let Some(lines) = args.get(0) else {
        cg.emit("runtime.csv.Reader.empty()");
        return Ok(());
    };
    let label = cg.emit_unique_block_start("reader");
    bind_sequence(cg, &label, "src", lines)?;
    cg.emit_indent();
    cg.emitf(format_args!("const {}: u8 = ", label.local("delim")))?;
    emit_delimiter(cg, args)?;
    cg.emit(";\n");
    body(
        cg,
        &label,
        "var {l}_rows = std.ArrayList([]const []const u8).init(allocator);
        for ({l}_src) |{l}_line| {
            var {l}_fields = std.ArrayList([]const u8).init(allocator);
            var {l}_it = std.mem.splitScalar(u8, std.mem.trimRight(u8, {l}_line, \"\\r\\n\"), {l}_delim);
            while ({l}_it.next()) |{l}_field| try {l}_fields.append({l}_field);
            try {l}_rows.append(try {l}_fields.toOwnedSlice());
        }",
    );
    cg.emit_block_yield(&label, &format!("try {}.toOwnedSlice()", label.local("rows")));
    Ok(())
}

/// `writer(file, delimiter=',')`
fn writer(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let Some(file) = args.get(0) else {
        cg.emit("runtime.csv.Writer.empty()");
        return Ok(());
    };
    cg.emit("runtime.csv.Writer.init(");
    cg.gen_expr(file)?;
    cg.emit(", ");
    emit_delimiter(cg, args)?;
    cg.emit(")");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyshim_syntax::ast::CallArg;
    use pyshim_syntax::ast::Span;
    use pyshim_syntax::ast::build::*;

    #[test]
    fn test_reader_splits_on_delimiter_keyword() {
        let call = vec![
            CallArg::Positional(name("lines")),
            CallArg::Named("delimiter".into(), str(";")),
        ];
        let mut cg = NativeCodegen::without_inference();
        reader(&mut cg, &CallArgs::from_call(&call, Span::default())).unwrap();
        let out = cg.finish();
        assert!(out.contains("const reader_0_src = runtime.asSlice(lines);"));
        assert!(out.contains("const reader_0_delim: u8 = ';';"));
        assert!(out.contains("std.mem.splitScalar(u8, std.mem.trimRight(u8, reader_0_line, \"\\r\\n\"), reader_0_delim)"));
        assert!(out.ends_with("break :reader_0 try reader_0_rows.toOwnedSlice();\n}"));
    }

    #[test]
    fn test_writer_default_delimiter() {
        let mut cg = NativeCodegen::without_inference();
        writer(&mut cg, &CallArgs::from_slice(&[name("f")])).unwrap();
        assert_eq!(cg.finish(), "runtime.csv.Writer.init(f, ',')");
    }

    #[test]
    fn test_computed_delimiter() {
        let call = vec![
            CallArg::Positional(name("f")),
            CallArg::Named("delimiter".into(), name("sep")),
        ];
        let mut cg = NativeCodegen::without_inference();
        writer(&mut cg, &CallArgs::from_call(&call, Span::default())).unwrap();
        assert_eq!(cg.finish(), "runtime.csv.Writer.init(f, (sep)[0])");
    }

    #[test]
    fn test_reader_without_source() {
        let mut cg = NativeCodegen::without_inference();
        reader(&mut cg, &CallArgs::from_slice(&[])).unwrap();
        assert_eq!(cg.finish(), "runtime.csv.Reader.empty()");
    }
}
