//! Zig code emitter - accumulates generated Zig source text
//!
//! This is the text sink every handler writes through: an append-only buffer plus an indentation counter.
//! Indentation is cosmetic in Zig; unbalanced `indent`/`dedent` pairs misalign output but never change its meaning.

use std::fmt::Write;

use pyshim_core::lang::zig_keywords;

/// A buffer for building Zig source code with indentation tracking
#[derive(Debug)]
pub struct ZigEmitter {
    buffer: String,
    indent_level: usize,
    indent_unit: String,
}

impl Default for ZigEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl ZigEmitter {
    pub fn new() -> Self {
        Self::with_indent_width(4)
    }

    pub fn with_indent_width(width: usize) -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
            indent_unit: " ".repeat(width),
        }
    }

    /// Get the generated code
    pub fn finish(self) -> String {
        self.buffer
    }

    /// Get current buffer as string slice
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Current buffer length in bytes
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    /// Write text without newline
    pub fn write(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    /// Write formatted text
    pub fn writef(&mut self, args: std::fmt::Arguments<'_>) -> std::fmt::Result {
        self.buffer.write_fmt(args)
    }

    /// Write a line with current indentation
    pub fn line(&mut self, s: &str) {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
    }

    /// Write a blank line
    pub fn blank_line(&mut self) {
        self.buffer.push('\n');
    }

    /// Write indentation only
    pub fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(&self.indent_unit);
        }
    }

    /// Increase indent level
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indent level
    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Roll the buffer and indentation back to an earlier state.
    pub(crate) fn restore(&mut self, len: usize, indent_level: usize) {
        self.buffer.truncate(len);
        self.indent_level = indent_level;
    }

    /// Write a block with braces
    pub fn block<F>(&mut self, header: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.line(&format!("{} {{", header));
        self.indent();
        f(self);
        self.dedent();
        self.line("}");
    }

    /// Write a comment
    pub fn comment(&mut self, text: &str) {
        self.line(&format!("// {}", text));
    }
}

/// Convert a Python identifier to a valid Zig identifier
///
/// Reserved words and names Zig would reject are wrapped as `@"name"`.
pub fn to_zig_ident(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain && !zig_keywords::is_keyword(name) && name != "_" {
        name.to_string()
    } else {
        format!("@{}", zig_string_literal(name.as_bytes()))
    }
}

/// Render bytes as a double-quoted Zig string literal
pub fn zig_string_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\x{:02x}", b);
            }
        }
    }
    out.push('"');
    out
}

/// Render a float so Zig reads it back as a float literal
pub fn zig_float_literal(v: f64) -> String {
    if v.is_nan() {
        "std.math.nan(f64)".to_string()
    } else if v.is_infinite() {
        if v > 0.0 {
            "std.math.inf(f64)".to_string()
        } else {
            "-std.math.inf(f64)".to_string()
        }
    } else {
        let s = format!("{:?}", v);
        if s.contains('.') || s.contains('e') {
            s
        } else {
            format!("{}.0", s)
        }
    }
}
