//! Unique block labels for synthetic value blocks.
//!
//! Computed handlers render their result as a Zig labeled block that yields a value:
//!
//! ```text
//! isleap_0: {
//!     const isleap_0_y = 2024;
//!     break :isleap_0 (@mod(isleap_0_y, 4) == 0 and @mod(isleap_0_y, 100) != 0) or @mod(isleap_0_y, 400) == 0;
//! }
//! ```
//!
//! Zig rejects duplicate labels in nested scopes and rejects shadowed locals, so both the label and every local a
//! block declares are derived from a context-wide counter. Two labels rendered by one [`NativeCodegen`] are never
//! equal: the numeric suffix is unique and the base is sanitized to an identifier without a trailing `_<digits>`
//! ambiguity (the suffix is always the last `_`-separated segment).

use std::fmt;

use pyshim_syntax::ast::{Expr, Spanned};

use super::{CodegenResult, NativeCodegen};

/// A label allocated for one synthetic block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockLabel {
    base: String,
    id: u32,
}

impl BlockLabel {
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Fully-qualified label, e.g. `weekday_3`.
    pub fn name(&self) -> String {
        format!("{}_{}", self.base, self.id)
    }

    /// Name for a constant or variable local to this block, e.g. `weekday_3_y`.
    pub fn local(&self, name: &str) -> String {
        format!("{}_{}_{}", self.base, self.id, name)
    }
}

impl fmt::Display for BlockLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.base, self.id)
    }
}

/// Monotonic label allocator, one per compilation unit.
#[derive(Debug, Default)]
pub struct BlockLabels {
    next_id: u32,
}

impl BlockLabels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh label for `base`.
    pub fn allocate(&mut self, base: &str) -> BlockLabel {
        let id = self.next_id;
        self.next_id += 1;
        BlockLabel {
            base: sanitize_base(base),
            id,
        }
    }

    /// Number of labels handed out so far.
    pub fn allocated(&self) -> u32 {
        self.next_id
    }
}

fn sanitize_base(base: &str) -> String {
    let mut out: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() {
        out.push_str("blk");
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

impl NativeCodegen<'_> {
    /// Open a labeled value block and return its label.
    ///
    /// Writes `label: {` and a newline, then indents. Must be closed with [`Self::emit_block_break`] followed by the
    /// value and [`Self::emit_block_end`].
    pub fn emit_unique_block_start(&mut self, base: &str) -> BlockLabel {
        let label = self.labels.allocate(base);
        tracing::trace!(label = %label, "open synthetic block");
        self.emitter.write(&label.name());
        self.emitter.write(": {\n");
        self.emitter.indent();
        label
    }

    /// Start the final `break :label ` line; the caller emits the yielded value next.
    pub fn emit_block_break(&mut self, label: &BlockLabel) {
        self.emitter.write_indent();
        self.emitter.write("break :");
        self.emitter.write(&label.name());
        self.emitter.write(" ");
    }

    /// Terminate the break statement and close the block.
    pub fn emit_block_end(&mut self, _label: &BlockLabel) {
        self.emitter.write(";\n");
        self.emitter.dedent();
        self.emitter.write_indent();
        self.emitter.write("}");
    }

    /// Emit `break :label <value>` and close the block, for values that are already text.
    pub fn emit_block_yield(&mut self, label: &BlockLabel, value: &str) {
        self.emit_block_break(label);
        self.emitter.write(value);
        self.emit_block_end(label);
    }

    /// Emit one indented line of block body. `{l}` in `text` expands to the label name.
    pub fn emit_block_line(&mut self, label: &BlockLabel, text: &str) {
        let expanded = text.replace("{l}", &label.name());
        self.emitter.line(&expanded);
    }

    /// Emit `const <label>_<local> = <expr>;`.
    pub fn emit_block_bind(&mut self, label: &BlockLabel, local: &str, expr: &Spanned<Expr>) -> CodegenResult<()> {
        self.emitter.write_indent();
        self.emitter.write("const ");
        self.emitter.write(&label.local(local));
        self.emitter.write(" = ");
        self.gen_expr(expr)?;
        self.emitter.write(";\n");
        Ok(())
    }

    /// Emit `var <label>_<local> = <expr>;` for a local the block reassigns.
    pub fn emit_block_var(&mut self, label: &BlockLabel, local: &str, expr: &Spanned<Expr>) -> CodegenResult<()> {
        self.emitter.write_indent();
        self.emitter.write("var ");
        self.emitter.write(&label.local(local));
        self.emitter.write(" = ");
        self.gen_expr(expr)?;
        self.emitter.write(";\n");
        Ok(())
    }

    /// Emit `const <label>_<local> = <prefix><expr><suffix>;`.
    pub fn emit_block_bind_wrapped(
        &mut self,
        label: &BlockLabel,
        local: &str,
        prefix: &str,
        expr: &Spanned<Expr>,
        suffix: &str,
    ) -> CodegenResult<()> {
        self.emitter.write_indent();
        self.emitter.write("const ");
        self.emitter.write(&label.local(local));
        self.emitter.write(" = ");
        self.emitter.write(prefix);
        self.gen_expr(expr)?;
        self.emitter.write(suffix);
        self.emitter.write(";\n");
        Ok(())
    }
}
