//! Code generation context and statement emission.
//!
//! [`NativeCodegen`] is the single piece of mutable state threaded through every handler: the text sink, the block
//! label counter, the import map and the inference collaborator. One context is created per compilation unit and
//! passed by `&mut` everywhere; nothing lives in globals.
//!
//! ## Emission contract
//! - Output is append-only and strictly in traversal order.
//! - [`NativeCodegen::gen_expr`] is re-entrant: handlers call it from inside blocks they are still building.
//! - An error stops emission immediately and propagates with `?`. Statement emission checkpoints the buffer first and
//!   rolls back on failure, so the buffer only ever holds completed statements.
//!
//! ## See also
//! - [`expressions`]: expression emission
//! - [`labels`]: unique block labels
//! - [`crate::backend::dispatch`]: stdlib call dispatch

mod config;
mod errors;
mod expressions;
mod labels;

pub use config::CodegenConfig;
pub use errors::{CodegenError, CodegenErrors, CodegenResult};
pub use expressions::is_none_arg;
pub use labels::{BlockLabel, BlockLabels};

use std::collections::{HashMap, HashSet};

use pyshim_syntax::ast::{Expr, Program, Spanned, Stmt};

use super::dispatch::ImportMap;
use super::infer::{NativeType, NoInference, TypeInferrer};
use super::zig_emitter::{ZigEmitter, to_zig_ident};

static NO_INFERENCE: NoInference = NoInference;

/// A position in the output buffer that emission can be rolled back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    len: usize,
    indent_level: usize,
}

/// Emit Zig source for one compilation unit.
pub struct NativeCodegen<'a> {
    emitter: ZigEmitter,
    labels: BlockLabels,
    pub(crate) imports: ImportMap,
    inferrer: &'a dyn TypeInferrer,
    config: CodegenConfig,
    /// Names assigned more than once in the unit (declared `var` instead of `const`)
    reassigned: HashMap<String, usize>,
    /// Names already declared in the emitted unit
    declared: HashSet<String>,
}

impl<'a> NativeCodegen<'a> {
    pub fn new(inferrer: &'a dyn TypeInferrer) -> Self {
        Self::with_config(CodegenConfig::default(), inferrer)
    }

    pub fn with_config(config: CodegenConfig, inferrer: &'a dyn TypeInferrer) -> Self {
        Self {
            emitter: ZigEmitter::with_indent_width(config.indent_width),
            labels: BlockLabels::new(),
            imports: ImportMap::default(),
            inferrer,
            config,
            reassigned: HashMap::new(),
            declared: HashSet::new(),
        }
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    // ========================================================================
    // Text sink
    // ========================================================================

    /// Append raw text.
    pub fn emit(&mut self, text: &str) {
        self.emitter.write(text);
    }

    /// Append formatted text.
    pub fn emitf(&mut self, args: std::fmt::Arguments<'_>) -> CodegenResult<()> {
        Ok(self.emitter.writef(args)?)
    }

    /// Write the current indentation.
    pub fn emit_indent(&mut self) {
        self.emitter.write_indent();
    }

    /// Write an indented line.
    pub fn emit_line(&mut self, text: &str) {
        self.emitter.line(text);
    }

    /// Append text that may span several lines; every line after the first is re-indented at the current level.
    pub fn emit_text_block(&mut self, text: &str) {
        let mut lines = text.split('\n');
        if let Some(first) = lines.next() {
            self.emitter.write(first);
        }
        for line in lines {
            self.emitter.write("\n");
            if !line.is_empty() {
                self.emitter.write_indent();
            }
            self.emitter.write(line);
        }
    }

    pub fn indent(&mut self) {
        self.emitter.indent();
    }

    pub fn dedent(&mut self) {
        self.emitter.dedent();
    }

    /// Text emitted so far.
    pub fn output(&self) -> &str {
        self.emitter.as_str()
    }

    /// Consume the context and return the generated code.
    pub fn finish(self) -> String {
        self.emitter.finish()
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            len: self.emitter.len(),
            indent_level: self.emitter.indent_level(),
        }
    }

    /// Drop everything emitted after `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.emitter.restore(checkpoint.len, checkpoint.indent_level);
    }

    pub fn labels_allocated(&self) -> u32 {
        self.labels.allocated()
    }

    // ========================================================================
    // Inference
    // ========================================================================

    /// Ask the inference collaborator for a type; failures become `Unknown`.
    pub fn infer(&self, expr: &Spanned<Expr>) -> NativeType {
        match self.inferrer.infer_expr(expr) {
            Ok(ty) => ty,
            Err(e) => {
                tracing::trace!(error = %e, "type inference failed; treating as unknown");
                NativeType::Unknown
            }
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Emit one statement, rolling the buffer back if it fails.
    pub fn gen_stmt(&mut self, stmt: &Spanned<Stmt>) -> CodegenResult<()> {
        let checkpoint = self.checkpoint();
        let result = self.gen_stmt_inner(stmt);
        if result.is_err() {
            self.rollback(checkpoint);
        }
        result
    }

    fn gen_stmt_inner(&mut self, stmt: &Spanned<Stmt>) -> CodegenResult<()> {
        match &stmt.node {
            Stmt::Import(import) => {
                self.register_import(&import.module, import.alias.as_deref(), stmt.span)?;
                self.emitter.comment(&format!("import {}", import.module));
            }
            Stmt::ImportFrom(from) => {
                for item in &from.names {
                    self.register_from_import(&from.module, &item.name, item.alias.as_deref(), stmt.span)?;
                }
                let names: Vec<&str> = from.names.iter().map(|i| i.name.as_str()).collect();
                self.emitter
                    .comment(&format!("from {} import {}", from.module, names.join(", ")));
            }
            Stmt::Assign(target, value) => {
                if target.is_empty() {
                    return Err(CodegenError::unsupported("empty assignment target", stmt.span));
                }
                self.emitter.write_indent();
                let ident = to_zig_ident(target);
                if self.declared.contains(target) {
                    self.emitter.write(&ident);
                } else {
                    let keyword = if self.reassigned.get(target).copied().unwrap_or(0) > 1 {
                        "var"
                    } else {
                        "const"
                    };
                    self.emitf(format_args!("{} {}", keyword, ident))?;
                }
                self.emitter.write(" = ");
                self.gen_expr(value)?;
                self.emitter.write(";\n");
                self.declared.insert(target.clone());
                // Rebinding a name shadows any import bound to it.
                self.imports.forget(target);
            }
            Stmt::Expr(expr) => {
                self.emitter.write_indent();
                self.emitter.write("_ = ");
                self.gen_expr(expr)?;
                self.emitter.write(";\n");
            }
        }
        Ok(())
    }

    /// Emit a whole compilation unit.
    ///
    /// With `keep_going` unset the first failing statement aborts generation. Otherwise every failing statement is
    /// skipped (its partial output rolled back) and all errors are returned together.
    pub fn generate_program(mut self, program: &Program) -> Result<String, CodegenErrors> {
        for stmt in &program.body {
            if let Stmt::Assign(target, _) = &stmt.node {
                *self.reassigned.entry(target.clone()).or_insert(0) += 1;
            }
        }

        if self.config.wrap_main {
            self.emitter
                .comment(&format!("generated by pyshim {}", crate::version::PYSHIM_VERSION));
            self.emitter.line("const std = @import(\"std\");");
            self.emitter.line("const runtime = @import(\"runtime\");");
            let allocator = format!("const allocator = {};", self.config.allocator_init);
            self.emitter.line(&allocator);
            self.emitter.blank_line();
            self.emitter.line("pub fn main() !void {");
            self.emitter.indent();
        }

        let mut errors = Vec::new();
        for stmt in &program.body {
            if let Err(e) = self.gen_stmt(stmt) {
                tracing::debug!(error = %e, "statement failed");
                errors.push(e);
                if !self.config.keep_going {
                    break;
                }
            }
        }
        if let Some(errors) = CodegenErrors::from_vec(errors) {
            return Err(errors);
        }

        if self.config.wrap_main {
            self.emitter.dedent();
            self.emitter.line("}");
        }
        Ok(self.finish())
    }
}

impl NativeCodegen<'static> {
    /// A context with no type information (every inference query yields `Unknown`).
    pub fn without_inference() -> Self {
        Self::new(&NO_INFERENCE)
    }
}
