//! pyshim backend
//!
//! This module turns a borrowed Python AST into Zig source text.
//!
//! The pipeline is:
//! 1. Imports bind local names to emulated stdlib modules and symbols
//! 2. Calls and attribute reads on those bindings resolve to a (module, symbol) pair
//! 3. The module's dispatch table yields a shim, which writes Zig text into the context's buffer
//!
//! ## Module Organization
//!
//! - `codegen/` - The codegen context (`NativeCodegen`), statement and expression emission, block labels
//! - `dispatch.rs` - Shim kinds, per-module tables, call arguments, import bindings
//! - `stdlib/` - One dispatch table per emulated module
//! - `infer.rs` - The type-inference seam consulted by type-directed shims
//! - `zig_emitter.rs` - Low-level Zig text builder

pub mod codegen;
pub mod dispatch;
pub mod infer;
pub mod stdlib;
pub mod zig_emitter;

pub use codegen::{CodegenConfig, CodegenError, CodegenErrors, CodegenResult, NativeCodegen};
pub use dispatch::{CallArgs, ModuleTable, Shim};
pub use infer::{NativeType, ShapeInferrer, TypeInferrer};

use pyshim_syntax::ast::Program;

/// Generate a Zig compilation unit for `program`, inferring types from literal shapes and simple bindings.
pub fn generate(program: &Program, config: CodegenConfig) -> Result<String, CodegenErrors> {
    let inferrer = infer::scan_bindings(program);
    tracing::debug!(statements = program.body.len(), "generating Zig unit");
    NativeCodegen::with_config(config, &inferrer).generate_program(program)
}
