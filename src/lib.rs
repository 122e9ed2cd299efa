#![forbid(unsafe_code)]
//! pyshim: standard-library shims for a Python-to-Zig compiler
//!
//! Python programs compiled ahead of time still import `bisect`, `heapq`, `json` and friends. This crate renders each
//! use of an emulated stdlib symbol as inline Zig: constants as literals, simple functions as templates over their
//! rendered arguments, and the rest as labeled value blocks computed in place.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Generated code**: Shims emit `try` and `return error.X` as *string literals* in generated Zig. Those are
//!   output text, not control flow in the generator.

pub mod backend;
pub mod cli;
pub mod version;

pub use pyshim_syntax::ast;
pub use pyshim_syntax::load;

pub use backend::{CodegenConfig, CodegenError, CodegenErrors, NativeCodegen, generate};
