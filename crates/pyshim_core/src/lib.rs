//! Shared vocabulary for the pyshim code generator.
//!
//! This crate is intentionally small and dependency-free. It holds registry tables that the compiler, the CLI and
//! the test guardrails all agree on:
//! - which CPython standard-library modules are emulated, and how (see [`lang::stdlib`]);
//! - which identifiers are reserved in the Zig target language (see [`lang::zig_keywords`]).
//!
//! ## Notes
//!
//! - No IO, no global mutable state, no compiler-specific types.

pub mod lang;
