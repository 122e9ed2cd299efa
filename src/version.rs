//! pyshim version information.
//!
//! The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time. The CLI reports it and generated
//! units carry it in their header comment.

/// The pyshim version string (for example, `0.1.0-alpha.1`).
pub const PYSHIM_VERSION: &str = env!("CARGO_PKG_VERSION");
