//! Registry-first vocabularies.
//!
//! Callers work with stable IDs (e.g. [`stdlib::StdModuleId`]) and look up spellings and metadata through the
//! registry tables instead of matching on strings throughout the compiler.
//!
//! ## Examples
//! ```rust
//! use pyshim_core::lang::stdlib::{self, StdModuleId};
//!
//! assert_eq!(stdlib::from_str("bisect"), Some(StdModuleId::Bisect));
//! assert_eq!(stdlib::as_str(StdModuleId::Bisect), "bisect");
//! ```

pub mod registry;
pub mod stdlib;
pub mod zig_keywords;
