//! Python expression AST shared by the pyshim code generator and its tooling.
//!
//! This crate is "syntax-only": it defines the tree an external parser produces and a JSON loader for it. It does
//! no name resolution, type inference, or code generation.
//!
//! ## Examples
//! ```rust
//! use pyshim_syntax::load;
//!
//! let program = load::from_json(r#"{"body": [{"node": {"Import": {"module": "calendar"}}}]}"#).unwrap();
//! assert_eq!(program.body.len(), 1);
//! ```

pub mod ast;
pub mod load;
