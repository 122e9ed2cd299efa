//! Load AST documents produced by the external parser.
//!
//! The exchange format is the serde JSON encoding of [`Program`]: an optional `source` string and a `body` of
//! spanned statements. Spans may be omitted and default to `0..0`.

use thiserror::Error;

use crate::ast::Program;

/// Errors that occur while reading an AST document
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed AST document at line {line}, column {column}: {message}")]
    Malformed { line: usize, column: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Malformed {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        }
    }
}

/// Parse an AST document from a JSON string.
pub fn from_json(text: &str) -> Result<Program, LoadError> {
    let program: Program = serde_json::from_str(text)?;
    tracing::debug!(statements = program.body.len(), "loaded AST document");
    Ok(program)
}

/// Parse an AST document from raw bytes.
pub fn from_slice(bytes: &[u8]) -> Result<Program, LoadError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Read and parse an AST document from disk.
pub fn from_path(path: &std::path::Path) -> Result<Program, LoadError> {
    let text = std::fs::read_to_string(path)?;
    from_json(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CallArg, Expr, Literal, Stmt};

    #[test]
    fn test_load_call_with_defaulted_spans() {
        let doc = r#"{
            "body": [
                {"node": {"Import": {"module": "calendar"}}},
                {"node": {"Expr": {"node": {"Call": [
                    {"node": {"Attribute": [{"node": {"Name": "calendar"}}, "isleap"]}},
                    [{"Positional": {"node": {"Literal": {"Int": 2024}}, "span": {"start": 16, "end": 20}}}]
                ]}}}}
            ]
        }"#;
        let program = from_json(doc).expect("document should load");
        assert_eq!(program.body.len(), 2);
        assert!(program.source.is_none());

        let Stmt::Expr(call) = &program.body[1].node else {
            panic!("expected expression statement");
        };
        let Expr::Call(_, args) = &call.node else {
            panic!("expected call");
        };
        let CallArg::Positional(arg) = &args[0] else {
            panic!("expected positional arg");
        };
        assert_eq!(arg.node, Expr::Literal(Literal::Int(2024)));
        assert_eq!(arg.span.start, 16);
    }

    #[test]
    fn test_none_literal_encoding() {
        let program = from_json(r#"{"body": [{"node": {"Expr": {"node": {"Literal": "None"}}}}]}"#).unwrap();
        let Stmt::Expr(e) = &program.body[0].node else {
            panic!("expected expression statement");
        };
        assert!(e.node.is_none_literal());
    }

    #[test]
    fn test_malformed_document_reports_position() {
        let err = from_json("{\"body\": [").unwrap_err();
        match err {
            LoadError::Malformed { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {other}"),
        }
    }
}
