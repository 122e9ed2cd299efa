//! Error types for code generation.
//!
//! These errors represent *emission* failures (as opposed to parsing or type inference). A handler that runs out
//! of arguments is not an error: it degrades to its default literal. What is an error is a construct the generator
//! cannot express at all, such as a stdlib symbol no dispatch table provides.
//!
//! ## Notes
//!
//! - Prefer actionable messages: users should know which Python construct is unsupported.
//! - Every variant except [`CodegenError::Format`] carries the span of the offending node.

use pyshim_syntax::ast::Span;
use thiserror::Error;

/// Error during code generation.
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("module `{module}` is not emulated")]
    UnsupportedModule { module: String, span: Span },

    #[error("`{module}.{symbol}` is not emulated")]
    UnsupportedSymbol {
        module: &'static str,
        symbol: String,
        span: Span,
    },

    #[error("unsupported {construct}")]
    Unsupported { construct: String, span: Span },

    #[error("failed to write generated code")]
    Format(#[from] std::fmt::Error),
}

impl CodegenError {
    pub fn unsupported(construct: impl Into<String>, span: Span) -> Self {
        CodegenError::Unsupported {
            construct: construct.into(),
            span,
        }
    }

    /// Source location of the offending node, when known.
    pub fn span(&self) -> Option<Span> {
        match self {
            CodegenError::UnsupportedModule { span, .. }
            | CodegenError::UnsupportedSymbol { span, .. }
            | CodegenError::Unsupported { span, .. } => Some(*span),
            CodegenError::Format(_) => None,
        }
    }

    /// A short hint for the user, when there is one.
    pub fn help(&self) -> Option<String> {
        match self {
            CodegenError::UnsupportedModule { .. } => {
                Some("run `pyshim modules` to list the emulated standard-library modules".to_string())
            }
            CodegenError::UnsupportedSymbol { module, .. } => {
                Some(format!("run `pyshim symbols {}` to list what it provides", module))
            }
            CodegenError::Unsupported { .. } | CodegenError::Format(_) => None,
        }
    }
}

/// Result alias used by every handler and emission routine.
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Collection of code generation errors, one per failed statement.
#[derive(Debug)]
pub struct CodegenErrors(pub Vec<CodegenError>);

impl CodegenErrors {
    pub fn single(error: CodegenError) -> Self {
        Self(vec![error])
    }

    /// `Some(CodegenErrors)` if the vector is non-empty, `None` otherwise.
    pub fn from_vec(errors: Vec<CodegenError>) -> Option<Self> {
        if errors.is_empty() { None } else { Some(Self(errors)) }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CodegenError> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&CodegenError> {
        self.0.first()
    }
}

impl std::fmt::Display for CodegenErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.len() == 1 {
            write!(f, "{}", self.0[0])
        } else {
            writeln!(f, "{} code generation errors:", self.0.len())?;
            for (i, err) in self.0.iter().enumerate() {
                writeln!(f, "  {}: {}", i + 1, err)?;
            }
            Ok(())
        }
    }
}

impl std::error::Error for CodegenErrors {}

impl From<CodegenError> for CodegenErrors {
    fn from(e: CodegenError) -> Self {
        CodegenErrors::single(e)
    }
}
