//! Render code generation errors with source context.
//!
//! When the AST document carries its Python source, each error is shown as a miette report pointing at the
//! offending node. Without source text only the message and help line are printed.

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, NamedSource, SourceSpan};
use thiserror::Error;

use crate::backend::{CodegenError, CodegenErrors};

/// One code generation error, prepared for miette.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(pyshim::codegen))]
pub struct CodegenDiagnostic {
    message: String,
    #[source_code]
    src: NamedSource<String>,
    #[label("not emulated")]
    span: Option<SourceSpan>,
    #[help]
    help: Option<String>,
}

impl CodegenDiagnostic {
    pub fn new(file_name: &str, source: &str, error: &CodegenError) -> Self {
        let span = error
            .span()
            .filter(|s| s.start <= s.end && s.end <= source.len() && !source.is_empty())
            .map(|s| SourceSpan::from((s.start, s.len())));
        Self {
            message: error.to_string(),
            src: NamedSource::new(file_name, source.to_string()),
            span,
            help: error.help(),
        }
    }
}

/// Render every error in `errors` into one string.
pub fn render(file_name: &str, source: Option<&str>, errors: &CodegenErrors) -> String {
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    let mut out = String::new();
    for error in errors.iter() {
        match source {
            Some(source) => {
                let diagnostic = CodegenDiagnostic::new(file_name, source, error);
                if handler.render_report(&mut out, &diagnostic).is_err() {
                    out.push_str(&format!("error: {}\n", error));
                }
            }
            None => {
                out.push_str(&format!("error: {}\n", error));
                if let Some(help) = error.help() {
                    out.push_str(&format!("  help: {}\n", help));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyshim_syntax::ast::Span;

    fn symbol_error() -> CodegenErrors {
        CodegenErrors::single(CodegenError::UnsupportedSymbol {
            module: "calendar",
            symbol: "prcal".into(),
            span: Span::new(16, 30),
        })
    }

    #[test]
    fn test_render_with_source_points_at_call() {
        let source = "import calendar\ncalendar.prcal()\n";
        let text = render("prog.py", Some(source), &symbol_error());
        assert!(text.contains("`calendar.prcal` is not emulated"));
        assert!(text.contains("prog.py"));
        assert!(text.contains("pyshim symbols calendar"));
    }

    #[test]
    fn test_render_without_source() {
        let text = render("prog.json", None, &symbol_error());
        assert_eq!(
            text,
            "error: `calendar.prcal` is not emulated\n  help: run `pyshim symbols calendar` to list what it provides\n"
        );
    }

    #[test]
    fn test_out_of_range_span_is_dropped() {
        let err = CodegenError::unsupported("lambda", Span::new(40, 50));
        let diagnostic = CodegenDiagnostic::new("p.py", "x = 1\n", &err);
        assert!(diagnostic.span.is_none());
    }

    #[test]
    fn test_inverted_span_is_dropped() {
        let err = CodegenError::unsupported("lambda", Span { start: 5, end: 2 });
        let diagnostic = CodegenDiagnostic::new("p.py", "x = lambda: 1\n", &err);
        assert!(diagnostic.span.is_none());
        let text = render("p.py", Some("x = lambda: 1\n"), &CodegenErrors::single(err));
        assert!(!text.contains("OutOfBounds"));
        assert!(text.contains("unsupported lambda"));
    }
}
