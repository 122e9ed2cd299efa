//! CLI command implementations

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use pyshim_core::lang::stdlib::{self, STDLIB_MODULES};

use crate::backend::stdlib::table_for;
use crate::backend::{CodegenConfig, generate};

use super::diagnostics;
use super::{CliError, CliResult};

/// Maximum AST document size (100 MB)
///
/// Files larger than this are rejected to prevent out-of-memory conditions
/// while deserializing.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Read an AST document.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(path: &Path) -> CliResult<String> {
    let metadata = fs::metadata(path)
        .map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", path.display(), e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "AST document '{}' is too large ({} bytes, max {} bytes)",
            path.display(),
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", path.display(), e)))
}

/// Generate Zig for the AST document at `path`.
pub fn emit_file(path: &Path, config: CodegenConfig) -> CliResult<String> {
    let text = read_source(path)?;
    let program = pyshim_syntax::load::from_json(&text)
        .map_err(|e| CliError::failure(format!("Error loading '{}': {}", path.display(), e)))?;

    generate(&program, config).map_err(|errors| {
        let file_name = path.display().to_string();
        CliError::failure(diagnostics::render(&file_name, program.source.as_deref(), &errors).trim_end())
    })
}

/// One line per emulated module: name, emulation kind, symbol count, description.
pub fn list_modules() -> String {
    let mut out = String::new();
    for info in STDLIB_MODULES {
        let table = table_for(info.id);
        let _ = writeln!(
            out,
            "{:<12} {:<11} {:>3}  {}",
            info.canonical,
            info.emulation.as_str(),
            table.len(),
            info.description
        );
    }
    out
}

/// One line per symbol in `module`'s dispatch table, with the shim kind.
pub fn list_symbols(module: &str) -> CliResult<String> {
    let Some(id) = stdlib::from_str(module) else {
        return Err(CliError::failure(format!(
            "Module '{}' is not emulated (run `pyshim modules` for the list)",
            module
        )));
    };
    let table = table_for(id);
    let mut out = String::new();
    for (symbol, shim) in table.entries {
        let _ = writeln!(out, "{:<24} {}", symbol, shim.kind());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_modules_covers_registry() {
        let text = list_modules();
        assert_eq!(text.lines().count(), STDLIB_MODULES.len());
        assert!(text.lines().any(|l| l.starts_with("heapq ")));
    }

    #[test]
    fn test_list_symbols_shows_kinds() {
        let text = list_symbols("bisect").unwrap();
        assert!(text.lines().any(|l| l.starts_with("bisect_left") && l.ends_with("computed")));
    }

    #[test]
    fn test_emit_missing_file() {
        let err = emit_file(Path::new("/nonexistent/prog.json"), CodegenConfig::new()).unwrap_err();
        assert!(err.message.starts_with("Cannot access file"));
    }
}
