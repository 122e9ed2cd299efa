//! CLI module for pyshim
//!
//! ## Commands
//!
//! - `emit <file>` - Generate Zig from an AST document
//! - `modules` - List the emulated standard-library modules
//! - `symbols <module>` - List what one module's dispatch table provides
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//! - `diagnostics` - miette rendering of code generation errors
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod diagnostics;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::version::PYSHIM_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Standard-library shim code generator for Python-to-Zig compilation
#[derive(Parser, Debug)]
#[command(name = "pyshim")]
#[command(version = PYSHIM_VERSION)]
#[command(about = "Generate Zig for Python programs that use emulated standard-library modules", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate Zig from a JSON AST document
    Emit {
        /// AST document (`{"source": ..., "body": [...]}`)
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Spaces per indentation level
        #[arg(long, value_name = "N", default_value_t = 4)]
        indent_width: usize,
        /// Emit bare statements without the `main` wrapper
        #[arg(long)]
        fragment: bool,
        /// Report every failing statement instead of stopping at the first
        #[arg(long)]
        keep_going: bool,
    },

    /// List the emulated standard-library modules
    Modules,

    /// List the symbols one module provides
    Symbols {
        /// Module name, e.g. `heapq`
        #[arg(value_name = "MODULE")]
        module: String,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Emit {
            file,
            indent_width,
            fragment,
            keep_going,
        } => {
            let mut config = crate::CodegenConfig::new()
                .with_indent_width(indent_width)
                .with_keep_going(keep_going);
            if fragment {
                config = config.fragment();
            }
            let zig = commands::emit_file(&file, config)?;
            print!("{}", zig);
            Ok(ExitCode::SUCCESS)
        }
        Command::Modules => {
            print!("{}", commands::list_modules());
            Ok(ExitCode::SUCCESS)
        }
        Command::Symbols { module } => {
            print!("{}", commands::list_symbols(&module)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
