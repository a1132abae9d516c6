//! CLI module for the pyhost runtime
//!
//! An inspection tool over a freshly bootstrapped runtime.
//!
//! ## Commands
//!
//! - `taxonomy [--root CLASS]` - Print the class hierarchy as an indented tree
//! - `ancestry <CLASS>` - Print the parent chain of a class
//! - `resolve <NAME> --from <CALLER> [--module FQ]...` - Show which module an import statement resolves to
//! - `module-name <PATH> [--base DIR]` - Derive the dotted module name of a source file
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

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use pyhost_core::lang::conventions::{BASE_EXCEPTION, DEFAULT_QUALIFIER};
use pyhost_runtime::{CyclicImportPolicy, RuntimeConfig};

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

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Inspect the pyhost object runtime
#[derive(Parser, Debug)]
#[command(name = "pyhost")]
#[command(version = VERSION)]
#[command(about = "Inspect the pyhost object runtime", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Prefix of exception text (`<qualifier>: <Class>: <message>`)
    #[arg(long, global = true, default_value = DEFAULT_QUALIFIER)]
    pub qualifier: String,

    /// What an import of a module that is still initializing does
    #[arg(long, global = true, value_enum, default_value_t = CyclePolicy::Reenter)]
    pub cycles: CyclePolicy,
}

/// Command-line spelling of [`CyclicImportPolicy`].
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePolicy {
    Reenter,
    FailFast,
}

impl From<CyclePolicy> for CyclicImportPolicy {
    fn from(policy: CyclePolicy) -> Self {
        match policy {
            CyclePolicy::Reenter => CyclicImportPolicy::Reenter,
            CyclePolicy::FailFast => CyclicImportPolicy::FailFast,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the class hierarchy as an indented tree
    Taxonomy {
        /// Class whose subtree is printed
        #[arg(long, value_name = "CLASS", default_value = BASE_EXCEPTION)]
        root: String,
    },

    /// Print the parent chain of a class
    Ancestry {
        #[arg(value_name = "CLASS")]
        class: String,
    },

    /// Show which registered module an import statement resolves to
    Resolve {
        /// Name as written in the import statement
        #[arg(value_name = "NAME")]
        name: String,
        /// Fully-qualified name of the importing module
        #[arg(long = "from", value_name = "CALLER", default_value = "")]
        caller: String,
        /// Register an empty module under this fully-qualified name (repeatable)
        #[arg(long = "module", value_name = "FQ")]
        modules: Vec<String>,
    },

    /// Derive the dotted module name of a source file
    ModuleName {
        #[arg(value_name = "PATH")]
        path: PathBuf,
        /// Directory module names are relative to
        #[arg(long, value_name = "DIR", default_value = ".")]
        base: PathBuf,
    },
}

impl Cli {
    /// Runtime configuration selected by the global flags.
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig::new()
            .with_qualifier(self.qualifier.as_str())
            .with_cyclic_imports(self.cycles.into())
    }
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

    match execute(&cli) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return its output.
pub fn execute(cli: &Cli) -> CliResult<String> {
    let config = cli.runtime_config();
    match &cli.command {
        Command::Taxonomy { root } => commands::taxonomy(&config, root),
        Command::Ancestry { class } => commands::ancestry(&config, class),
        Command::Resolve { name, caller, modules } => commands::resolve(&config, name, caller, modules),
        Command::ModuleName { path, base } => commands::module_name(path, base),
    }
}

// ============================================================================
// Tests
// ============================================================================
