//! CLI command implementations
//!
//! Each command bootstraps a fresh [`Runtime`] and returns its report as a `String`. Printing and exiting
//! happen in the top-level `run()`.

use std::path::Path;

use pyhost_core::names;
use pyhost_runtime::{ExecutionContext, Runtime, RuntimeConfig, RuntimeError};
use thiserror::Error;

use super::{CliError, CliResult};

/// Failures of the inspection commands, before they are turned into a [`CliError`].
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown class `{0}`")]
    UnknownClass(String),

    #[error("`{path}` is not a module beneath `{base}`")]
    NotAModule { path: String, base: String },

    /// A managed exception escaped, already rendered in its full textual form.
    #[error("{0}")]
    Raised(String),

    #[error(transparent)]
    Bootstrap(#[from] RuntimeError),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            // Bootstrap failures are runtime bugs; show the full diagnostic.
            CommandError::Bootstrap(err) => CliError::failure(format!("{:?}", miette::Report::new(err))),
            other => CliError::failure(format!("error: {other}")),
        }
    }
}

fn bootstrap(config: &RuntimeConfig) -> Result<Runtime, CommandError> {
    Ok(Runtime::bootstrap(config.clone())?)
}

/// Render the class hierarchy beneath `root` as an indented tree.
#[tracing::instrument(skip(config))]
pub fn taxonomy(config: &RuntimeConfig, root: &str) -> CliResult<String> {
    let rt = bootstrap(config)?;
    let class = rt
        .classes()
        .get(root)
        .ok_or_else(|| CommandError::UnknownClass(root.to_string()))?;
    Ok(rt.classes().render_tree(&class))
}

/// The parent chain of `class_name`, nearest first, ending at `object`.
#[tracing::instrument(skip(config))]
pub fn ancestry(config: &RuntimeConfig, class_name: &str) -> CliResult<String> {
    let rt = bootstrap(config)?;
    let class = rt
        .classes()
        .get(class_name)
        .ok_or_else(|| CommandError::UnknownClass(class_name.to_string()))?;
    Ok(format!("{}\n", class.ancestry_names().join(" -> ")))
}

/// Register an empty module under each of `modules`, then import `requested` from `caller`.
///
/// ## Returns
/// - (`CliResult<String>`): `"<fq_name> (<tier>)"` for a successful import.
///
/// ## Errors
/// - The `ImportError` text when no tier resolves.
#[tracing::instrument(skip(config))]
pub fn resolve(config: &RuntimeConfig, requested: &str, caller: &str, modules: &[String]) -> CliResult<String> {
    let rt = bootstrap(config)?;
    for fq_name in modules {
        rt.register_module(fq_name.as_str(), |ctx: &ExecutionContext<'_>| Ok(ctx.new_module()));
    }

    let resolution = rt
        .resolve(requested, caller)
        .ok_or_else(|| CommandError::Raised(rt.import_error(requested).to_string()))?;
    let module = rt
        .load(&resolution)
        .map_err(|raised| CommandError::Raised(raised.to_string()))?;
    Ok(format!("{} ({})\n", module.fq_name(), resolution.tier))
}

/// Dotted module name of the source file at `path`, relative to `base`.
pub fn module_name(path: &Path, base: &Path) -> CliResult<String> {
    // `.` is not a component prefix of a relative path like `app/models.py`.
    let base = if base == Path::new(".") { Path::new("") } else { base };
    let name = names::module_name_from_path(path, base).ok_or_else(|| CommandError::NotAModule {
        path: path.display().to_string(),
        base: base.display().to_string(),
    })?;
    Ok(format!("{name}\n"))
}
