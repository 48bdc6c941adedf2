//! Command implementations for the knit CLI
//!
//! Each command module provides a `run` function that executes the command logic.

pub mod batch;
pub mod build;
pub mod completions;
pub mod convert;
pub mod inspect;
pub mod validate;

use anyhow::{Context, Result};
use knit_core::TechniqueTable;
use std::path::Path;

use crate::config::KnitConfig;

/// Load the technique table named on the command line or in the config.
///
/// A missing file yields an empty table; a malformed one is an error, since
/// no pattern could be built against it.
pub(crate) fn load_techniques(
    config: &KnitConfig,
    cli_override: Option<&Path>,
) -> Result<TechniqueTable> {
    let path = config.techniques_path(cli_override);
    let table = TechniqueTable::load(&path)
        .with_context(|| format!("Failed to load techniques from {}", path.display()))?;
    tracing::debug!("{} techniques from {}", table.len(), path.display());
    Ok(table)
}
