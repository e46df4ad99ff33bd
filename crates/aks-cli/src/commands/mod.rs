//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`check`] - non-interactive environment report
//! - [`deploy`] - environment validation plus the full pipeline

pub mod check;
pub mod deploy;

pub use check::CheckCommand;
pub use deploy::DeployCommand;

use std::path::Path;

use aks_config::DeploymentConfig;

use crate::error::CliError;

/// Load and validate the deployment configuration, printing the expected
/// shape to stderr when the file is missing or invalid.
pub(crate) fn load_config(path: &Path) -> Result<DeploymentConfig, CliError> {
    DeploymentConfig::from_file(path).map_err(|e| {
        eprintln!(
            "Expected configuration shape:\n{}",
            DeploymentConfig::example()
        );
        CliError::from(e)
    })
}
