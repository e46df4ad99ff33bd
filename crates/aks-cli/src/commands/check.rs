//! Environment check command implementation.
//!
//! Non-interactive: probes everything, reports everything, installs
//! nothing.

use std::io::Write;
use std::path::PathBuf;

use aks_command::{CommandRunner, ProcessRunner};
use aks_preflight::{ClientTool, EnvironmentValidator};

use crate::commands::load_config;
use crate::error::CliError;
use crate::output::{CheckReport, OutputFormat};

/// Handler for the `check` subcommand.
pub struct CheckCommand {
    config: PathBuf,
}

impl CheckCommand {
    /// Create a check command reading the configuration at `config`.
    #[must_use]
    pub fn new(config: impl Into<PathBuf>) -> Self {
        Self {
            config: config.into(),
        }
    }

    /// Probe the environment and write the report.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the environment
    /// is not ready to deploy.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
    ) -> Result<(), CliError> {
        self.execute_with(out, format, ProcessRunner::new()).await
    }

    pub(crate) async fn execute_with<W: Write, R: CommandRunner>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        runner: R,
    ) -> Result<(), CliError> {
        let config = load_config(&self.config)?;
        let validator = EnvironmentValidator::new(runner);

        let os_supported = validator.check_operating_system().is_ok();
        let tools = validator.probe_all().await;
        // The listing itself needs the cloud CLI, so skip it when the
        // probe came back empty.
        let cli_present = tools
            .iter()
            .any(|t| t.tool == ClientTool::AzureCli && t.present);
        let subscription_listed = if cli_present {
            Some(
                validator
                    .subscription_listed(&config.subscription_id)
                    .await,
            )
        } else {
            None
        };

        let report = CheckReport {
            os_supported,
            tools,
            subscription_id: config.subscription_id,
            subscription_listed,
        };
        format.write(out, &report)?;

        if report.all_good() {
            Ok(())
        } else {
            Err(CliError::Environment(
                "environment is not ready to deploy; see the report above".into(),
            ))
        }
    }
}
