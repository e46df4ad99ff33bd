//! Deploy command implementation.
//!
//! Validates the operator environment interactively, then drives the full
//! deployment pipeline and prints the final report.

use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use aks_command::{CommandRunner, ProcessRunner};
use aks_config::DeploymentConfig;
use aks_pipeline::ClusterOrchestrator;
use aks_preflight::{EnvironmentValidator, PromptAsk, ScriptInstaller, StdinPrompt, ToolInstaller};

use crate::commands::load_config;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Handler for the `deploy` subcommand.
pub struct DeployCommand {
    config: PathBuf,
}

impl DeployCommand {
    /// Create a deploy command reading the configuration at `config`.
    #[must_use]
    pub fn new(config: impl Into<PathBuf>) -> Self {
        Self {
            config: config.into(),
        }
    }

    /// Validate the environment, run the pipeline, print the report.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the environment
    /// validation fails, or a fatal pipeline stage fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
    ) -> Result<(), CliError> {
        let config = load_config(&self.config)?;
        let runner = match config.command_timeout() {
            Some(timeout) => ProcessRunner::new().with_timeout(timeout),
            None => ProcessRunner::new(),
        };
        let installer = ScriptInstaller::new(runner.clone());
        let mut prompt = StdinPrompt::new();
        deploy_with(out, format, config, runner, &mut prompt, &installer).await
    }
}

/// The deploy flow with every collaborator injected.
pub(crate) async fn deploy_with<W, R, P, I>(
    out: &mut W,
    format: &OutputFormat,
    config: DeploymentConfig,
    runner: R,
    prompt: &mut P,
    installer: &I,
) -> Result<(), CliError>
where
    W: Write,
    R: CommandRunner + Clone,
    P: PromptAsk,
    I: ToolInstaller,
{
    let validator = EnvironmentValidator::new(runner.clone());
    validator.validate(prompt, installer).await?;
    info!("environment validated, starting the pipeline");

    let orchestrator = ClusterOrchestrator::new(config, runner);
    let report = orchestrator.run().await?;
    format.write(out, &report)?;
    Ok(())
}
