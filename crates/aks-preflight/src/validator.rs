//! The environment validator: OS gate, tool probes, interactive remediation.

use tracing::{debug, info};

use aks_command::{CommandLine, CommandRunner, ExecutionContext};

use crate::error::{PreflightError, PreflightResult};
use crate::installer::ToolInstaller;
use crate::prompt::PromptAsk;
use crate::tools::{ClientTool, ToolStatus};

/// The static prerequisites list shown when the operator declines an
/// installation.
pub const PREREQUISITES: &str = "Client prerequisites:
  Linux OS
  Azure CLI
  Azure AKS-Engine
  Helm 3
The Azure CLI, AKS-Engine, and Helm can be installed by this tool;
rerun and answer \"yes\" when the installation is offered.";

/// Validates that the operator host can run the deployment pipeline.
///
/// Checks run in a fixed order: operating system first (no remediation),
/// then each tool in [`ClientTool::CHECK_ORDER`]. A missing tool triggers a
/// yes/no remediation prompt; accepting delegates to the installer and the
/// check is not repeated afterwards, declining prints the prerequisites list
/// and stops the validation immediately.
#[derive(Debug, Clone)]
pub struct EnvironmentValidator<R> {
    runner: R,
}

impl<R: CommandRunner> EnvironmentValidator<R> {
    /// Create a validator probing through `runner`.
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Check that the host operating system is supported.
    ///
    /// # Errors
    ///
    /// Returns an error on anything but Linux.
    pub fn check_operating_system(&self) -> PreflightResult<()> {
        Self::validate_os(std::env::consts::OS)
    }

    fn validate_os(os: &str) -> PreflightResult<()> {
        if os == "linux" {
            Ok(())
        } else {
            Err(PreflightError::unsupported_os(os))
        }
    }

    /// Probe one tool without any interaction.
    pub async fn probe(&self, tool: ClientTool) -> ToolStatus {
        match self
            .runner
            .run(&tool.probe_command(), &ExecutionContext::local())
            .await
        {
            Ok(output) => ToolStatus::from_output(tool, &output),
            Err(e) => {
                debug!(tool = %tool, error = %e, "probe did not run");
                ToolStatus::absent(tool)
            }
        }
    }

    /// Probe every tool in check order without any interaction.
    pub async fn probe_all(&self) -> Vec<ToolStatus> {
        let mut statuses = Vec::with_capacity(ClientTool::CHECK_ORDER.len());
        for tool in ClientTool::CHECK_ORDER {
            statuses.push(self.probe(tool).await);
        }
        statuses
    }

    /// Run the full interactive validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS is unsupported, the operator declines an
    /// installation, or an accepted installation cannot be run.
    pub async fn validate<P, I>(&self, prompt: &mut P, installer: &I) -> PreflightResult<()>
    where
        P: PromptAsk,
        I: ToolInstaller,
    {
        self.check_operating_system()?;

        for tool in ClientTool::CHECK_ORDER {
            let status = self.probe(tool).await;
            if status.present {
                info!(tool = %tool, "present");
                continue;
            }

            println!("{tool} is not installed on this client.");
            if prompt.confirm(&tool.prompt_question()) {
                // Deliberate gap carried from the source behavior: the
                // install result is trusted, the probe is not repeated.
                installer.install(tool).await?;
                info!(tool = %tool, "installed on request, not re-verified");
            } else {
                println!("{PREREQUISITES}");
                return Err(PreflightError::declined(tool));
            }
        }

        Ok(())
    }

    /// Check whether the configured subscription shows up in the account
    /// listing. Best-effort: any probe failure reports `false`.
    pub async fn subscription_listed(&self, subscription_id: &str) -> bool {
        let line = CommandLine::new("az").args(["account", "list", "--output", "table"]);
        match self.runner.run(&line, &ExecutionContext::local()).await {
            Ok(output) if output.success() => output.stdout_lossy().contains(subscription_id),
            Ok(output) => {
                debug!(exit_code = output.exit_code, "account listing failed");
                false
            }
            Err(e) => {
                debug!(error = %e, "account listing did not run");
                false
            }
        }
    }
}
