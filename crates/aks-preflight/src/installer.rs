//! The tool installer capability and its script-based implementation.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use aks_command::{CommandRunner, ExecutionContext};

use crate::error::{PreflightError, PreflightResult};
use crate::tools::ClientTool;

/// Capability for installing a missing client tool.
#[allow(async_fn_in_trait)]
pub trait ToolInstaller: Send + Sync {
    /// Install the given tool.
    ///
    /// # Errors
    ///
    /// Returns an error only when an install step cannot be run at all.
    /// A step that runs and reports failure is logged, not propagated;
    /// installation success is not verified afterwards either.
    async fn install(&self, tool: ClientTool) -> PreflightResult<()>;
}

/// Installs tools by running the vendor install scripts.
#[derive(Debug, Clone)]
pub struct ScriptInstaller<R> {
    runner: R,
}

impl<R: CommandRunner> ScriptInstaller<R> {
    /// Create an installer that runs install steps through `runner`.
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> ToolInstaller for ScriptInstaller<R> {
    async fn install(&self, tool: ClientTool) -> PreflightResult<()> {
        for step in tool.install_steps() {
            info!(tool = %tool, command = %step, "running install step");
            let output = self
                .runner
                .run(&step, &ExecutionContext::local())
                .await
                .map_err(|e| PreflightError::install(tool, e))?;
            if !output.success() {
                warn!(
                    tool = %tool,
                    exit_code = output.exit_code,
                    "install step reported failure, continuing"
                );
            }
        }
        Ok(())
    }
}

/// Test installer: records which tools were requested, installs nothing.
#[derive(Debug, Clone, Default)]
pub struct RecordingInstaller {
    installed: Arc<RwLock<Vec<ClientTool>>>,
}

impl RecordingInstaller {
    /// Create a recording installer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The tools whose installation was requested, in order.
    pub async fn installed(&self) -> Vec<ClientTool> {
        self.installed.read().await.clone()
    }
}

impl ToolInstaller for RecordingInstaller {
    async fn install(&self, tool: ClientTool) -> PreflightResult<()> {
        self.installed.write().await.push(tool);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aks_command::{CommandOutput, ScriptedRunner};

    #[tokio::test]
    async fn script_installer_runs_every_engine_step() {
        let runner = ScriptedRunner::new();
        let installer = ScriptInstaller::new(runner.clone());

        installer
            .install(ClientTool::AksEngine)
            .await
            .expect("install should run");

        let calls = runner.calls().await;
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].program, "curl");
        assert_eq!(calls[1].program, "chmod");
        assert_eq!(calls[2].program, "./get-akse.sh");
    }

    #[tokio::test]
    async fn failed_step_does_not_abort_the_install() {
        let runner = ScriptedRunner::new();
        runner
            .respond("chmod", CommandOutput::failed(1, b"denied".to_vec()))
            .await;
        let installer = ScriptInstaller::new(runner.clone());

        installer
            .install(ClientTool::AksEngine)
            .await
            .expect("failure of a step is logged, not fatal");
        assert_eq!(runner.call_count().await, 3);
    }

    #[tokio::test]
    async fn unspawnable_step_is_fatal() {
        let runner = ScriptedRunner::new();
        runner.refuse("curl").await;
        let installer = ScriptInstaller::new(runner.clone());

        let err = installer
            .install(ClientTool::AksEngine)
            .await
            .expect_err("spawn failure should propagate");
        assert!(matches!(err, PreflightError::Install { .. }));
    }

    #[tokio::test]
    async fn recording_installer_remembers_requests() {
        let installer = RecordingInstaller::new();
        installer
            .install(ClientTool::Helm3)
            .await
            .expect("recording install");
        assert_eq!(installer.installed().await, [ClientTool::Helm3]);
    }
}
