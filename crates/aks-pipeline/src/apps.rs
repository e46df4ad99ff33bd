//! Application chart installation and network policy.
//!
//! Installs every configured application chart into the target namespace in
//! the order the configuration lists them, then applies the network-policy
//! manifest that locks down inter-service traffic.

use aks_command::{CommandLine, CommandRunner, ExecutionContext};
use aks_config::ChartRef;

use crate::error::PipelineResult;
use crate::steps::run_stage;
use crate::types::{PipelineStage, StageOutcome};

/// Installs the configured application charts plus the network policy.
#[derive(Debug, Clone)]
pub struct AppInstaller {
    namespace: String,
    charts: Vec<ChartRef>,
    network_policy: String,
}

impl AppInstaller {
    /// Create an installer for `charts` targeting `namespace`.
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        charts: Vec<ChartRef>,
        network_policy: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            charts,
            network_policy: network_policy.into(),
        }
    }

    /// The command sequence: one chart install per application, then the
    /// network-policy apply.
    #[must_use]
    pub fn commands(&self) -> Vec<CommandLine> {
        let mut commands = Vec::with_capacity(self.charts.len() + 1);
        for chart in &self.charts {
            commands.push(
                CommandLine::new("helm")
                    .arg("install")
                    .arg(&chart.name)
                    .arg(&chart.chart)
                    .arg("--namespace")
                    .arg(&self.namespace),
            );
        }
        commands.push(
            CommandLine::new("kubectl")
                .args(["apply", "-f"])
                .arg(&self.network_policy)
                .arg("--namespace")
                .arg(&self.namespace),
        );
        commands
    }

    /// Install every chart and apply the network policy under the decided
    /// context.
    ///
    /// # Errors
    ///
    /// Returns an error only when a command cannot be run at all; chart
    /// failures are carried in the outcome.
    pub async fn install<R: CommandRunner>(
        &self,
        runner: &R,
        context: &ExecutionContext,
    ) -> PipelineResult<StageOutcome> {
        run_stage(
            runner,
            PipelineStage::AppsInstalled,
            &self.commands(),
            context,
        )
        .await
    }
}
