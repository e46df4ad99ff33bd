//! Ingress controller installation.
//!
//! Registers the ingress-nginx chart repository and installs the controller
//! into the target namespace with the configured replica count. Both the
//! controller and the default backend are pinned to Linux nodes through a
//! node-selector override.

use aks_command::{CommandLine, CommandRunner, ExecutionContext};

use crate::error::PipelineResult;
use crate::steps::run_stage;
use crate::types::{PipelineStage, StageOutcome};

/// Chart repository the ingress controller is pulled from.
const INGRESS_REPO_URL: &str = "https://kubernetes.github.io/ingress-nginx";

/// Node-selector key with helm-escaped dots, so helm reads one key named
/// `beta.kubernetes.io/os` instead of a nested path.
const LINUX_NODE_SELECTOR: &str = "beta\\.kubernetes\\.io/os=linux";

/// Installs the nginx ingress controller chart.
#[derive(Debug, Clone)]
pub struct IngressInstaller {
    namespace: String,
    replicas: u32,
}

impl IngressInstaller {
    /// Create an installer targeting `namespace` with `replicas` controller
    /// replicas.
    #[must_use]
    pub fn new(namespace: impl Into<String>, replicas: u32) -> Self {
        Self {
            namespace: namespace.into(),
            replicas,
        }
    }

    /// The command sequence: repository registration, then the chart
    /// install.
    #[must_use]
    pub fn commands(&self) -> Vec<CommandLine> {
        let repo_add =
            CommandLine::new("helm").args(["repo", "add", "ingress-nginx", INGRESS_REPO_URL]);
        let install = CommandLine::new("helm")
            .args(["install", "nginx-ingress", "ingress-nginx/ingress-nginx"])
            .arg("--namespace")
            .arg(&self.namespace)
            .arg("--set")
            .arg(&format!("controller.replicaCount={}", self.replicas))
            .arg("--set")
            .arg(&format!("controller.nodeSelector.{LINUX_NODE_SELECTOR}"))
            .arg("--set")
            .arg(&format!("defaultBackend.nodeSelector.{LINUX_NODE_SELECTOR}"));
        vec![repo_add, install]
    }

    /// Install the ingress controller under the decided context.
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
            PipelineStage::IngressInstalled,
            &self.commands(),
            context,
        )
        .await
    }
}
