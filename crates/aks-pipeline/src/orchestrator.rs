//! The deployment pipeline orchestrator.
//!
//! [`ClusterOrchestrator`] is the sole caller of every stage. It walks the
//! stage sequence strictly forward, decides the execution context once per
//! run, and owns the run-scoped service principal between the role stage
//! and the deploy stage. Cloud provisioning always runs under the local
//! context; only cluster-facing commands (namespace onward) carry the
//! decided context.

use std::io::{self, Write as _};
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use aks_command::{CommandLine, CommandRunner, ExecutionContext};
use aks_config::DeploymentConfig;

use crate::apps::AppInstaller;
use crate::credentials::{CredentialParser, QuoteSplitParser};
use crate::error::{CredentialError, PipelineResult};
use crate::ingress::IngressInstaller;
use crate::steps::{run_fatal, run_stage};
use crate::types::{
    DeployReport, PipelineStage, RunId, ServicePrincipal, StageOutcome, StageReport,
};

/// Drives the ordered deployment pipeline.
pub struct ClusterOrchestrator<R> {
    config: DeploymentConfig,
    runner: R,
    parser: Box<dyn CredentialParser>,
}

impl<R: CommandRunner> ClusterOrchestrator<R> {
    /// Create an orchestrator with the stock positional credential parser.
    #[must_use]
    pub fn new(config: DeploymentConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            parser: Box::new(QuoteSplitParser),
        }
    }

    /// Swap in a different credential parser.
    #[must_use]
    pub fn with_parser(mut self, parser: impl CredentialParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    /// The context cluster-facing commands run under, decided once per run
    /// from the local-test flag.
    #[must_use]
    pub fn cluster_context(&self) -> ExecutionContext {
        if self.config.is_local_test() {
            ExecutionContext::local()
        } else {
            ExecutionContext::remote(
                &self.config.output_dir,
                &self.config.resource_group,
                &self.config.region,
            )
        }
    }

    /// Run the pipeline from start to finish.
    ///
    /// # Errors
    ///
    /// Returns an error when a provisioning stage (group, role, settle,
    /// deploy) fails or the service principal credentials cannot be
    /// extracted. Bootstrap stage failures are carried in the report
    /// instead.
    pub async fn run(&self) -> PipelineResult<DeployReport> {
        let run_id = RunId::new();
        let started_at = Utc::now();
        let context = self.cluster_context();
        info!(
            %run_id,
            resource_group = %self.config.resource_group,
            region = %self.config.region,
            cluster_context = %context,
            "starting deployment"
        );

        let mut stages = Vec::new();

        self.create_group().await?;
        record(&mut stages, PipelineStage::GroupCreated, StageOutcome::Succeeded);

        let principal = self.create_role().await?;
        record(&mut stages, PipelineStage::RoleCreated, StageOutcome::Succeeded);

        self.settle().await?;
        record(&mut stages, PipelineStage::Settled, StageOutcome::Succeeded);

        self.deploy_cluster(&principal).await?;
        record(&mut stages, PipelineStage::ClusterDeployed, StageOutcome::Succeeded);

        let outcome = self.create_namespace(&context).await?;
        record(&mut stages, PipelineStage::NamespaceCreated, outcome);

        let ingress = IngressInstaller::new(&self.config.namespace, self.config.ingress_replicas);
        let outcome = ingress.install(&self.runner, &context).await?;
        record(&mut stages, PipelineStage::IngressInstalled, outcome);

        let apps = AppInstaller::new(
            &self.config.namespace,
            self.config.applications.clone(),
            &self.config.network_policy,
        );
        let outcome = apps.install(&self.runner, &context).await?;
        record(&mut stages, PipelineStage::AppsInstalled, outcome);

        let report = DeployReport {
            run_id,
            resource_group: self.config.resource_group.clone(),
            region: self.config.region.clone(),
            namespace: self.config.namespace.clone(),
            context,
            stages,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            %run_id,
            warnings = report.warning_count(),
            "deployment finished"
        );
        Ok(report)
    }

    async fn create_group(&self) -> PipelineResult<()> {
        let command = CommandLine::new("az")
            .args(["group", "create", "--name"])
            .arg(&self.config.resource_group)
            .arg("--location")
            .arg(&self.config.region);
        run_stage(
            &self.runner,
            PipelineStage::GroupCreated,
            &[command],
            &ExecutionContext::local(),
        )
        .await?;
        Ok(())
    }

    async fn create_role(&self) -> PipelineResult<ServicePrincipal> {
        let scope = format!(
            "/subscriptions/{}/resourceGroups/{}",
            self.config.subscription_id, self.config.resource_group
        );
        let command = CommandLine::new("az")
            .args(["ad", "sp", "create-for-rbac", "--role"])
            .arg(&self.config.rbac_role)
            .arg("--scopes")
            .arg(&scope);
        // Credential extraction needs the captured stdout, so this stage
        // calls the fatal primitive directly instead of the policy dispatch.
        let output = run_fatal(
            &self.runner,
            PipelineStage::RoleCreated,
            &command,
            &ExecutionContext::local(),
        )
        .await?;

        let principal = self.parser.parse(&output.stdout_lossy())?;
        // The stock parsers refuse empty fields already; this guards
        // swapped-in parsers, since the deploy command must never see an
        // empty credential.
        if principal.app_id.is_empty() {
            return Err(CredentialError::empty_field("application id").into());
        }
        if principal.secret.is_empty() {
            return Err(CredentialError::empty_field("secret").into());
        }
        Ok(principal)
    }

    async fn settle(&self) -> PipelineResult<()> {
        let seconds = self.config.settle_delay().as_secs();
        info!(seconds, "waiting for identity propagation");
        for _ in 0..seconds {
            tokio::time::sleep(Duration::from_secs(1)).await;
            print!(".");
            let _ = io::stdout().flush();
        }
        if seconds > 0 {
            println!();
        }

        let refresh = CommandLine::new("az").args(["account", "list", "--refresh"]);
        run_stage(
            &self.runner,
            PipelineStage::Settled,
            &[refresh],
            &ExecutionContext::local(),
        )
        .await?;
        Ok(())
    }

    async fn deploy_cluster(&self, principal: &ServicePrincipal) -> PipelineResult<()> {
        let command = CommandLine::new("aks-engine")
            .args(["deploy", "--subscription-id"])
            .arg(&self.config.subscription_id)
            .arg("--dns-prefix")
            .arg(self.config.dns_prefix())
            .arg("--resource-group")
            .arg(&self.config.resource_group)
            .arg("--location")
            .arg(&self.config.region)
            .arg("--api-model")
            .arg(&self.config.cluster_model)
            .arg("--client-id")
            .arg(&principal.app_id)
            .arg("--client-secret")
            .arg(&principal.secret)
            .arg("--set")
            .arg(&format!(
                "servicePrincipalProfile.clientId={}",
                principal.app_id
            ))
            .arg("--set")
            .arg(&format!("servicePrincipalProfile.secret={}", principal.secret))
            .arg("--set")
            .arg(&format!(
                "agentPoolProfiles[0].count={}",
                self.config.node_count
            ));
        run_stage(
            &self.runner,
            PipelineStage::ClusterDeployed,
            &[command],
            &ExecutionContext::local(),
        )
        .await?;
        Ok(())
    }

    async fn create_namespace(&self, context: &ExecutionContext) -> PipelineResult<StageOutcome> {
        let command = CommandLine::new("kubectl")
            .args(["create", "namespace"])
            .arg(&self.config.namespace);
        run_stage(
            &self.runner,
            PipelineStage::NamespaceCreated,
            &[command],
            context,
        )
        .await
    }
}

fn record(stages: &mut Vec<StageReport>, stage: PipelineStage, outcome: StageOutcome) {
    match outcome {
        StageOutcome::Succeeded => info!(stage = %stage, "stage complete"),
        StageOutcome::ContinuedAfterFailure { exit_code } => {
            warn!(stage = %stage, exit_code, "stage completed with failures");
        }
    }
    stages.push(StageReport::new(stage, outcome));
}
