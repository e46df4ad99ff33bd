//! Core pipeline types: stages, run identity, credentials, reports.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use aks_command::ExecutionContext;

/// The states of the deployment pipeline, in execution order.
///
/// Each state past [`PipelineStage::Start`] names an effect that has been
/// achieved; the pipeline walks them strictly forward and never branches
/// back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineStage {
    /// Nothing has happened yet.
    Start,
    /// The cloud resource group exists.
    GroupCreated,
    /// The service principal exists and its credentials were extracted.
    RoleCreated,
    /// The identity-propagation delay has elapsed and the account listing
    /// was refreshed.
    Settled,
    /// The cluster deploy engine has run.
    ClusterDeployed,
    /// The target namespace exists.
    NamespaceCreated,
    /// The ingress controller chart is installed.
    IngressInstalled,
    /// All application charts and the network policy are applied.
    AppsInstalled,
    /// The run is complete.
    Done,
}

impl PipelineStage {
    /// Every stage in the order the pipeline visits them.
    pub const SEQUENCE: [Self; 9] = [
        Self::Start,
        Self::GroupCreated,
        Self::RoleCreated,
        Self::Settled,
        Self::ClusterDeployed,
        Self::NamespaceCreated,
        Self::IngressInstalled,
        Self::AppsInstalled,
        Self::Done,
    ];

    /// Stable kebab-case name, also used in serialized reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::GroupCreated => "group-created",
            Self::RoleCreated => "role-created",
            Self::Settled => "settled",
            Self::ClusterDeployed => "cluster-deployed",
            Self::NamespaceCreated => "namespace-created",
            Self::IngressInstalled => "ingress-installed",
            Self::AppsInstalled => "apps-installed",
            Self::Done => "done",
        }
    }

    /// Position of this stage in [`Self::SEQUENCE`].
    #[must_use]
    pub fn ordinal(self) -> usize {
        match self {
            Self::Start => 0,
            Self::GroupCreated => 1,
            Self::RoleCreated => 2,
            Self::Settled => 3,
            Self::ClusterDeployed => 4,
            Self::NamespaceCreated => 5,
            Self::IngressInstalled => 6,
            Self::AppsInstalled => 7,
            Self::Done => 8,
        }
    }

    /// Check whether this is the final state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    /// How a command failure inside this stage is treated.
    ///
    /// Cloud provisioning failures poison everything after them, so the
    /// group, role, settle, and deploy stages halt the run. The cluster
    /// bootstrap stages are idempotent-ish (a namespace may already exist,
    /// a chart may already be installed) and only warn.
    #[must_use]
    pub fn failure_policy(self) -> FailurePolicy {
        match self {
            Self::NamespaceCreated | Self::IngressInstalled | Self::AppsInstalled => {
                FailurePolicy::Continue
            }
            _ => FailurePolicy::Fatal,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a stage-level command failure does to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// The run stops at this stage.
    Fatal,
    /// The failure is logged and the run moves on.
    Continue,
}

impl FailurePolicy {
    /// Check whether a failure under this policy stops the run.
    #[must_use]
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Unique identity of one deployment run, for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Mint a fresh run id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The credential pair minted by the role-creation stage.
///
/// The secret never appears in `Debug` output or logs; only the deploy
/// command line sees it.
#[derive(Clone, PartialEq, Eq)]
pub struct ServicePrincipal {
    /// The application (client) id.
    pub app_id: String,
    /// The client secret.
    pub secret: String,
}

impl ServicePrincipal {
    /// Create a credential pair.
    #[must_use]
    pub fn new(app_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            secret: secret.into(),
        }
    }

    /// Check that both halves are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.app_id.is_empty() && !self.secret.is_empty()
    }
}

impl fmt::Debug for ServicePrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServicePrincipal")
            .field("app_id", &self.app_id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Outcome of one executed stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "outcome")]
pub enum StageOutcome {
    /// Every command in the stage exited zero.
    Succeeded,
    /// A command failed but the stage's policy let the run move on.
    ContinuedAfterFailure {
        /// Exit code of the first failing command.
        exit_code: i32,
    },
}

impl StageOutcome {
    /// Check whether the stage completed without any failure.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// One line of the deployment report.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    /// The stage that ran.
    pub stage: PipelineStage,
    /// How it went.
    #[serde(flatten)]
    pub outcome: StageOutcome,
}

impl StageReport {
    /// Record a stage outcome.
    #[must_use]
    pub fn new(stage: PipelineStage, outcome: StageOutcome) -> Self {
        Self { stage, outcome }
    }
}

/// Summary of a completed deployment run.
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    /// Run identity.
    pub run_id: RunId,
    /// The resource group everything was created in.
    pub resource_group: String,
    /// The cloud region.
    pub region: String,
    /// The namespace the cluster bootstrap targeted.
    pub namespace: String,
    /// The context cluster-facing commands ran under.
    pub context: ExecutionContext,
    /// Per-stage outcomes, in execution order.
    pub stages: Vec<StageReport>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
}

impl DeployReport {
    /// Number of stages that failed but were carried past.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.stages
            .iter()
            .filter(|s| !s.outcome.is_success())
            .count()
    }

    /// Check whether every stage succeeded outright.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warning_count() == 0
    }
}
