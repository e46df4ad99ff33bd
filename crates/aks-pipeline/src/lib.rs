//! # aks-pipeline
//!
//! The AKS cluster deployment pipeline for aksdeploy.
//!
//! A [`ClusterOrchestrator`] walks an ordered, gated stage sequence: create
//! the resource group, mint a service principal and extract its credentials,
//! wait out identity propagation, deploy the cluster through the engine,
//! then bootstrap it (namespace, ingress controller, application charts,
//! network policy). Provisioning failures halt the run; bootstrap failures
//! are logged and carried in the final [`DeployReport`].
//!
//! Every external effect flows through the `aks-command` runner seam, so
//! the whole pipeline is drivable against a scripted runner in tests.
//!
//! ## Modules
//!
//! - [`orchestrator`]: the stage sequence and context decision
//! - [`credentials`]: service principal extraction from role output
//! - [`ingress`]: ingress controller installation
//! - [`apps`]: application charts and network policy
//! - [`types`]: stages, outcomes, reports, run identity
//! - [`error`]: error types

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod apps;
pub mod credentials;
pub mod error;
pub mod ingress;
pub mod orchestrator;
mod steps;
pub mod types;

pub use apps::AppInstaller;
pub use credentials::{CredentialParser, JsonCredentialParser, QuoteSplitParser};
pub use error::{CredentialError, PipelineError, PipelineResult};
pub use ingress::IngressInstaller;
pub use orchestrator::ClusterOrchestrator;
pub use types::{
    DeployReport, FailurePolicy, PipelineStage, RunId, ServicePrincipal, StageOutcome,
    StageReport,
};
