//! # aks-cli
//!
//! Command-line interface for the AKS deployment pipeline.
//!
//! Provides commands for:
//! - Environment readiness checks (`check`)
//! - End-to-end cluster deployment (`deploy`)
//!
//! # Architecture
//!
//! Both commands read a [`aks_config::DeploymentConfig`] JSON file. `check`
//! probes the client tooling and reports; `deploy` additionally walks the
//! interactive install prompts and then hands the configuration to
//! [`aks_pipeline::ClusterOrchestrator`], which shells out to the Azure and
//! Kubernetes tools through `aks-command`.
//!
//! ```text
//! ┌───────────┐   az / aks-engine    ┌─────────────────┐
//! │  aks-cli  │─────────────────────►│  Azure          │
//! │           │   helm / kubectl     ├─────────────────┤
//! │           │─────────────────────►│  AKS cluster    │
//! └───────────┘                      └─────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, ConfigArgs, Format};
pub use commands::{CheckCommand, DeployCommand};
pub use error::CliError;
pub use output::{CheckReport, OutputFormat};
