//! Execution context selection: local default kube-context vs. a remote
//! per-cluster kubeconfig file.
//!
//! The context is decided once per deployment run and tagged onto every
//! cluster-facing command. For a remote context the runner points the
//! `KUBECONFIG` environment variable at the file the deploy engine writes
//! under its output directory.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable consulted by `kubectl` and `helm` for the cluster
/// credentials file.
pub const KUBECONFIG_ENV: &str = "KUBECONFIG";

/// Where a cluster-facing command should run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionContext {
    /// Run against whatever kube-context the operator shell already has.
    Local,
    /// Run against the deployed cluster's kubeconfig file.
    Remote {
        /// Path to the per-cluster kubeconfig file.
        kubeconfig: PathBuf,
    },
}

impl ExecutionContext {
    /// The local default context.
    #[must_use]
    pub fn local() -> Self {
        Self::Local
    }

    /// A remote context whose kubeconfig path is derived from the engine's
    /// output directory, the resource group, and the region.
    #[must_use]
    pub fn remote(output_dir: &Path, resource_group: &str, region: &str) -> Self {
        Self::Remote {
            kubeconfig: kubeconfig_path(output_dir, resource_group, region),
        }
    }

    /// Check whether this is the remote context.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// The kubeconfig path a command under this context must see, if any.
    #[must_use]
    pub fn kubeconfig(&self) -> Option<&Path> {
        match self {
            Self::Local => None,
            Self::Remote { kubeconfig } => Some(kubeconfig),
        }
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote { kubeconfig } => write!(f, "remote ({})", kubeconfig.display()),
        }
    }
}

/// Derive the kubeconfig file path the deploy engine writes for a cluster:
/// `<output-dir>/<resource-group>/kubeconfig/kubeconfig.<region>.json`.
#[must_use]
pub fn kubeconfig_path(output_dir: &Path, resource_group: &str, region: &str) -> PathBuf {
    output_dir
        .join(resource_group)
        .join("kubeconfig")
        .join(format!("kubeconfig.{region}.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kubeconfig_path_shape() {
        let path = kubeconfig_path(Path::new("_output"), "rg1", "westeurope");
        assert_eq!(
            path,
            PathBuf::from("_output/rg1/kubeconfig/kubeconfig.westeurope.json")
        );
    }

    #[test]
    fn remote_carries_derived_path() {
        let ctx = ExecutionContext::remote(Path::new("_output"), "rg1", "westeurope");
        assert!(ctx.is_remote());
        assert_eq!(
            ctx.kubeconfig(),
            Some(Path::new("_output/rg1/kubeconfig/kubeconfig.westeurope.json"))
        );
    }

    #[test]
    fn local_has_no_kubeconfig() {
        let ctx = ExecutionContext::local();
        assert!(!ctx.is_remote());
        assert_eq!(ctx.kubeconfig(), None);
    }

    #[test]
    fn display_is_terse() {
        assert_eq!(ExecutionContext::local().to_string(), "local");
        let ctx = ExecutionContext::remote(Path::new("out"), "rg", "eu");
        assert!(ctx.to_string().starts_with("remote ("));
    }
}
