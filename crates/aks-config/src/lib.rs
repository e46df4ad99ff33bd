//! # aks-config
//!
//! Deployment configuration for aksdeploy.
//!
//! One immutable [`DeploymentConfig`] is loaded from a JSON file at startup
//! and flows through the whole run; there is no process-wide mutable state.
//! Required keys cover the cloud subscription, the cluster shape, and the
//! applications to install; a few operational knobs (settle delay, engine
//! output directory, network-policy manifest) carry defaults.
//!
//! ```
//! use aks_config::DeploymentConfig;
//!
//! let config = DeploymentConfig::from_json(DeploymentConfig::example())
//!     .expect("example config is valid");
//! assert_eq!(config.rbac_role, "Contributor");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod error;

pub use error::{ConfigError, ConfigResult};

/// Default settle delay after service principal creation, in seconds.
const DEFAULT_SETTLE_SECONDS: u64 = 30;

/// The deploy engine writes cluster artifacts under this directory unless
/// told otherwise.
const DEFAULT_OUTPUT_DIR: &str = "_output";

/// Default network-policy manifest applied after the application charts.
const DEFAULT_NETWORK_POLICY: &str = "network-policy.yaml";

fn default_settle_seconds() -> u64 {
    DEFAULT_SETTLE_SECONDS
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_network_policy() -> String {
    DEFAULT_NETWORK_POLICY.to_string()
}

/// One application to install: a release name and the chart it comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartRef {
    /// Release name passed to the chart manager.
    pub name: String,
    /// Chart reference (local path or repo/chart).
    pub chart: String,
}

/// The deployment configuration, loaded once and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeploymentConfig {
    /// Azure subscription id the resources are billed to.
    pub subscription_id: String,
    /// Resource group to create and deploy into. Also used as the cluster's
    /// DNS prefix.
    pub resource_group: String,
    /// Azure region, e.g. `westeurope`.
    pub region: String,
    /// Number of cluster nodes. Must lie within `[1, max_nodes]`.
    pub node_count: u32,
    /// Upper bound on `node_count`.
    pub max_nodes: u32,
    /// RBAC role granted to the service principal, e.g. `Contributor`.
    pub rbac_role: String,
    /// Kubernetes namespace the ingress and applications are installed into.
    pub namespace: String,
    /// The engine's api-model file describing the cluster.
    pub cluster_model: String,
    /// Replica count for the ingress controller.
    pub ingress_replicas: u32,
    /// `"yes"` runs cluster-facing commands against the operator's local
    /// kube-context; any other value targets the deployed cluster.
    pub local_test: String,
    /// Application charts to install, in order.
    pub applications: Vec<ChartRef>,
    /// Seconds to wait after service principal creation before it is usable.
    #[serde(default = "default_settle_seconds")]
    pub settle_seconds: u64,
    /// Directory the deploy engine writes cluster artifacts under.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Network-policy manifest applied after the application charts.
    #[serde(default = "default_network_policy")]
    pub network_policy: String,
    /// Optional per-command deadline in seconds. Unset means a hung external
    /// command hangs the pipeline.
    #[serde(default)]
    pub command_timeout_seconds: Option<u64>,
}

impl DeploymentConfig {
    /// Load and validate a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails validation.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::read(path.as_ref(), e))?;
        Self::from_json(&content)
    }

    /// Parse and validate a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid (including a missing required
    /// key, which the parse detail names) or validation fails.
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| ConfigError::parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any field is empty or out of range.
    pub fn validate(&self) -> ConfigResult<()> {
        let required = [
            ("subscription_id", &self.subscription_id),
            ("resource_group", &self.resource_group),
            ("region", &self.region),
            ("rbac_role", &self.rbac_role),
            ("namespace", &self.namespace),
            ("cluster_model", &self.cluster_model),
            ("local_test", &self.local_test),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::missing_or_empty(field));
            }
        }

        if self.max_nodes < 1 {
            return Err(ConfigError::out_of_range(
                "max_nodes",
                1,
                u32::MAX,
                self.max_nodes,
            ));
        }

        if self.node_count < 1 || self.node_count > self.max_nodes {
            return Err(ConfigError::out_of_range(
                "node_count",
                1,
                self.max_nodes,
                self.node_count,
            ));
        }

        if self.ingress_replicas < 1 {
            return Err(ConfigError::out_of_range(
                "ingress_replicas",
                1,
                u32::MAX,
                self.ingress_replicas,
            ));
        }

        for (i, app) in self.applications.iter().enumerate() {
            if app.name.trim().is_empty() {
                return Err(ConfigError::missing_or_empty(format!(
                    "applications[{i}].name"
                )));
            }
            if app.chart.trim().is_empty() {
                return Err(ConfigError::missing_or_empty(format!(
                    "applications[{i}].chart"
                )));
            }
        }

        if self.network_policy.trim().is_empty() {
            return Err(ConfigError::missing_or_empty("network_policy"));
        }

        Ok(())
    }

    /// Whether cluster-facing commands should run against the operator's
    /// local kube-context.
    #[must_use]
    pub fn is_local_test(&self) -> bool {
        self.local_test == "yes"
    }

    /// The DNS prefix handed to the deploy engine. Derived from the resource
    /// group name.
    #[must_use]
    pub fn dns_prefix(&self) -> &str {
        &self.resource_group
    }

    /// The settle delay as a [`Duration`].
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_seconds)
    }

    /// The per-command deadline, if one is configured.
    #[must_use]
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_seconds.map(Duration::from_secs)
    }

    /// A literal example of the expected config shape, printed when loading
    /// fails so the operator can see every required key.
    #[must_use]
    pub fn example() -> &'static str {
        r#"{
  "subscription_id": "803fbfe1-411b-4055-aed5-a02de15bde2b",
  "resource_group": "cloud-shell-storage-westeurope",
  "region": "westeurope",
  "node_count": 3,
  "max_nodes": 100,
  "rbac_role": "Contributor",
  "namespace": "test1",
  "cluster_model": "kubernetes.json",
  "ingress_replicas": 2,
  "local_test": "no",
  "applications": [
    { "name": "frontend", "chart": "charts/frontend" },
    { "name": "backend", "chart": "charts/backend" }
  ]
}"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use test_case::test_case;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("failed to write temp file");
        file
    }

    fn valid_config() -> DeploymentConfig {
        DeploymentConfig::from_json(DeploymentConfig::example()).expect("example config is valid")
    }

    #[test]
    fn example_parses_and_validates() {
        let config = valid_config();
        assert_eq!(config.subscription_id, "803fbfe1-411b-4055-aed5-a02de15bde2b");
        assert_eq!(config.resource_group, "cloud-shell-storage-westeurope");
        assert_eq!(config.region, "westeurope");
        assert_eq!(config.node_count, 3);
        assert_eq!(config.max_nodes, 100);
        assert_eq!(config.rbac_role, "Contributor");
        assert_eq!(config.namespace, "test1");
        assert_eq!(config.cluster_model, "kubernetes.json");
        assert_eq!(config.ingress_replicas, 2);
        assert_eq!(config.local_test, "no");
        assert_eq!(config.applications.len(), 2);
    }

    #[test]
    fn defaults_are_applied_for_optional_keys() {
        let config = valid_config();
        assert_eq!(config.settle_seconds, 30);
        assert_eq!(config.output_dir, PathBuf::from("_output"));
        assert_eq!(config.network_policy, "network-policy.yaml");
        assert_eq!(config.command_timeout_seconds, None);
    }

    #[test]
    fn optional_keys_override_defaults() {
        let json = r#"{
            "subscription_id": "sub", "resource_group": "rg", "region": "eu",
            "node_count": 1, "max_nodes": 10, "rbac_role": "Contributor",
            "namespace": "ns", "cluster_model": "kubernetes.json",
            "ingress_replicas": 1, "local_test": "yes", "applications": [],
            "settle_seconds": 5, "output_dir": "artifacts",
            "network_policy": "policies/deny-all.yaml",
            "command_timeout_seconds": 600
        }"#;
        let config = DeploymentConfig::from_json(json).expect("should parse");
        assert_eq!(config.settle_seconds, 5);
        assert_eq!(config.output_dir, PathBuf::from("artifacts"));
        assert_eq!(config.network_policy, "policies/deny-all.yaml");
        assert_eq!(config.command_timeout(), Some(Duration::from_secs(600)));
    }

    #[test]
    fn loads_from_file() {
        let temp_file = create_temp_config(DeploymentConfig::example());
        let config = DeploymentConfig::from_file(temp_file.path()).expect("should load from file");
        assert_eq!(config.namespace, "test1");
    }

    #[test]
    fn file_not_found_is_a_read_error() {
        let result = DeploymentConfig::from_file("/nonexistent/deploy.json");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let result = DeploymentConfig::from_json("not json {{{");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn each_missing_required_key_names_the_key() {
        let required = [
            "subscription_id",
            "resource_group",
            "region",
            "node_count",
            "max_nodes",
            "rbac_role",
            "namespace",
            "cluster_model",
            "ingress_replicas",
            "local_test",
            "applications",
        ];
        for key in required {
            let mut value: serde_json::Value =
                serde_json::from_str(DeploymentConfig::example()).expect("example is JSON");
            value
                .as_object_mut()
                .expect("example is an object")
                .remove(key);
            let json = value.to_string();

            let err = DeploymentConfig::from_json(&json)
                .expect_err("missing key must fail validation");
            assert!(
                err.to_string().contains(key),
                "error for missing '{key}' should name it, got: {err}"
            );
        }
    }

    #[test]
    fn example_lists_every_required_key() {
        for key in [
            "subscription_id",
            "resource_group",
            "region",
            "node_count",
            "max_nodes",
            "rbac_role",
            "namespace",
            "cluster_model",
            "ingress_replicas",
            "local_test",
            "applications",
        ] {
            assert!(
                DeploymentConfig::example().contains(key),
                "example shape should show '{key}'"
            );
        }
    }

    #[test_case(0 => false ; "zero is below range")]
    #[test_case(1 => true ; "lower bound is inclusive")]
    #[test_case(3 => true ; "interior value")]
    #[test_case(100 => true ; "upper bound is inclusive")]
    #[test_case(101 => false ; "above the bound")]
    #[test_case(250 => false ; "far above the bound")]
    fn node_count_bounds(count: u32) -> bool {
        let mut config = valid_config();
        config.node_count = count;
        config.validate().is_ok()
    }

    #[test]
    fn node_count_error_reports_the_bounds() {
        let mut config = valid_config();
        config.node_count = 101;
        let err = config.validate().expect_err("out of range");
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                min: 1,
                max: 100,
                actual: 101,
                ..
            }
        ));
    }

    #[test]
    fn zero_max_nodes_rejected() {
        let mut config = valid_config();
        config.max_nodes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_ingress_replicas_rejected() {
        let mut config = valid_config();
        config.ingress_replicas = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_required_strings_rejected() {
        for field in [
            "subscription_id",
            "resource_group",
            "region",
            "rbac_role",
            "namespace",
            "cluster_model",
            "local_test",
        ] {
            let mut config = valid_config();
            match field {
                "subscription_id" => config.subscription_id.clear(),
                "resource_group" => config.resource_group.clear(),
                "region" => config.region.clear(),
                "rbac_role" => config.rbac_role.clear(),
                "namespace" => config.namespace.clear(),
                "cluster_model" => config.cluster_model.clear(),
                "local_test" => config.local_test.clear(),
                _ => unreachable!(),
            }
            let err = config.validate().expect_err("empty field must fail");
            assert!(
                err.to_string().contains(field),
                "error should name '{field}', got: {err}"
            );
        }
    }

    #[test]
    fn application_entries_must_be_complete() {
        let mut config = valid_config();
        config.applications.push(ChartRef {
            name: String::new(),
            chart: "charts/x".to_string(),
        });
        let err = config.validate().expect_err("empty app name must fail");
        assert!(err.to_string().contains("applications[2].name"));

        let mut config = valid_config();
        config.applications[0].chart.clear();
        let err = config.validate().expect_err("empty chart must fail");
        assert!(err.to_string().contains("applications[0].chart"));
    }

    #[test]
    fn application_order_is_preserved() {
        let config = valid_config();
        let names: Vec<&str> = config.applications.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["frontend", "backend"]);
    }

    #[test]
    fn empty_application_list_is_allowed() {
        let mut config = valid_config();
        config.applications.clear();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn local_test_flag_is_exact_match() {
        let mut config = valid_config();
        config.local_test = "yes".to_string();
        assert!(config.is_local_test());

        config.local_test = "no".to_string();
        assert!(!config.is_local_test());

        // Any other value means remote.
        config.local_test = "Yes".to_string();
        assert!(!config.is_local_test());
        config.local_test = "true".to_string();
        assert!(!config.is_local_test());
    }

    #[test]
    fn dns_prefix_is_the_resource_group() {
        let config = valid_config();
        assert_eq!(config.dns_prefix(), config.resource_group);
    }

    #[test]
    fn settle_delay_converts_seconds() {
        let mut config = valid_config();
        config.settle_seconds = 2;
        assert_eq!(config.settle_delay(), Duration::from_secs(2));
    }

    #[test]
    fn serialization_roundtrip() {
        let original = valid_config();
        let json = serde_json::to_string(&original).expect("should serialize");
        let parsed = DeploymentConfig::from_json(&json).expect("should parse back");
        assert_eq!(original, parsed);
    }
}
