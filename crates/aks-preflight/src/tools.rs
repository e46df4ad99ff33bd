//! The client tools a deployment host must carry, and how each is probed.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use aks_command::{CommandLine, CommandOutput};

/// Matches the major version in `helm version` output, which renders the
/// version as `Version:"v3.9.0"` inside a Go struct literal.
static HELM_VERSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"Version:"v(\d+)"#).unwrap_or_else(|_| unreachable!()));

/// Extract the helm major version from `helm version` output, if present.
#[must_use]
pub fn helm_major_version(output: &str) -> Option<u32> {
    HELM_VERSION_REGEX
        .captures(output)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// A client tool the deployment pipeline shells out to.
///
/// The variant order is the probe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClientTool {
    /// Helm, which must be major version 3.
    Helm3,
    /// The AKS cluster deploy engine.
    AksEngine,
    /// The Azure CLI.
    AzureCli,
}

impl ClientTool {
    /// The tools in the order they are checked.
    pub const CHECK_ORDER: [Self; 3] = [Self::Helm3, Self::AksEngine, Self::AzureCli];

    /// Human-readable name used in prompts and errors.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Helm3 => "Helm3",
            Self::AksEngine => "Azure AKS-Engine",
            Self::AzureCli => "Azure CLI",
        }
    }

    /// The executable probed for on the host.
    #[must_use]
    pub fn binary(&self) -> &'static str {
        match self {
            Self::Helm3 => "helm",
            Self::AksEngine => "aks-engine",
            Self::AzureCli => "az",
        }
    }

    /// The probe command that decides presence.
    #[must_use]
    pub fn probe_command(&self) -> CommandLine {
        match self {
            // Presence alone is not enough for helm, the major version must
            // be 3, so the probe asks for the version string.
            Self::Helm3 => CommandLine::new("helm").arg("version"),
            Self::AksEngine | Self::AzureCli => CommandLine::new("which").arg(self.binary()),
        }
    }

    /// Decide presence from the probe output.
    #[must_use]
    pub fn is_present(&self, output: &CommandOutput) -> bool {
        match self {
            Self::Helm3 => helm_major_version(&output.stdout_lossy()) == Some(3),
            Self::AksEngine | Self::AzureCli => output.stdout_lossy().contains(self.binary()),
        }
    }

    /// The yes/no question asked when the tool is missing.
    #[must_use]
    pub fn prompt_question(&self) -> String {
        format!("Do you want to install {} now?", self.display_name())
    }

    /// The commands that install this tool.
    ///
    /// The one-line installers are vendor scripts piped into a privileged
    /// shell; they contain no interpolated values. The engine install is
    /// three plain argv steps.
    #[must_use]
    pub fn install_steps(&self) -> Vec<CommandLine> {
        match self {
            Self::Helm3 => vec![CommandLine::new("bash").arg("-c").arg(
                "curl -L https://raw.githubusercontent.com/helm/helm/master/scripts/get-helm-3 | sudo bash",
            )],
            Self::AksEngine => vec![
                CommandLine::new("curl").args([
                    "-o",
                    "get-akse.sh",
                    "https://raw.githubusercontent.com/Azure/aks-engine/master/scripts/get-akse.sh",
                ]),
                CommandLine::new("chmod").args(["700", "get-akse.sh"]),
                CommandLine::new("./get-akse.sh"),
            ],
            Self::AzureCli => vec![CommandLine::new("bash")
                .arg("-c")
                .arg("curl -sL https://aka.ms/InstallAzureCLIDeb | sudo bash")],
        }
    }
}

impl fmt::Display for ClientTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Presence of one client tool, as reported by `aksdeploy check`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolStatus {
    /// The probed tool.
    pub tool: ClientTool,
    /// Whether the probe found it.
    pub present: bool,
    /// First line of the probe output, when there was any.
    pub detail: Option<String>,
}

impl ToolStatus {
    /// Build a status from a probe output.
    #[must_use]
    pub fn from_output(tool: ClientTool, output: &CommandOutput) -> Self {
        let detail = output
            .stdout_lossy()
            .lines()
            .next()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        Self {
            tool,
            present: tool.is_present(output),
            detail,
        }
    }

    /// A status for a tool whose probe could not run.
    #[must_use]
    pub fn absent(tool: ClientTool) -> Self {
        Self {
            tool,
            present: false,
            detail: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(r#"version.BuildInfo{Version:"v3.9.0", GitCommit:"7ceeb"}"# => Some(3))]
    #[test_case(r#"version.BuildInfo{Version:"v2.17.0"}"# => Some(2))]
    #[test_case("Client: v3.9.0" => None ; "missing the struct field shape")]
    #[test_case("" => None ; "empty output")]
    fn helm_version_extraction(output: &str) -> Option<u32> {
        helm_major_version(output)
    }

    #[test]
    fn helm3_presence_requires_major_three() {
        let v3 = CommandOutput::ok(br#"version.BuildInfo{Version:"v3.9.0"}"#.to_vec());
        assert!(ClientTool::Helm3.is_present(&v3));

        let v2 = CommandOutput::ok(br#"version.BuildInfo{Version:"v2.17.0"}"#.to_vec());
        assert!(!ClientTool::Helm3.is_present(&v2));
    }

    #[test]
    fn which_probe_reads_the_resolved_path() {
        let found = CommandOutput::ok(b"/usr/bin/az\n".to_vec());
        assert!(ClientTool::AzureCli.is_present(&found));

        let missing = CommandOutput::failed(1, Vec::new());
        assert!(!ClientTool::AzureCli.is_present(&missing));
    }

    #[test]
    fn probe_commands_are_structured() {
        let probe = ClientTool::AksEngine.probe_command();
        assert_eq!(probe.to_string(), "which aks-engine");

        let probe = ClientTool::Helm3.probe_command();
        assert_eq!(probe.to_string(), "helm version");
    }

    #[test]
    fn check_order_probes_helm_first() {
        assert_eq!(
            ClientTool::CHECK_ORDER,
            [
                ClientTool::Helm3,
                ClientTool::AksEngine,
                ClientTool::AzureCli
            ]
        );
    }

    #[test]
    fn install_steps_have_no_screening_errors() {
        for tool in ClientTool::CHECK_ORDER {
            for step in tool.install_steps() {
                assert!(!step.has_errors(), "{tool} install step failed screening");
            }
        }
    }

    #[test]
    fn engine_install_is_three_steps() {
        let steps = ClientTool::AksEngine.install_steps();
        assert_eq!(steps.len(), 3);
        assert!(steps[0].to_string().starts_with("curl -o get-akse.sh"));
        assert_eq!(steps[1].to_string(), "chmod 700 get-akse.sh");
        assert_eq!(steps[2].to_string(), "./get-akse.sh");
    }

    #[test]
    fn status_from_output_keeps_the_first_line() {
        let output = CommandOutput::ok(b"/usr/local/bin/helm\nextra\n".to_vec());
        let status = ToolStatus::from_output(ClientTool::AksEngine, &output);
        assert_eq!(status.detail.as_deref(), Some("/usr/local/bin/helm"));
    }
}
