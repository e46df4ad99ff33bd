//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// aksdeploy - AKS cluster deployment from one configuration file.
#[derive(Parser, Debug, Clone)]
#[command(name = "aksdeploy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Format {
    /// Human-readable output.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Check the operator environment without deploying anything.
    ///
    /// Probes the host OS, the client tools, and whether the configured
    /// subscription is visible to the cloud CLI. Nothing is installed and
    /// no cloud resource is touched.
    Check(ConfigArgs),

    /// Validate the environment and run the full deployment pipeline.
    Deploy(ConfigArgs),
}

/// Arguments shared by subcommands that read the deployment configuration.
#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    /// Path to the deployment configuration file.
    #[arg(short, long, env = "AKSDEPLOY_CONFIG", default_value = "deploy.json")]
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_deploy_with_config_path() {
        let cli = Cli::parse_from(["aksdeploy", "deploy", "--config", "prod.json"]);
        match cli.command {
            Commands::Deploy(args) => assert_eq!(args.config, PathBuf::from("prod.json")),
            Commands::Check(_) => panic!("expected deploy command"),
        }
    }

    #[test]
    fn cli_parses_check_with_default_config() {
        let cli = Cli::parse_from(["aksdeploy", "check"]);
        match cli.command {
            Commands::Check(args) => assert_eq!(args.config, PathBuf::from("deploy.json")),
            Commands::Deploy(_) => panic!("expected check command"),
        }
    }

    #[test]
    fn cli_respects_format_flag() {
        let cli = Cli::parse_from(["aksdeploy", "--format", "json", "check"]);
        assert_eq!(cli.format, Format::Json);
    }

    #[test]
    fn format_defaults_to_table() {
        let cli = Cli::parse_from(["aksdeploy", "deploy"]);
        assert_eq!(cli.format, Format::Table);
    }
}
