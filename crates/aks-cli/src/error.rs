//! CLI error types and exit-code mapping.
//!
//! Every failure path maps to a distinct documented exit status so callers
//! can script against the tool: 2 configuration, 3 environment, 4
//! credential extraction, 5 stage failure, 1 anything else.

use std::fmt;

use aks_config::ConfigError;
use aks_pipeline::PipelineError;
use aks_preflight::PreflightError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// The configuration file is missing, unreadable, or invalid.
    Config(String),
    /// The operator environment cannot run the pipeline.
    Environment(String),
    /// Service principal credentials could not be extracted.
    Credential(String),
    /// A fatal pipeline stage failed.
    Stage(String),
    /// An external command could not be run at all.
    Command(String),
    /// Output formatting error.
    Format(String),
    /// IO error.
    Io(std::io::Error),
}

impl CliError {
    /// The process exit code this error maps to.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Environment(_) => 3,
            Self::Credential(_) => 4,
            Self::Stage(_) => 5,
            Self::Command(_) | Self::Format(_) | Self::Io(_) => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Environment(msg) => write!(f, "environment error: {msg}"),
            Self::Credential(msg) => write!(f, "credential error: {msg}"),
            Self::Stage(msg) => write!(f, "deployment failed: {msg}"),
            Self::Command(msg) => write!(f, "command error: {msg}"),
            Self::Format(msg) => write!(f, "format error: {msg}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<PreflightError> for CliError {
    fn from(err: PreflightError) -> Self {
        Self::Environment(err.to_string())
    }
}

impl From<PipelineError> for CliError {
    fn from(err: PipelineError) -> Self {
        match &err {
            PipelineError::Credentials(_) => Self::Credential(err.to_string()),
            PipelineError::Stage { .. } => Self::Stage(err.to_string()),
            PipelineError::Command(_) => Self::Command(err.to_string()),
        }
    }
}
