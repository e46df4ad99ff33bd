//! Preflight error types.

use thiserror::Error;

use aks_command::CommandError;

use crate::tools::ClientTool;

/// Errors that stop environment validation.
#[derive(Debug, Error)]
pub enum PreflightError {
    /// The host operating system is not supported.
    #[error("unsupported operating system '{os}': a Linux host is required")]
    UnsupportedOs {
        /// The detected operating system.
        os: String,
    },

    /// The operator declined to install a missing tool.
    #[error("{tool} is missing and its installation was declined")]
    Declined {
        /// The missing tool.
        tool: ClientTool,
    },

    /// An installation step could not be run at all.
    #[error("installation of {tool} failed: {source}")]
    Install {
        /// The tool being installed.
        tool: ClientTool,
        /// The underlying command error.
        #[source]
        source: CommandError,
    },
}

impl PreflightError {
    /// Create an unsupported-OS error.
    #[must_use]
    pub fn unsupported_os(os: impl Into<String>) -> Self {
        Self::UnsupportedOs { os: os.into() }
    }

    /// Create a declined-install error.
    #[must_use]
    pub fn declined(tool: ClientTool) -> Self {
        Self::Declined { tool }
    }

    /// Create an installation error.
    #[must_use]
    pub fn install(tool: ClientTool, source: CommandError) -> Self {
        Self::Install { tool, source }
    }
}

/// Result alias for preflight operations.
pub type PreflightResult<T> = Result<T, PreflightError>;
