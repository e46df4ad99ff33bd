//! Error types for the deployment pipeline.

use thiserror::Error;

use aks_command::{CommandError, CommandOutput};

use crate::types::PipelineStage;

/// Errors produced while extracting service principal credentials from the
/// role-assignment output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// The output did not tokenize into enough quoted fields to reach the
    /// credential positions.
    #[error("role-assignment output has too few quoted tokens: needed {needed}, found {found}")]
    TooFewTokens {
        /// Token count required to read both credentials.
        needed: usize,
        /// Token count actually present.
        found: usize,
    },

    /// A credential field was found at its expected position but is empty.
    #[error("role-assignment output carries an empty {field}")]
    EmptyField {
        /// Which credential was empty.
        field: &'static str,
    },

    /// The payload could not be interpreted at all.
    #[error("role-assignment output is malformed: {detail}")]
    Malformed {
        /// What was wrong with it.
        detail: String,
    },
}

impl CredentialError {
    /// Create a "too few tokens" error.
    #[must_use]
    pub fn too_few_tokens(needed: usize, found: usize) -> Self {
        Self::TooFewTokens { needed, found }
    }

    /// Create an "empty field" error.
    #[must_use]
    pub fn empty_field(field: &'static str) -> Self {
        Self::EmptyField { field }
    }

    /// Create a "malformed payload" error.
    #[must_use]
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::Malformed {
            detail: detail.into(),
        }
    }
}

/// Errors that abort a deployment run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The service principal credentials could not be extracted, so the
    /// cluster deploy would be handed empty secrets.
    #[error("cannot extract service principal credentials: {0}")]
    Credentials(#[from] CredentialError),

    /// A fatal stage command exited non-zero.
    #[error("stage {stage} failed (exit code {exit_code}): {stderr}")]
    Stage {
        /// The stage that could not be completed.
        stage: PipelineStage,
        /// Exit code of the failing command.
        exit_code: i32,
        /// Captured stderr, trimmed.
        stderr: String,
    },

    /// A command could not be run at all.
    #[error(transparent)]
    Command(#[from] CommandError),
}

impl PipelineError {
    /// Build a stage failure from the failing command's output.
    #[must_use]
    pub fn stage(stage: PipelineStage, output: &CommandOutput) -> Self {
        Self::Stage {
            stage,
            exit_code: output.exit_code,
            stderr: output.stderr_lossy().trim().to_owned(),
        }
    }

    /// Check whether this failure came out of credential extraction.
    #[must_use]
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, Self::Credentials(_))
    }
}

/// Result alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_tokens_display_names_both_counts() {
        let err = CredentialError::too_few_tokens(16, 4);
        assert_eq!(
            err.to_string(),
            "role-assignment output has too few quoted tokens: needed 16, found 4"
        );
    }

    #[test]
    fn stage_error_carries_trimmed_stderr() {
        let output = CommandOutput::failed(1, b"  quota exceeded\n".to_vec());
        let err = PipelineError::stage(PipelineStage::GroupCreated, &output);
        match err {
            PipelineError::Stage {
                stage,
                exit_code,
                stderr,
            } => {
                assert_eq!(stage, PipelineStage::GroupCreated);
                assert_eq!(exit_code, 1);
                assert_eq!(stderr, "quota exceeded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn credential_failures_are_detectable() {
        let err = PipelineError::from(CredentialError::empty_field("secret"));
        assert!(err.is_credential_failure());
        assert!(err.to_string().contains("empty secret"));

        let output = CommandOutput::failed(2, Vec::new());
        assert!(!PipelineError::stage(PipelineStage::RoleCreated, &output).is_credential_failure());
    }
}
