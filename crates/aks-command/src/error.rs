//! Error types for command construction and execution.

use std::fmt;
use thiserror::Error;

/// The reason an argument or program name was rejected during screening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentErrorKind {
    /// The value was empty where one is required.
    Empty,
    /// The value contained a control character that cannot appear in a
    /// legitimate argv element.
    ControlCharacter {
        /// The offending character.
        found: char,
    },
}

impl fmt::Display for ArgumentErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "value cannot be empty"),
            Self::ControlCharacter { found } => {
                write!(f, "control character {found:?} not allowed")
            }
        }
    }
}

/// Error returned when a command line element fails screening.
#[derive(Debug, Clone, Error)]
#[error("screening failed for '{field}': {kind}")]
pub struct ArgumentError {
    /// The name of the element that failed (program, argument, env key, ...).
    pub field: String,
    /// Why it was rejected.
    pub kind: ArgumentErrorKind,
}

impl ArgumentError {
    /// Create a new screening error.
    #[must_use]
    pub fn new(field: impl Into<String>, kind: ArgumentErrorKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }

    /// Create an "empty value" screening error.
    #[must_use]
    pub fn empty(field: impl Into<String>) -> Self {
        Self::new(field, ArgumentErrorKind::Empty)
    }

    /// Create a "control character" screening error.
    #[must_use]
    pub fn control_character(field: impl Into<String>, found: char) -> Self {
        Self::new(field, ArgumentErrorKind::ControlCharacter { found })
    }
}

/// Errors that can occur while running an external command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command line failed argument screening and was never spawned.
    #[error("command rejected: {0}")]
    Rejected(#[from] ArgumentError),

    /// The program could not be spawned at all.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        /// The program that failed to start.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The command ran past the configured deadline.
    #[error("'{program}' did not finish within {seconds}s")]
    TimedOut {
        /// The program that overran.
        program: String,
        /// The configured limit in seconds.
        seconds: u64,
    },
}

impl CommandError {
    /// Create a spawn failure error.
    #[must_use]
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Create a timeout error.
    #[must_use]
    pub fn timed_out(program: impl Into<String>, seconds: u64) -> Self {
        Self::TimedOut {
            program: program.into(),
            seconds,
        }
    }

    /// Check whether this error came from argument screening.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Result alias for command operations.
pub type CommandResult<T> = Result<T, CommandError>;
