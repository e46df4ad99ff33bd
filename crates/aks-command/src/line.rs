//! Structured command lines.
//!
//! A [`CommandLine`] is a program plus an argument vector plus optional
//! environment overrides. Values are never interpolated into a shell string;
//! each element is screened for control characters when it is added and the
//! collected errors surface when the line is run.

use std::fmt;

use crate::error::ArgumentError;

/// Characters that can never appear in a legitimate argv element.
const FORBIDDEN_CHARS: &[char] = &['\0', '\n', '\r'];

/// Screen a single command line element.
///
/// # Errors
///
/// Returns an error if the value contains a forbidden control character.
pub fn screen_argument(value: &str, field: &str) -> Result<(), ArgumentError> {
    for c in value.chars() {
        if FORBIDDEN_CHARS.contains(&c) {
            return Err(ArgumentError::control_character(field, c));
        }
    }
    Ok(())
}

/// A screened program invocation: program name, argument list, environment
/// overrides.
///
/// # Example
///
/// ```
/// use aks_command::CommandLine;
///
/// let line = CommandLine::new("az")
///     .arg("group")
///     .arg("create")
///     .arg("--name")
///     .arg("rg1");
/// assert!(!line.has_errors());
/// assert_eq!(line.to_string(), "az group create --name rg1");
/// ```
#[derive(Debug, Clone)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
    envs: Vec<(String, String)>,
    screening_errors: Vec<ArgumentError>,
}

impl CommandLine {
    /// Start a command line for the given program.
    #[must_use]
    pub fn new(program: &str) -> Self {
        let mut screening_errors = Vec::new();
        if program.is_empty() {
            screening_errors.push(ArgumentError::empty("program"));
        } else if let Err(e) = screen_argument(program, "program") {
            screening_errors.push(e);
        }
        Self {
            program: program.to_string(),
            args: Vec::new(),
            envs: Vec::new(),
            screening_errors,
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: &str) -> Self {
        match screen_argument(arg, "argument") {
            Ok(()) => self.args.push(arg.to_string()),
            Err(e) => self.screening_errors.push(e),
        }
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self = self.arg(arg.as_ref());
        }
        self
    }

    /// Set an environment variable on the spawned process.
    #[must_use]
    pub fn env(mut self, key: &str, value: &str) -> Self {
        if let Err(e) = screen_argument(key, "env_key") {
            self.screening_errors.push(e);
            return self;
        }
        if let Err(e) = screen_argument(value, "env_value") {
            self.screening_errors.push(e);
            return self;
        }
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    /// The program to spawn.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The argument vector.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// The environment overrides set on this line.
    #[must_use]
    pub fn env_vars(&self) -> &[(String, String)] {
        &self.envs
    }

    /// Check whether any element failed screening.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.screening_errors.is_empty()
    }

    /// The screening errors collected while building.
    #[must_use]
    pub fn errors(&self) -> &[ArgumentError] {
        &self.screening_errors
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArgumentErrorKind;

    mod screening {
        use super::*;

        #[test]
        fn ordinary_values_pass() {
            assert!(screen_argument("--name", "argument").is_ok());
            assert!(screen_argument("rg1-westeurope", "argument").is_ok());
            assert!(screen_argument("", "argument").is_ok());
            assert!(screen_argument("charts/frontend", "argument").is_ok());
            // Awkward but legal argv content: helm --set tokens with escaped
            // dots and brackets go through verbatim.
            assert!(
                screen_argument(
                    "controller.nodeSelector.beta\\.kubernetes\\.io/os=linux",
                    "argument"
                )
                .is_ok()
            );
            assert!(screen_argument("agentPoolProfiles[0].count=3", "argument").is_ok());
        }

        #[test]
        fn control_characters_are_rejected() {
            for bad in ["a\0b", "a\nb", "a\rb"] {
                let err = screen_argument(bad, "argument").unwrap_err();
                assert!(matches!(
                    err.kind,
                    ArgumentErrorKind::ControlCharacter { .. }
                ));
            }
        }
    }

    mod builder {
        use super::*;

        #[test]
        fn collects_program_and_arguments() {
            let line = CommandLine::new("az")
                .arg("group")
                .arg("create")
                .args(["--name", "rg1"]);

            assert!(!line.has_errors());
            assert_eq!(line.program(), "az");
            assert_eq!(line.arguments(), ["group", "create", "--name", "rg1"]);
        }

        #[test]
        fn empty_program_is_an_error() {
            let line = CommandLine::new("");
            assert!(line.has_errors());
            assert!(matches!(
                line.errors()[0].kind,
                ArgumentErrorKind::Empty
            ));
        }

        #[test]
        fn bad_argument_is_collected_not_dropped_silently() {
            let line = CommandLine::new("kubectl").arg("apply").arg("-f\nmalicious");
            assert!(line.has_errors());
            assert_eq!(line.errors().len(), 1);
            // The good argument survives.
            assert_eq!(line.arguments(), ["apply"]);
        }

        #[test]
        fn env_values_are_screened() {
            let line = CommandLine::new("helm").env("KUBECONFIG", "a\0b");
            assert!(line.has_errors());
            assert!(line.env_vars().is_empty());
        }

        #[test]
        fn display_joins_program_and_args() {
            let line = CommandLine::new("helm")
                .arg("repo")
                .arg("add")
                .arg("ingress-nginx")
                .arg("https://kubernetes.github.io/ingress-nginx");
            assert_eq!(
                line.to_string(),
                "helm repo add ingress-nginx https://kubernetes.github.io/ingress-nginx"
            );
        }
    }
}
