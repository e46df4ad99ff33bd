//! # aks-command
//!
//! Structured external command execution for aksdeploy.
//!
//! Every external tool the deployment pipeline touches (`az`, `aks-engine`,
//! `kubectl`, `helm`) is invoked through this crate: a screened
//! [`CommandLine`] (program + argument vector, never a shell string) run by a
//! [`CommandRunner`] under an [`ExecutionContext`] that decides whether the
//! spawned process sees a remote per-cluster `KUBECONFIG`.
//!
//! ## Example
//!
//! ```rust,no_run
//! # async fn example() -> aks_command::CommandResult<()> {
//! use aks_command::{CommandLine, CommandRunner, ExecutionContext, ProcessRunner};
//!
//! let runner = ProcessRunner::new();
//! let line = CommandLine::new("az")
//!     .args(["group", "create", "--name", "rg1", "--location", "westeurope"]);
//! let output = runner.run(&line, &ExecutionContext::local()).await?;
//! println!("exit: {}", output.exit_code);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`line`]: screened command lines
//! - [`context`]: local vs. remote kube-context selection
//! - [`runner`]: the runner trait, production runner, scripted test runner
//! - [`error`]: error types

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod line;
pub mod runner;

pub use context::{ExecutionContext, KUBECONFIG_ENV, kubeconfig_path};
pub use error::{ArgumentError, ArgumentErrorKind, CommandError, CommandResult};
pub use line::{CommandLine, screen_argument};
pub use runner::{CommandOutput, CommandRunner, ProcessRunner, RecordedCall, ScriptedRunner};
