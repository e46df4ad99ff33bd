//! # aks-preflight
//!
//! Client environment validation for aksdeploy.
//!
//! Before any cloud call the pipeline checks the operator host: the operating
//! system must be Linux and the client tools (`helm` 3, `aks-engine`, `az`)
//! must be on the `PATH`. A missing tool is offered for installation through
//! a yes/no prompt; declining prints the prerequisites list and aborts the
//! run.
//!
//! ## Modules
//!
//! - [`tools`]: the tool roster, probe commands, install recipes
//! - [`validator`]: OS gate, probing, interactive remediation
//! - [`prompt`]: the operator prompt seam
//! - [`installer`]: the installation seam and script-based installer
//! - [`error`]: error types

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod installer;
pub mod prompt;
pub mod tools;
pub mod validator;

pub use error::{PreflightError, PreflightResult};
pub use installer::{RecordingInstaller, ScriptInstaller, ToolInstaller};
pub use prompt::{PromptAsk, ScriptedPrompt, StdinPrompt};
pub use tools::{ClientTool, ToolStatus};
pub use validator::{EnvironmentValidator, PREREQUISITES};
