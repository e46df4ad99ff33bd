//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use serde::Serialize;

use aks_pipeline::{DeployReport, StageOutcome};
use aks_preflight::ToolStatus;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// Result of the environment check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Whether the host OS can run the pipeline.
    pub os_supported: bool,
    /// Presence of each required client tool, in check order.
    pub tools: Vec<ToolStatus>,
    /// The subscription id the check looked for.
    pub subscription_id: String,
    /// Whether the subscription shows up in the account listing. `None`
    /// when the cloud CLI is missing and the listing could not run.
    pub subscription_listed: Option<bool>,
}

impl CheckReport {
    /// Check whether everything the pipeline needs is in place.
    #[must_use]
    pub fn all_good(&self) -> bool {
        self.os_supported
            && self.tools.iter().all(|t| t.present)
            && self.subscription_listed == Some(true)
    }
}

impl TableDisplay for CheckReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Environment Check")?;
        writeln!(writer, "═════════════════")?;
        writeln!(
            writer,
            "Operating system:   {}",
            if self.os_supported {
                "supported"
            } else {
                "unsupported (Linux required)"
            }
        )?;
        writeln!(writer)?;
        writeln!(writer, "Tools")?;
        for status in &self.tools {
            let presence = if status.present { "present" } else { "MISSING" };
            match &status.detail {
                Some(detail) => writeln!(
                    writer,
                    "  {:<18} {presence} ({detail})",
                    status.tool.display_name()
                )?,
                None => writeln!(writer, "  {:<18} {presence}", status.tool.display_name())?,
            }
        }
        writeln!(writer)?;
        writeln!(writer, "Subscription")?;
        let listing = match self.subscription_listed {
            Some(true) => "listed",
            Some(false) => "NOT LISTED",
            None => "skipped (cloud CLI missing)",
        };
        writeln!(writer, "  {:<18} {listing}", self.subscription_id)?;
        Ok(())
    }
}

impl TableDisplay for DeployReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Deployment Complete")?;
        writeln!(writer, "═══════════════════")?;
        writeln!(writer, "Run:                {}", self.run_id)?;
        writeln!(
            writer,
            "Resource group:     {} ({})",
            self.resource_group, self.region
        )?;
        writeln!(writer, "Namespace:          {}", self.namespace)?;
        writeln!(writer, "Context:            {}", self.context)?;
        writeln!(writer)?;
        writeln!(writer, "Stages")?;
        for stage in &self.stages {
            let outcome = match stage.outcome {
                StageOutcome::Succeeded => "ok".to_string(),
                StageOutcome::ContinuedAfterFailure { exit_code } => {
                    format!("continued (exit {exit_code})")
                }
            };
            // The stage Display ignores width, so pad the rendered name.
            let name = stage.stage.to_string();
            writeln!(writer, "  {name:<18} {outcome}")?;
        }
        if self.warning_count() > 0 {
            writeln!(writer)?;
            writeln!(
                writer,
                "{} stage(s) reported failures; check the logs.",
                self.warning_count()
            )?;
        }
        Ok(())
    }
}
