//! Step execution helpers shared by the orchestrator and the stage
//! installers.

use tracing::{debug, warn};

use aks_command::{CommandLine, CommandOutput, CommandRunner, ExecutionContext};

use crate::error::{PipelineError, PipelineResult};
use crate::types::{FailurePolicy, PipelineStage, StageOutcome};

/// Run one stage's commands under the stage's own failure policy.
///
/// Fatal stages stop at the first non-zero exit; lenient stages run every
/// command and carry the first failing exit code in the outcome.
pub(crate) async fn run_stage<R: CommandRunner>(
    runner: &R,
    stage: PipelineStage,
    commands: &[CommandLine],
    context: &ExecutionContext,
) -> PipelineResult<StageOutcome> {
    match stage.failure_policy() {
        FailurePolicy::Fatal => {
            for command in commands {
                run_fatal(runner, stage, command, context).await?;
            }
            Ok(StageOutcome::Succeeded)
        }
        FailurePolicy::Continue => run_lenient(runner, stage, commands, context).await,
    }
}

/// Run one command the stage cannot survive failing.
///
/// A non-zero exit becomes a [`PipelineError::Stage`]; the successful
/// output is handed back for the stage that reads it. Stages with nothing
/// to read go through [`run_stage`] instead.
pub(crate) async fn run_fatal<R: CommandRunner>(
    runner: &R,
    stage: PipelineStage,
    command: &CommandLine,
    context: &ExecutionContext,
) -> PipelineResult<CommandOutput> {
    debug!(stage = %stage, command = %command, "running");
    let output = runner.run(command, context).await?;
    if output.success() {
        Ok(output)
    } else {
        Err(PipelineError::stage(stage, &output))
    }
}

/// Run a stage's commands in order, surviving non-zero exits.
///
/// Every command runs even when an earlier one failed; the first failing
/// exit code is carried in the outcome. A command that cannot be run at
/// all (screening, spawn, timeout) still aborts the run, since no tool
/// verdict exists to shrug off.
async fn run_lenient<R: CommandRunner>(
    runner: &R,
    stage: PipelineStage,
    commands: &[CommandLine],
    context: &ExecutionContext,
) -> PipelineResult<StageOutcome> {
    let mut first_failure = None;
    for command in commands {
        debug!(stage = %stage, command = %command, "running");
        let output = runner.run(command, context).await?;
        if !output.success() {
            warn!(
                stage = %stage,
                command = %command,
                exit_code = output.exit_code,
                stderr = %output.stderr_lossy().trim(),
                "command failed, stage continues"
            );
            first_failure.get_or_insert(output.exit_code);
        }
    }
    Ok(match first_failure {
        None => StageOutcome::Succeeded,
        Some(exit_code) => StageOutcome::ContinuedAfterFailure { exit_code },
    })
}
