//! Command runners: the trait the pipeline drives, the tokio-backed
//! production runner, and an in-memory scripted runner for tests.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command as TokioCommand;
use tokio::sync::RwLock;
use tracing::debug;

use crate::context::{ExecutionContext, KUBECONFIG_ENV};
use crate::error::{CommandError, CommandResult};
use crate::line::CommandLine;

/// Output captured from one finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Captured standard output.
    pub stdout: Vec<u8>,
    /// Captured standard error.
    pub stderr: Vec<u8>,
    /// Exit status code (0 for success).
    pub exit_code: i32,
}

impl CommandOutput {
    /// A successful output with the given stdout.
    #[must_use]
    pub fn ok(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: Vec::new(),
            exit_code: 0,
        }
    }

    /// A failed output with the given exit code and stderr.
    #[must_use]
    pub fn failed(exit_code: i32, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: Vec::new(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    /// Stdout as a UTF-8 string, replacing invalid sequences.
    #[must_use]
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Stderr as a UTF-8 string, replacing invalid sequences.
    #[must_use]
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Check whether the command exited with code 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes command lines under an execution context.
///
/// A non-zero exit is reported inside the returned [`CommandOutput`], not as
/// an error; callers own the failure policy. `Err` means the command never
/// produced an exit status: it was rejected by screening, failed to spawn,
/// or overran a configured deadline.
#[allow(async_fn_in_trait)]
pub trait CommandRunner: Send + Sync {
    /// Run one command to completion and capture its output.
    async fn run(
        &self,
        line: &CommandLine,
        context: &ExecutionContext,
    ) -> CommandResult<CommandOutput>;
}

/// Production runner backed by `tokio::process`.
///
/// Commands run strictly one at a time from the caller's point of view; the
/// runner holds no queue and no state beyond the optional deadline.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// Create a runner with no deadline: a hung command hangs the caller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a per-command deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        line: &CommandLine,
        context: &ExecutionContext,
    ) -> CommandResult<CommandOutput> {
        if let Some(err) = line.errors().first() {
            return Err(CommandError::Rejected(err.clone()));
        }

        let mut cmd = TokioCommand::new(line.program());
        cmd.args(line.arguments());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        // Dropping the in-flight future at the deadline must also kill the
        // child; a timed-out command may not keep running behind the run.
        cmd.kill_on_drop(true);

        for (key, value) in line.env_vars() {
            cmd.env(key, value);
        }
        if let Some(path) = context.kubeconfig() {
            cmd.env(KUBECONFIG_ENV, path);
        }

        debug!(command = %line, context = %context, "spawning");

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| CommandError::timed_out(line.program(), limit.as_secs()))?
                .map_err(|e| CommandError::spawn(line.program(), e))?,
            None => cmd
                .output()
                .await
                .map_err(|e| CommandError::spawn(line.program(), e))?,
        };

        let exit_code = output.status.code().unwrap_or(-1);
        debug!(command = %line, exit_code, "finished");

        Ok(CommandOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code,
        })
    }
}

/// One invocation captured by a [`ScriptedRunner`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The program that would have been spawned.
    pub program: String,
    /// Its argument vector.
    pub args: Vec<String>,
    /// Program and arguments joined with spaces.
    pub rendered: String,
    /// The context the call was tagged with.
    pub context: ExecutionContext,
    /// The environment the spawned process would have seen, including the
    /// kube-context injection for remote calls.
    pub env: Vec<(String, String)>,
}

enum ScriptedResponse {
    Output(CommandOutput),
    SpawnFailure,
}

struct ScriptedRule {
    prefix: String,
    response: ScriptedResponse,
}

/// In-memory runner for tests: records every call and replays scripted
/// outputs matched by command line prefix. Unmatched commands succeed with
/// empty output.
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    calls: Arc<RwLock<Vec<RecordedCall>>>,
    rules: Arc<RwLock<Vec<ScriptedRule>>>,
}

impl ScriptedRunner {
    /// Create a runner where every command succeeds with empty output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script an output for commands whose rendered line starts with
    /// `prefix`. Earlier rules win.
    pub async fn respond(&self, prefix: &str, output: CommandOutput) {
        self.rules.write().await.push(ScriptedRule {
            prefix: prefix.to_string(),
            response: ScriptedResponse::Output(output),
        });
    }

    /// Script a spawn failure for commands whose rendered line starts with
    /// `prefix`.
    pub async fn refuse(&self, prefix: &str) {
        self.rules.write().await.push(ScriptedRule {
            prefix: prefix.to_string(),
            response: ScriptedResponse::SpawnFailure,
        });
    }

    /// Every call recorded so far, in issue order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    /// Total number of recorded calls.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Number of recorded calls whose rendered line starts with `prefix`.
    pub async fn calls_matching(&self, prefix: &str) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| c.rendered.starts_with(prefix))
            .count()
    }
}

impl std::fmt::Debug for ScriptedRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedRunner").finish_non_exhaustive()
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        line: &CommandLine,
        context: &ExecutionContext,
    ) -> CommandResult<CommandOutput> {
        if let Some(err) = line.errors().first() {
            return Err(CommandError::Rejected(err.clone()));
        }

        let mut env: Vec<(String, String)> = line.env_vars().to_vec();
        if let Some(path) = context.kubeconfig() {
            env.push((
                KUBECONFIG_ENV.to_string(),
                path.to_string_lossy().into_owned(),
            ));
        }

        let rendered = line.to_string();
        self.calls.write().await.push(RecordedCall {
            program: line.program().to_string(),
            args: line.arguments().to_vec(),
            rendered: rendered.clone(),
            context: context.clone(),
            env,
        });

        let rules = self.rules.read().await;
        for rule in rules.iter() {
            if rendered.starts_with(&rule.prefix) {
                return match &rule.response {
                    ScriptedResponse::Output(output) => Ok(output.clone()),
                    ScriptedResponse::SpawnFailure => Err(CommandError::spawn(
                        line.program(),
                        std::io::Error::new(std::io::ErrorKind::NotFound, "scripted spawn failure"),
                    )),
                };
            }
        }

        Ok(CommandOutput::ok(Vec::new()))
    }
}
