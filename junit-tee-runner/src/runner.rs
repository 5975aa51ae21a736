// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runs a test command with its output captured.

use crate::{
    capture::{Clock, OutputCapture, SystemClock},
    errors::RunError,
};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, FixedOffset, Utc};
use indexmap::IndexMap;
use std::{
    io::Write,
    process::{Command, ExitStatus, Stdio},
    time::{Duration, Instant},
};
use tracing::{debug, info};

/// A test command to run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<Utf8PathBuf>,
    env: IndexMap<String, String>,
}

impl TestCommand {
    /// Creates a new command for the given program and arguments.
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            current_dir: None,
            env: IndexMap::new(),
        }
    }

    /// Creates a command from a full argument vector, where the first element is the program.
    ///
    /// Returns `None` if `argv` is empty.
    pub fn from_argv(argv: impl IntoIterator<Item = impl Into<String>>) -> Option<Self> {
        let mut argv = argv.into_iter().map(Into::into);
        let program: String = argv.next()?;
        Some(Self::new(program, argv))
    }

    /// Sets the working directory for the command.
    pub fn current_dir(&mut self, dir: impl Into<Utf8PathBuf>) -> &mut Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Sets an environment variable for the command.
    pub fn env(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Returns the program.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the working directory, if set.
    pub fn get_current_dir(&self) -> Option<&Utf8Path> {
        self.current_dir.as_deref()
    }

    /// Returns the program followed by its arguments.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Returns the command line, escaped for display.
    pub fn to_escaped_string(&self) -> String {
        shell_words::join(self.argv())
    }

    fn to_std_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).envs(&self.env);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

/// The outcome of a test command that ran to completion.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    /// The exit status of the command.
    pub status: ExitStatus,

    /// The process exit code derived from `status`; see [`exit_code_for_status`].
    pub exit_code: i32,

    /// The combined, formatted output of the command.
    pub output: String,

    /// The time at which the command was started.
    pub started_at: DateTime<FixedOffset>,

    /// The time the command took to run, including draining its output.
    pub elapsed: Duration,
}

impl RunOutcome {
    /// Returns true if the command exited successfully.
    pub fn is_success(&self) -> bool {
        self.status.success()
    }
}

/// Runs a [`TestCommand`] with its stdout and stderr captured.
#[derive(Debug)]
pub struct TestRunner<C = SystemClock> {
    command: TestCommand,
    capture: OutputCapture<C>,
}

impl<C: Clock> TestRunner<C> {
    /// Creates a new runner.
    pub fn new(command: TestCommand, capture: OutputCapture<C>) -> Self {
        Self { command, capture }
    }

    /// Returns the command this runner executes.
    pub fn command(&self) -> &TestCommand {
        &self.command
    }

    /// Runs the command, forwarding its formatted output to `stdout` and `stderr` as it arrives.
    ///
    /// The command's stdin is inherited.
    pub fn run(
        &self,
        stdout: &mut (dyn Write + Send),
        stderr: &mut (dyn Write + Send),
    ) -> Result<RunOutcome, RunError> {
        let command_str = self.command.to_escaped_string();
        info!("running `{command_str}`");

        let started_at = Utc::now().fixed_offset();
        let start = Instant::now();

        let captured = self
            .capture
            .run(stdout, stderr, |streams| {
                let (child_stdout, child_stderr) = streams.into_stdio();
                let mut cmd = self.command.to_std_command();
                cmd.stdin(Stdio::inherit())
                    .stdout(child_stdout)
                    .stderr(child_stderr);
                let child = cmd.spawn();
                // The command holds on to the write ends of the pipes until it is dropped, and the
                // forwarders can't finish while any write end is open.
                drop(cmd);

                let mut child = child.map_err(|error| RunError::Spawn {
                    command: command_str.clone(),
                    error,
                })?;
                debug!("spawned `{command_str}` with pid {}", child.id());
                child.wait().map_err(|error| RunError::Wait {
                    command: command_str.clone(),
                    error,
                })
            })
            .map_err(|error| RunError::Capture {
                command: command_str.clone(),
                error,
            })?;

        let status = captured.value?;
        let elapsed = start.elapsed();
        let exit_code = exit_code_for_status(status);
        debug!("`{command_str}` exited with {status} after {elapsed:?}");

        Ok(RunOutcome {
            status,
            exit_code,
            output: captured.output,
            started_at,
            elapsed,
        })
    }
}

/// Returns the process exit code that corresponds to a child's exit status.
///
/// This is the child's own exit code if it has one. On Unix, a child terminated by a signal maps
/// to `128 + signal`, the way shells report it. Anything else maps to 1.
pub fn exit_code_for_status(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use junit_tee_metadata::TeeExitCode;
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            return TeeExitCode::SIGNAL_BASE + signal;
        }
    }

    1
}
