// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING_TARGET, StderrStyles};
use camino::Utf8PathBuf;
use junit_tee_metadata::TeeExitCode;
use junit_tee_runner::errors::{ConfigReadError, RunError, WriteReportError};
use owo_colors::OwoColorize;
use std::error::Error;
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An expected error: one that is reported to the user with a documented exit code.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("current directory is invalid")]
    CurrentDirInvalid {
        #[source]
        error: std::io::Error,
    },
    #[error("current directory is not valid UTF-8")]
    CurrentDirInvalidUtf8 { path: std::path::PathBuf },
    #[error("config read error")]
    ConfigReadError {
        #[from]
        err: ConfigReadError,
    },
    #[error("no test command specified")]
    EmptyCommand,
    #[error("test command failed")]
    TestCommandFailed {
        #[source]
        err: RunError,
    },
    #[error("failed to read input")]
    InputReadFailed {
        input: Option<Utf8PathBuf>,
        #[source]
        error: std::io::Error,
    },
    #[error("failed to write JUnit report")]
    ReportFailed {
        #[from]
        err: WriteReportError,
    },
    #[error("failed to write JUnit report to stdout")]
    ReportStdoutFailed {
        #[source]
        error: quick_junit::SerializeError,
    },
}

impl ExpectedError {
    pub(crate) fn test_command_failed(err: RunError) -> Self {
        Self::TestCommandFailed { err }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::CurrentDirInvalid { .. }
            | Self::CurrentDirInvalidUtf8 { .. }
            | Self::ConfigReadError { .. }
            | Self::EmptyCommand => TeeExitCode::SETUP_ERROR,
            Self::TestCommandFailed { err } => match err {
                RunError::Capture { .. } => TeeExitCode::CAPTURE_FAILED,
                _ => TeeExitCode::COMMAND_SPAWN_FAILED,
            },
            Self::InputReadFailed { .. } => TeeExitCode::INPUT_READ_FAILED,
            Self::ReportFailed { .. } | Self::ReportStdoutFailed { .. } => {
                TeeExitCode::REPORT_FAILED
            }
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match &self {
            Self::CurrentDirInvalid { error } => {
                error!("could not determine the current directory");
                Some(error as &dyn Error)
            }
            Self::CurrentDirInvalidUtf8 { path } => {
                error!(
                    "current directory `{}` is not valid UTF-8",
                    path.display().style(styles.bold)
                );
                None
            }
            Self::ConfigReadError { err } => {
                error!("{err}");
                err.source()
            }
            Self::EmptyCommand => {
                error!("no test command specified after `--`");
                None
            }
            Self::TestCommandFailed { err } => {
                error!("{err}");
                err.source()
            }
            Self::InputReadFailed { input, error } => {
                match input {
                    Some(input) => {
                        error!("failed to read input file `{}`", input.style(styles.bold))
                    }
                    None => error!("failed to read input from stdin"),
                }
                Some(error as &dyn Error)
            }
            Self::ReportFailed { err } => {
                error!("{err}");
                err.source()
            }
            Self::ReportStdoutFailed { error } => {
                error!("failed to write JUnit report to stdout");
                Some(error as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
