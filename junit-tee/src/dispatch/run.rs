// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `run` subcommand.

use super::common::{ConfigOpts, parse_fact, parse_report_name};
use crate::{ExpectedError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use junit_tee_metadata::{RunMetadata, TeeExitCode};
use junit_tee_runner::{
    artifacts::write_artifacts,
    capture::OutputCapture,
    config::ConfigOverrides,
    runner::{TestCommand, TestRunner},
};
use std::io::Write;
use tracing::{error, info};

/// Options for `junit-tee run`.
#[derive(Debug, Args)]
pub(crate) struct RunOpts {
    /// Directory to write results into [default: from config].
    ///
    /// If this directory doesn't exist, no result files are written.
    #[arg(long, value_name = "DIR", env = "JUNIT_TEE_RESULTS_DIR")]
    results_dir: Option<Utf8PathBuf>,

    /// Name of the JUnit report [default: from config].
    #[arg(
        long,
        value_name = "NAME",
        env = "JUNIT_TEE_REPORT_NAME",
        value_parser = parse_report_name
    )]
    report_name: Option<String>,

    /// A fact to record in the run metadata, as KEY=VALUE.
    ///
    /// May be specified multiple times.
    #[arg(long = "fact", value_name = "KEY=VALUE", value_parser = parse_fact)]
    facts: Vec<(String, String)>,

    /// The test command to run, after `--`.
    #[arg(last = true, required = true, value_name = "COMMAND")]
    command: Vec<String>,
}

impl RunOpts {
    /// Runs the test command and writes its artifacts.
    ///
    /// Returns the exit code of the test command, or [`TeeExitCode::ARTIFACT_WRITE_FAILED`] if any
    /// artifact couldn't be written.
    pub(super) fn exec(
        self,
        config_opts: &ConfigOpts,
        working_dir: &Utf8Path,
        stdout: &mut (dyn Write + Send),
        stderr: &mut (dyn Write + Send),
    ) -> Result<i32> {
        let mut config = config_opts.make_config(working_dir)?;
        config.apply_overrides(ConfigOverrides {
            results_dir: self.results_dir,
            report_name: self.report_name,
            facts: self.facts,
        });
        // Relative results directories are relative to the working directory.
        if config.results().dir().is_relative() {
            let results_dir = working_dir.join(config.results().dir());
            config.apply_overrides(ConfigOverrides {
                results_dir: Some(results_dir),
                ..Default::default()
            });
        }

        let argv = self.command;
        let command = TestCommand::from_argv(argv.iter().cloned())
            .ok_or(ExpectedError::EmptyCommand)?;
        let capture =
            OutputCapture::new().with_read_buffer_size(config.capture().read_buffer_size());
        let runner = TestRunner::new(command, capture);

        let outcome = runner
            .run(stdout, stderr)
            .map_err(ExpectedError::test_command_failed)?;

        let metadata = RunMetadata {
            report_name: config.junit().report_name().to_owned(),
            command: argv,
            started_at: outcome.started_at,
            duration_secs: outcome.elapsed.as_secs_f64(),
            exit_code: outcome.exit_code,
            test_counts: None,
            facts: config.metadata().facts().clone(),
        };
        let artifacts = write_artifacts(&config, &outcome.output, metadata);

        if let Some(counts) = artifacts.test_counts {
            info!(
                "{} tests run: {} passed, {} failed, {} skipped",
                counts.tests,
                counts.passed(),
                counts.failures,
                counts.skipped
            );
        }

        if !artifacts.is_success() {
            error!(
                "{} of the result files could not be written, exiting with code {}",
                artifacts.errors.len(),
                TeeExitCode::ARTIFACT_WRITE_FAILED
            );
            return Ok(TeeExitCode::ARTIFACT_WRITE_FAILED);
        }

        Ok(outcome.exit_code)
    }
}
