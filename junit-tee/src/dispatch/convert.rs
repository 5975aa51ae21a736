// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `convert` subcommand.

use super::common::{ConfigOpts, parse_report_name};
use crate::{ExpectedError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use junit_tee_metadata::TeeExitCode;
use junit_tee_runner::{
    config::ConfigOverrides,
    errors::WriteReportError,
    reporter::{build_report, parser::parse_test_output, write_junit_report},
};
use std::io::{Read, Write};
use tracing::info;

/// Options for `junit-tee convert`.
#[derive(Debug, Args)]
pub(crate) struct ConvertOpts {
    /// Write the JUnit report to this file instead of stdout.
    #[arg(long, short, value_name = "PATH")]
    output: Option<Utf8PathBuf>,

    /// Name of the JUnit report [default: from config].
    #[arg(
        long,
        value_name = "NAME",
        env = "JUNIT_TEE_REPORT_NAME",
        value_parser = parse_report_name
    )]
    report_name: Option<String>,

    /// Captured output to convert, or `-` for stdin [default: stdin].
    #[arg(value_name = "INPUT")]
    input: Option<Utf8PathBuf>,
}

impl ConvertOpts {
    /// Converts previously captured output into a JUnit report.
    pub(super) fn exec(
        self,
        config_opts: &ConfigOpts,
        working_dir: &Utf8Path,
        stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> Result<i32> {
        let mut config = config_opts.make_config(working_dir)?;
        config.apply_overrides(ConfigOverrides {
            report_name: self.report_name,
            ..Default::default()
        });

        let input = self.input.filter(|input| input != "-");
        let text = read_input(input.as_deref(), working_dir, stdin)?;

        match self.output {
            Some(output) => {
                let output = working_dir.join(output);
                let counts = write_junit_report(&text, config.junit(), &output)?;
                info!(
                    "wrote JUnit report for {} tests ({} failed) to `{output}`",
                    counts.tests, counts.failures
                );
            }
            None => {
                let parsed = parse_test_output(&text, config.junit().report_name())
                    .map_err(WriteReportError::from)?;
                build_report(&parsed, config.junit())
                    .serialize(&mut *stdout)
                    .map_err(|error| ExpectedError::ReportStdoutFailed { error })?;
            }
        }

        Ok(TeeExitCode::OK)
    }
}

fn read_input(
    input: Option<&Utf8Path>,
    working_dir: &Utf8Path,
    stdin: &mut dyn Read,
) -> Result<String> {
    let mut bytes = Vec::new();
    let res = match input {
        Some(input) => std::fs::File::open(working_dir.join(input))
            .and_then(|mut f| f.read_to_end(&mut bytes)),
        None => stdin.read_to_end(&mut bytes),
    };
    res.map_err(|error| ExpectedError::InputReadFailed {
        input: input.map(ToOwned::to_owned),
        error,
    })?;

    // Captured output is forwarded lossily, so invalid UTF-8 here is replaced the same way.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
