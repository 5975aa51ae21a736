// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Top-level application and command routing.

use super::{
    common::{ConfigOpts, current_dir_utf8},
    convert::ConvertOpts,
    run::RunOpts,
};
use crate::{
    Result,
    output::{OutputContext, OutputOpts},
};
use camino::Utf8Path;
use clap::{Parser, Subcommand};
use std::io::{self, Read, Write};

/// Run a test command, tee its output to the terminal, and write a JUnit report.
///
/// Log lines in the output are timestamped as they are forwarded. Status lines from `go test` are
/// passed through unchanged.
#[derive(Debug, Parser)]
#[command(
    name = "junit-tee",
    version,
    styles = crate::output::clap_styles::style(),
    max_term_width = 100
)]
pub struct JunitTeeApp {
    #[clap(flatten)]
    output: OutputOpts,

    #[clap(flatten)]
    config_opts: ConfigOpts,

    #[clap(subcommand)]
    command: Command,
}

impl JunitTeeApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app.
    ///
    /// Returns the exit code.
    pub fn exec(self) -> Result<i32> {
        let working_dir = current_dir_utf8()?;
        self.exec_impl(
            &working_dir,
            &mut io::stdin().lock(),
            &mut io::stdout(),
            &mut io::stderr(),
        )
    }

    pub(super) fn exec_impl(
        self,
        working_dir: &Utf8Path,
        stdin: &mut dyn Read,
        stdout: &mut (dyn Write + Send),
        stderr: &mut (dyn Write + Send),
    ) -> Result<i32> {
        match self.command {
            Command::Run(opts) => opts.exec(&self.config_opts, working_dir, stdout, stderr),
            Command::Convert(opts) => opts.exec(&self.config_opts, working_dir, stdin, stdout),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a test command, capturing its output.
    ///
    /// Output is forwarded to the terminal as it arrives. Once the command exits, the combined
    /// output, a JUnit report and run metadata are written to the results directory, if it exists.
    ///
    /// Exits with the exit code of the test command, or 1 if any result file couldn't be written.
    Run(RunOpts),

    /// Convert previously captured output into a JUnit report.
    Convert(ConvertOpts),
}
