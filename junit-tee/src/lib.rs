// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run a test command, tee its output to the terminal, and turn it into a JUnit report.
//!
//! `junit-tee run -- go test -v ./...` forwards everything the command prints, timestamping log
//! lines along the way. Once the command exits, the combined output, a JUnit XML report and a run
//! metadata file are written to the results directory, and junit-tee exits with the command's exit
//! code.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::{LOG_ENV, OutputContext, StderrStyles};
