// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Structured access to junit-tee's machine-readable output.
//!
//! This crate documents the exit codes produced by `junit-tee`, and defines the JSON format of the
//! run metadata file written next to the JUnit report.

mod exit_codes;
mod run_metadata;

pub use exit_codes::*;
pub use run_metadata::*;
