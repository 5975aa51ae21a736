// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for `junit-tee`.
//!
//! The basic flow of a run is:
//!
//! 1. [`capture::OutputCapture`] hands a pair of pipes to the test command and forwards everything
//!    written to them to the real terminal, timestamping log lines on the way.
//! 2. [`reporter::parser::parse_test_output`] turns the combined text into a hierarchy of packages and
//!    tests, which [`reporter::build_report`] maps onto a JUnit report.
//! 3. [`artifacts::write_artifacts`] persists the combined output, the JUnit report and the run
//!    metadata into the results directory.

pub mod artifacts;
pub mod capture;
pub mod config;
pub mod errors;
pub mod reporter;
pub mod runner;
