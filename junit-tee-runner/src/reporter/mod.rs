// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns captured test output into JUnit XML.
//!
//! The [`parser`] recovers packages and tests from `go test -v` output, and [`build_report`]
//! maps them onto a [`quick_junit::Report`].

mod junit;
pub mod parser;

pub use junit::*;
