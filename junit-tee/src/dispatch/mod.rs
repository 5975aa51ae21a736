// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command dispatch and execution.

mod app;
mod common;
mod convert;
mod run;

pub use app::JunitTeeApp;
