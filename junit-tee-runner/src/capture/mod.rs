// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capturing the output of a test run.
//!
//! [`OutputCapture`] gives a unit of work a pair of pipes to write to, and forwards what arrives
//! on them to the real output streams. Along the way, each line is classified (see [`LineKind`]):
//! test-framework status lines pass through verbatim, other lines are prefixed with a UTC
//! timestamp, and empty lines are dropped. The formatted text of both streams is also accumulated
//! into a single combined blob, which is what reports are generated from.

mod imp;
mod line;

pub use imp::*;
pub use line::*;
