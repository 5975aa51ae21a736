// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for junit-tee.
//!
//! The config is read from `.config/junit-tee.toml` (or a file passed in explicitly), layered on
//! top of [`TeeConfig::DEFAULT_CONFIG`]. Command-line options are then applied as
//! [`ConfigOverrides`].

mod elements;
mod imp;

pub use elements::*;
pub use imp::*;
