// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Individual sections of the junit-tee config.

mod capture;
mod junit;
mod metadata;
mod results;

pub use capture::*;
pub use junit::*;
pub use metadata::*;
pub use results::*;
