// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests that run real child processes.

#![cfg(unix)]

mod basic;
mod fixtures;
