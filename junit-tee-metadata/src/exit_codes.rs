// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `junit-tee` failures.
///
/// `junit-tee run` exits with the exit code of the test command it wraps. The codes listed here
/// are produced when junit-tee itself fails.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum TeeExitCode {}

impl TeeExitCode {
    /// No errors occurred and junit-tee exited normally.
    pub const OK: i32 = 0;

    /// Writing one of the result artifacts failed.
    ///
    /// This overrides the exit code of the test command, even if the test run passed.
    pub const ARTIFACT_WRITE_FAILED: i32 = 1;

    /// Converting captured output into a JUnit report failed.
    pub const REPORT_FAILED: i32 = 1;

    /// A user issue happened while setting up a junit-tee invocation, e.g. an invalid config file.
    pub const SETUP_ERROR: i32 = 96;

    /// The test command could not be started.
    pub const COMMAND_SPAWN_FAILED: i32 = 101;

    /// Capturing the output of the test command failed.
    ///
    /// Capture integrity is not negotiable: a run with unreliable output is not reported.
    pub const CAPTURE_FAILED: i32 = 102;

    /// Reading previously captured input failed.
    pub const INPUT_READ_FAILED: i32 = 103;

    /// Exit code used for a test command that was terminated by a signal, on top of the signal
    /// number.
    ///
    /// This matches the convention used by POSIX shells.
    pub const SIGNAL_BASE: i32 = 128;
}
