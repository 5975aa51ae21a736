// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by junit-tee.

use crate::capture::CaptureStream;
use camino::Utf8PathBuf;
use std::{error::Error, fmt};
use thiserror::Error;

/// An error that occurred while reading the config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigReadError {
    /// An error occurred while reading the file.
    #[error("failed to read config file `{file}`")]
    Read {
        /// The config file.
        file: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: std::io::Error,
    },

    /// An error occurred while deserializing the file from TOML.
    #[error("failed to parse config file `{file}`")]
    Toml {
        /// The config file.
        file: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: toml::de::Error,
    },

    /// A value in the config was invalid.
    #[error("invalid value for `{key}` in `{file}`: {reason}")]
    InvalidValue {
        /// The config file.
        file: Utf8PathBuf,

        /// The key, e.g. `capture.read-buffer-size`.
        key: &'static str,

        /// Why the value is invalid.
        reason: &'static str,
    },
}

impl ConfigReadError {
    pub(crate) fn read(file: impl Into<Utf8PathBuf>, err: std::io::Error) -> Self {
        ConfigReadError::Read {
            file: file.into(),
            err,
        }
    }

    pub(crate) fn toml(file: impl Into<Utf8PathBuf>, err: toml::de::Error) -> Self {
        ConfigReadError::Toml {
            file: file.into(),
            err,
        }
    }
}

/// An error that occurred while capturing output.
///
/// Capture integrity is required for the report to be meaningful, so all of these are fatal to
/// the run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CaptureError {
    /// A capture pipe could not be created.
    #[error("failed to create capture pipe for {stream}")]
    PipeCreate {
        /// The stream the pipe was for.
        stream: CaptureStream,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// Reading from a capture pipe failed.
    #[error("failed to read captured {stream}")]
    Read {
        /// The stream being read.
        stream: CaptureStream,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// Forwarding captured output to its original destination failed.
    #[error("failed to forward captured output to {stream}")]
    Write {
        /// The stream being written.
        stream: CaptureStream,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },
}

/// An error that occurred while running a test command.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunError {
    /// The test command could not be started.
    #[error("failed to spawn `{command}`")]
    Spawn {
        /// The escaped command line.
        command: String,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// Waiting for the test command to exit failed.
    #[error("failed to wait for `{command}`")]
    Wait {
        /// The escaped command line.
        command: String,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// Capturing the output of the test command failed.
    #[error("failed to capture output of `{command}`")]
    Capture {
        /// The escaped command line.
        command: String,

        /// The underlying error.
        #[source]
        error: CaptureError,
    },
}

/// An error that occurred while parsing captured output into a test report.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum ReportParseError {
    /// The output contains no recognizable test markers.
    #[error("no test results found in captured output")]
    NoTestMarkers,

    /// A test result line had a duration that could not be parsed.
    #[error("invalid duration `{duration}` for test `{test_name}` on line {line_number}")]
    InvalidDuration {
        /// The 1-based line number in the captured output.
        line_number: usize,

        /// The name of the test.
        test_name: String,

        /// The duration text.
        duration: String,
    },
}

/// An error that occurred while writing a JUnit report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteReportError {
    /// The captured output could not be parsed.
    #[error("failed to parse captured output")]
    Parse(#[from] ReportParseError),

    /// An error occurred while operating on the file system.
    #[error("error operating on path `{file}`")]
    Fs {
        /// The file being operated on.
        file: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },

    /// An error occurred while producing JUnit XML.
    #[error("error writing JUnit output to `{file}`")]
    Junit {
        /// The output file.
        file: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: quick_junit::SerializeError,
    },
}

/// An error that occurred while writing one of the result artifacts.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteArtifactError {
    /// Writing the combined output file failed.
    #[error("error writing test output to `{file}`")]
    Output {
        /// The output file.
        file: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },

    /// Writing the JUnit report failed.
    #[error("error writing the JUnit report")]
    Report(#[from] WriteReportError),

    /// Writing the run metadata failed.
    #[error("error writing run metadata to `{file}`")]
    Metadata {
        /// The metadata file.
        file: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: WriteMetadataError,
    },
}

/// The cause of a [`WriteArtifactError::Metadata`] error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteMetadataError {
    /// The metadata could not be serialized.
    #[error("failed to serialize metadata")]
    Serialize(#[source] serde_json::Error),

    /// The metadata file could not be written.
    #[error("failed to write file")]
    Io(#[source] std::io::Error),
}

/// Displays an error along with the chain of errors that caused it.
///
/// The chain is rendered on a single line, which is what log messages want.
pub struct DisplayErrorChain<E>(E);

impl<E: Error> DisplayErrorChain<E> {
    /// Wraps an error.
    pub fn new(error: E) -> Self {
        Self(error)
    }
}

impl<E: Error> fmt::Display for DisplayErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;

        let mut source = self.0.source();
        while let Some(err) = source {
            write!(f, ": {err}")?;
            source = err.source();
        }

        Ok(())
    }
}
