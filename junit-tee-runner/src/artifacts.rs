// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Writes the artifacts of a captured run into the results directory.
//!
//! Three files are written, in order: the combined output as plain text, the JUnit report, and
//! the run metadata. Each write is independent of the others. A failure is logged and collected,
//! and the remaining writes are still attempted.

use crate::{
    config::TeeConfig,
    errors::{DisplayErrorChain, WriteArtifactError, WriteMetadataError},
    reporter::write_junit_report,
};
use camino::{Utf8Path, Utf8PathBuf};
use junit_tee_metadata::{RunMetadata, TestCounts};
use std::io;
use tracing::{debug, error, info};

/// The result of [`write_artifacts`].
#[derive(Debug, Default)]
pub struct ArtifactsOutcome {
    /// Whether writing was skipped because the results directory doesn't exist.
    pub skipped: bool,

    /// The files that were written successfully, in order.
    pub written: Vec<Utf8PathBuf>,

    /// The errors that occurred, in order.
    pub errors: Vec<WriteArtifactError>,

    /// Test counts from the JUnit report, if it was written.
    pub test_counts: Option<TestCounts>,
}

impl ArtifactsOutcome {
    /// Returns true if no write failed.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    fn record(&mut self, path: Utf8PathBuf, res: Result<(), WriteArtifactError>) {
        match res {
            Ok(()) => {
                info!("wrote `{path}`");
                self.written.push(path);
            }
            Err(err) => {
                error!("{}", DisplayErrorChain::new(&err));
                self.errors.push(err);
            }
        }
    }
}

/// Writes the output, JUnit report and run metadata for a captured run.
///
/// Nothing is written if the configured results directory doesn't exist. The test counts from the
/// JUnit report, if any, are recorded in `metadata` before it is written.
pub fn write_artifacts(
    config: &TeeConfig,
    output: &str,
    mut metadata: RunMetadata,
) -> ArtifactsOutcome {
    let results = config.results();
    let dir = results.dir();
    match dir.metadata() {
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("results directory `{dir}` does not exist, skipping artifacts");
            return ArtifactsOutcome {
                skipped: true,
                ..Default::default()
            };
        }
        Err(err) => {
            // Let the writes below report the problem.
            debug!("failed to query results directory `{dir}`: {err}");
        }
    }

    let mut outcome = ArtifactsOutcome::default();

    let output_path = results.output_path();
    let res = std::fs::write(&output_path, output).map_err(|error| WriteArtifactError::Output {
        file: output_path.clone(),
        error,
    });
    outcome.record(output_path, res);

    let junit_path = results.junit_path();
    match write_junit_report(output, config.junit(), &junit_path) {
        Ok(counts) => {
            outcome.test_counts = Some(counts);
            outcome.record(junit_path, Ok(()));
        }
        Err(err) => outcome.record(junit_path, Err(err.into())),
    }

    metadata.test_counts = outcome.test_counts;
    let metadata_path = results.metadata_path();
    let res = write_run_metadata(&metadata, &metadata_path);
    outcome.record(metadata_path, res);

    outcome
}

/// Writes run metadata as pretty-printed JSON to `path`.
pub fn write_run_metadata(
    metadata: &RunMetadata,
    path: &Utf8Path,
) -> Result<(), WriteArtifactError> {
    let json = metadata
        .to_json_pretty()
        .map_err(|err| WriteArtifactError::Metadata {
            file: path.to_owned(),
            error: WriteMetadataError::Serialize(err),
        })?;
    std::fs::write(path, json).map_err(|err| WriteArtifactError::Metadata {
        file: path.to_owned(),
        error: WriteMetadataError::Io(err),
    })
}
