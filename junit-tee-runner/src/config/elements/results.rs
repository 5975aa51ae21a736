// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// Where the artifacts of a run are written.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResultsConfig {
    dir: Utf8PathBuf,
    output_file: Utf8PathBuf,
    junit_file: Utf8PathBuf,
    metadata_file: Utf8PathBuf,
}

impl ResultsConfig {
    pub(in crate::config) fn new(custom: &ResultsImpl, default: &ResultsImpl) -> Self {
        let pick = |custom: &Option<Utf8PathBuf>, default: &Option<Utf8PathBuf>, key: &str| {
            custom
                .as_ref()
                .or(default.as_ref())
                .unwrap_or_else(|| panic!("results.{key} present in default config"))
                .clone()
        };

        Self {
            dir: pick(&custom.dir, &default.dir, "dir"),
            output_file: pick(&custom.output_file, &default.output_file, "output-file"),
            junit_file: pick(&custom.junit_file, &default.junit_file, "junit-file"),
            metadata_file: pick(&custom.metadata_file, &default.metadata_file, "metadata-file"),
        }
    }

    /// Returns the results directory.
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Overrides the results directory.
    pub fn set_dir(&mut self, dir: impl Into<Utf8PathBuf>) {
        self.dir = dir.into();
    }

    /// Returns the path to the combined output file.
    pub fn output_path(&self) -> Utf8PathBuf {
        self.dir.join(&self.output_file)
    }

    /// Returns the path to the JUnit report.
    pub fn junit_path(&self) -> Utf8PathBuf {
        self.dir.join(&self.junit_file)
    }

    /// Returns the path to the run metadata file.
    pub fn metadata_path(&self) -> Utf8PathBuf {
        self.dir.join(&self.metadata_file)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(in crate::config) struct ResultsImpl {
    #[serde(default)]
    dir: Option<Utf8PathBuf>,
    #[serde(default)]
    output_file: Option<Utf8PathBuf>,
    #[serde(default)]
    junit_file: Option<Utf8PathBuf>,
    #[serde(default)]
    metadata_file: Option<Utf8PathBuf>,
}
