// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::elements::{
    CaptureConfig, CaptureImpl, JunitConfig, JunitImpl, MetadataConfig, MetadataImpl,
    ResultsConfig, ResultsImpl,
};
use crate::errors::ConfigReadError;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use tracing::debug;

/// Configuration for junit-tee.
///
/// Built from the default config, with an optional repository config layered on top of it.
#[derive(Clone, Debug)]
pub struct TeeConfig {
    results: ResultsConfig,
    junit: JunitConfig,
    capture: CaptureConfig,
    metadata: MetadataConfig,
}

impl TeeConfig {
    /// The location of the repository config, relative to the working directory.
    pub const CONFIG_PATH: &'static str = ".config/junit-tee.toml";

    /// Contains the default config as a TOML file.
    ///
    /// The default rules included with this copy of junit-tee-runner are:
    ///
    /// ```toml
    #[doc = include_str!("../../default-config.toml")]
    /// ```
    ///
    /// Custom configuration is layered on top of the default config, key by key.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../../default-config.toml");

    /// Reads the config from the given file, or if not present from `.config/junit-tee.toml` in
    /// the given directory.
    ///
    /// If the file isn't specified and the directory doesn't have `.config/junit-tee.toml`, uses
    /// the default config options.
    pub fn from_sources(
        config_file: Option<&Utf8Path>,
        working_dir: &Utf8Path,
    ) -> Result<Self, ConfigReadError> {
        let default = Self::default_impl();

        let custom = match config_file {
            Some(file) => Some((file.to_owned(), Self::read_file(file)?)),
            None => {
                let default_file = working_dir.join(Self::CONFIG_PATH);
                if default_file.is_file() {
                    let custom = Self::read_file(&default_file)?;
                    Some((default_file, custom))
                } else {
                    None
                }
            }
        };

        match custom {
            Some((file, custom)) => {
                debug!("layering config from `{file}` on top of the default config");
                custom.validate(&file)?;
                Ok(Self::new(&custom, &default))
            }
            None => Ok(Self::new(&TeeConfigImpl::default(), &default)),
        }
    }

    /// Returns the results configuration.
    pub fn results(&self) -> &ResultsConfig {
        &self.results
    }

    /// Returns the JUnit configuration.
    pub fn junit(&self) -> &JunitConfig {
        &self.junit
    }

    /// Returns the capture configuration.
    pub fn capture(&self) -> &CaptureConfig {
        &self.capture
    }

    /// Returns the run metadata configuration.
    pub fn metadata(&self) -> &MetadataConfig {
        &self.metadata
    }

    /// Applies command-line overrides on top of the file-based config.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides {
            results_dir,
            report_name,
            facts,
        } = overrides;

        if let Some(results_dir) = results_dir {
            self.results.set_dir(results_dir);
        }
        if let Some(report_name) = report_name {
            self.junit.set_report_name(report_name);
        }
        for (key, value) in facts {
            self.metadata.add_fact(key, value);
        }
    }

    // ---
    // Helper methods
    // ---

    fn new(custom: &TeeConfigImpl, default: &TeeConfigImpl) -> Self {
        Self {
            results: ResultsConfig::new(&custom.results, &default.results),
            junit: JunitConfig::new(&custom.junit, &default.junit),
            capture: CaptureConfig::new(&custom.capture, &default.capture),
            metadata: MetadataConfig::new(&custom.metadata, &default.metadata),
        }
    }

    fn default_impl() -> TeeConfigImpl {
        toml::from_str(Self::DEFAULT_CONFIG).expect("default config should be valid")
    }

    fn read_file(file: &Utf8Path) -> Result<TeeConfigImpl, ConfigReadError> {
        let data = std::fs::read_to_string(file).map_err(|err| ConfigReadError::read(file, err))?;
        toml::from_str(&data).map_err(|err| ConfigReadError::toml(file, err))
    }
}

impl Default for TeeConfig {
    fn default() -> Self {
        Self::new(&TeeConfigImpl::default(), &Self::default_impl())
    }
}

/// Overrides for the config, typically from the command line or the environment.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Overrides `results.dir`.
    pub results_dir: Option<Utf8PathBuf>,

    /// Overrides `junit.report-name`.
    pub report_name: Option<String>,

    /// Facts added to (or replacing those in) `metadata.facts`.
    pub facts: Vec<(String, String)>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct TeeConfigImpl {
    #[serde(default)]
    results: ResultsImpl,
    #[serde(default)]
    junit: JunitImpl,
    #[serde(default)]
    capture: CaptureImpl,
    #[serde(default)]
    metadata: MetadataImpl,
}

impl TeeConfigImpl {
    fn validate(&self, file: &Utf8Path) -> Result<(), ConfigReadError> {
        if self.capture.read_buffer_size == Some(0) {
            return Err(ConfigReadError::InvalidValue {
                file: file.to_owned(),
                key: "capture.read-buffer-size",
                reason: "must be greater than zero",
            });
        }
        if self
            .junit
            .report_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(ConfigReadError::InvalidValue {
                file: file.to_owned(),
                key: "junit.report-name",
                reason: "must not be empty",
            });
        }

        Ok(())
    }
}
