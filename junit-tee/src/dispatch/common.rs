// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Options shared between subcommands.

use crate::{ExpectedError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use junit_tee_runner::config::TeeConfig;

/// Configuration options for junit-tee.
#[derive(Debug, Args)]
#[command(next_help_heading = "Config options")]
pub(crate) struct ConfigOpts {
    /// Config file [default: .config/junit-tee.toml in the current directory].
    #[arg(long, global = true, value_name = "PATH", env = "JUNIT_TEE_CONFIG_FILE")]
    pub(crate) config_file: Option<Utf8PathBuf>,
}

impl ConfigOpts {
    /// Reads the junit-tee config, relative to the given directory.
    pub(crate) fn make_config(&self, working_dir: &Utf8Path) -> Result<TeeConfig> {
        let config_file = self.config_file.as_deref().map(|file| {
            if file.is_relative() {
                working_dir.join(file)
            } else {
                file.to_owned()
            }
        });
        TeeConfig::from_sources(config_file.as_deref(), working_dir)
            .map_err(ExpectedError::from)
    }
}

/// Returns the current directory as a UTF-8 path.
pub(crate) fn current_dir_utf8() -> Result<Utf8PathBuf> {
    let dir =
        std::env::current_dir().map_err(|error| ExpectedError::CurrentDirInvalid { error })?;
    Utf8PathBuf::try_from(dir).map_err(|err| ExpectedError::CurrentDirInvalidUtf8 {
        path: err.into_path_buf(),
    })
}

/// Parses a `KEY=VALUE` fact.
pub(crate) fn parse_fact(input: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| format!("`{input}` is not in the form KEY=VALUE"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("`{input}` has an empty key"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

/// Parses a report name, which must not be blank.
pub(crate) fn parse_report_name(input: &str) -> std::result::Result<String, String> {
    if input.trim().is_empty() {
        return Err("report name must not be empty".to_owned());
    }
    Ok(input.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("cluster=ci-3", Ok(("cluster", "ci-3")) ; "simple")]
    #[test_case("url=http://x/?a=b", Ok(("url", "http://x/?a=b")) ; "value with equals sign")]
    #[test_case(" zone =us", Ok(("zone", "us")) ; "key is trimmed")]
    #[test_case("empty=", Ok(("empty", "")) ; "empty value")]
    #[test_case("novalue", Err("is not in the form KEY=VALUE") ; "missing equals sign")]
    #[test_case("=value", Err("has an empty key") ; "empty key")]
    fn parse_fact_cases(input: &str, expected: std::result::Result<(&str, &str), &str>) {
        match (parse_fact(input), expected) {
            (Ok((key, value)), Ok((expected_key, expected_value))) => {
                assert_eq!((key.as_str(), value.as_str()), (expected_key, expected_value));
            }
            (Err(err), Err(expected)) => {
                assert!(err.contains(expected), "expected error string not found: {err}");
            }
            (actual, expected) => panic!("expected {expected:?}, got {actual:?}"),
        }
    }

    #[test_case("operator", true ; "plain name")]
    #[test_case("nightly run", true ; "inner whitespace")]
    #[test_case("", false ; "empty")]
    #[test_case(" \t", false ; "whitespace only")]
    fn parse_report_name_cases(input: &str, valid: bool) {
        assert_eq!(parse_report_name(input).is_ok(), valid, "input: {input:?}");
    }

    #[test]
    fn relative_config_file_is_resolved_against_working_dir() {
        let dir = camino_tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("ci.toml"),
            "[junit]\nreport-name = \"from-ci\"\n",
        )
        .unwrap();

        let opts = ConfigOpts {
            config_file: Some("ci.toml".into()),
        };
        let config = opts.make_config(dir.path()).expect("config is valid");
        assert_eq!(config.junit().report_name(), "from-ci");
    }
}
