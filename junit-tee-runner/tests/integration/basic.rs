// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use color_eyre::eyre::{Result, ensure};
use junit_tee_metadata::{RunMetadata, TestCounts};
use junit_tee_runner::{
    artifacts::write_artifacts,
    capture::OutputCapture,
    config::TeeConfig,
    errors::{CaptureError, RunError},
    reporter::{build_report, parser::parse_test_output},
    runner::{RunOutcome, TestCommand, TestRunner},
};
use pretty_assertions::assert_eq;
use std::io::{self, Write};

fn metadata_for(config: &TeeConfig, outcome: &RunOutcome, command: Vec<String>) -> RunMetadata {
    RunMetadata {
        report_name: config.junit().report_name().to_owned(),
        command,
        started_at: outcome.started_at,
        duration_secs: outcome.elapsed.as_secs_f64(),
        exit_code: outcome.exit_code,
        test_counts: None,
        facts: config.metadata().facts().clone(),
    }
}

#[test]
fn run_and_write_artifacts() -> Result<()> {
    let dir = camino_tempfile::tempdir()?;
    let config = config_for(dir.path(), "integreatly-operator");
    let runner = sh_runner(GO_TEST_SCRIPT);

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let outcome = runner.run(&mut stdout, &mut stderr)?;
    assert_eq!(outcome.exit_code, 1);

    // Status lines pass through unchanged, log lines get a timestamp.
    let stdout = String::from_utf8(stdout)?;
    assert!(stdout.starts_with(
        "=== RUN   TestInstall\n[2024-01-01T00:00:00] installing operator\n--- PASS: TestInstall (1.25s)\n"
    ));
    assert_eq!(
        String::from_utf8(stderr)?,
        "[2024-01-01T00:00:00]     upgrade_test.go:42: subscription never became ready\n"
    );

    let metadata = metadata_for(&config, &outcome, runner.command().argv());
    let artifacts = write_artifacts(&config, &outcome.output, metadata);
    ensure!(artifacts.is_success(), "artifact errors: {:?}", artifacts.errors);
    assert_eq!(
        artifacts.test_counts,
        Some(TestCounts {
            tests: 3,
            failures: 1,
            skipped: 1,
        })
    );

    let output = std::fs::read_to_string(dir.path().join("test-output.txt"))?;
    assert_eq!(output, outcome.output);

    let xml = std::fs::read_to_string(dir.path().join("junit-report.xml"))?;
    assert!(xml.contains(r#"name="integreatly-operator""#), "{xml}");
    assert!(
        xml.contains(r#"<testsuite name="github.com/org/operator/test/functional""#),
        "{xml}"
    );
    assert!(xml.contains(r#"classname="functional""#), "{xml}");

    let metadata: RunMetadata =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("run-metadata.json"))?)?;
    assert_eq!(metadata.exit_code, 1);
    assert_eq!(metadata.command[0], "sh");
    assert_eq!(metadata.facts.get("cluster").map(String::as_str), Some("ci-3"));
    assert_eq!(metadata.test_counts.map(|counts| counts.passed()), Some(1));

    Ok(())
}

#[test]
fn combined_output_parses_regardless_of_stream_interleaving() -> Result<()> {
    let runner = sh_runner(GO_TEST_SCRIPT);
    let outcome = runner.run(&mut io::sink(), &mut io::sink())?;

    let parsed = parse_test_output(&outcome.output, "fallback")?;
    let config = TeeConfig::default();
    let report = build_report(&parsed, config.junit());
    assert_eq!(report.tests, 3);
    assert_eq!(report.failures, 1);

    Ok(())
}

#[test]
fn results_dir_absent_writes_nothing() -> Result<()> {
    let dir = camino_tempfile::tempdir()?;
    let results_dir = dir.path().join("test-run-results");
    let config = config_for(&results_dir, "suite");
    let runner = sh_runner("echo '--- PASS: TestA (0.01s)'");

    let outcome = runner.run(&mut io::sink(), &mut io::sink())?;
    assert_eq!(outcome.exit_code, 0);

    let metadata = metadata_for(&config, &outcome, runner.command().argv());
    let artifacts = write_artifacts(&config, &outcome.output, metadata);
    assert!(artifacts.skipped);
    assert!(artifacts.is_success());
    assert!(!results_dir.exists());

    Ok(())
}

#[test]
fn large_output_is_fully_drained() -> Result<()> {
    // Much more than a pipe buffer, in reads smaller than a line.
    let runner = {
        let command = TestCommand::new(
            "sh",
            ["-c", "i=0; while [ $i -lt 5000 ]; do echo \"line $i\"; i=$((i+1)); done"],
        );
        TestRunner::new(
            command,
            OutputCapture::new()
                .with_clock(fixed_clock())
                .with_read_buffer_size(7),
        )
    };

    let outcome = runner.run(&mut io::sink(), &mut io::sink())?;
    assert_eq!(outcome.output.lines().count(), 5000);
    assert_eq!(
        outcome.output.lines().last(),
        Some("[2024-01-01T00:00:00] line 4999")
    );

    Ok(())
}

struct ClosedWriter;

impl Write for ClosedWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn forwarding_failure_is_a_capture_error() -> Result<()> {
    let runner = sh_runner("echo 'log line'");
    let err = runner
        .run(&mut ClosedWriter, &mut io::sink())
        .expect_err("stdout is closed");
    let RunError::Capture { error, .. } = err else {
        panic!("unexpected error: {err:?}");
    };
    assert!(matches!(error, CaptureError::Write { .. }), "{error:?}");

    Ok(())
}
