// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Code to generate JUnit XML reports from parsed test output.

use super::parser::{ParsedPackage, ParsedReport, ParsedTest, TestResult, parse_test_output};
use crate::{config::JunitConfig, errors::WriteReportError};
use camino::Utf8Path;
use junit_tee_metadata::TestCounts;
use quick_junit::{NonSuccessKind, Report, TestCase, TestCaseStatus, TestSuite};
use std::fs::File;
use tracing::debug;

static FAILED_MESSAGE: &str = "Failed";
static SKIPPED_MESSAGE: &str = "Skipped";

/// Builds a JUnit report out of a parsed report.
///
/// The report is named after [`JunitConfig::report_name`].
pub fn build_report(parsed: &ParsedReport, config: &JunitConfig) -> Report {
    let mut report = Report::new(config.report_name());
    report.add_test_suites(
        parsed
            .packages
            .iter()
            .map(|package| testsuite_for_package(package, config)),
    );
    report
}

/// Parses captured output, and writes the resulting JUnit report to `path`.
///
/// Returns the test counts in the report.
pub fn write_junit_report(
    output: &str,
    config: &JunitConfig,
    path: &Utf8Path,
) -> Result<TestCounts, WriteReportError> {
    let parsed = parse_test_output(output, config.report_name())?;
    let report = build_report(&parsed, config);

    let f = File::create(path).map_err(|error| WriteReportError::Fs {
        file: path.to_owned(),
        error,
    })?;
    report
        .serialize(f)
        .map_err(|error| WriteReportError::Junit {
            file: path.to_owned(),
            error,
        })?;

    debug!("wrote JUnit report with {} suites to `{path}`", parsed.packages.len());
    Ok(parsed.test_counts())
}

fn testsuite_for_package(package: &ParsedPackage, config: &JunitConfig) -> TestSuite {
    let mut testsuite = TestSuite::new(package.name.as_str());
    testsuite.set_time(package.total_duration());
    if let Some(coverage) = &package.coverage {
        testsuite.add_property(("coverage".to_owned(), format!("{coverage}%")));
    }

    let classname = package.short_name();
    testsuite.add_test_cases(
        package
            .tests
            .iter()
            .map(|test| testcase_for_test(test, classname, config)),
    );
    testsuite
}

fn testcase_for_test(test: &ParsedTest, classname: &str, config: &JunitConfig) -> TestCase {
    let output = test.output_text();

    let status = match test.result {
        TestResult::Pass => TestCaseStatus::success(),
        TestResult::Fail => {
            let mut status = TestCaseStatus::non_success(NonSuccessKind::Failure);
            status.set_message(FAILED_MESSAGE);
            if config.store_failure_output() && !output.is_empty() {
                status.set_description(output.as_str());
            }
            status
        }
        TestResult::Skip => {
            let mut status = TestCaseStatus::skipped();
            if config.store_failure_output() && !output.is_empty() {
                status.set_message(test.output.join("\n"));
            } else {
                status.set_message(SKIPPED_MESSAGE);
            }
            status
        }
    };

    let mut testcase = TestCase::new(test.name.as_str(), status);
    testcase.set_classname(classname).set_time(test.duration);
    if test.result == TestResult::Pass && config.store_success_output() && !output.is_empty() {
        testcase.set_system_out(output);
    }
    testcase
}
