// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parser for `go test -v` output.
//!
//! The input is the combined text produced by the capture, so lines that aren't status lines may
//! carry a `[YYYY-MM-DDTHH:MM:SS] ` prefix. Markers are recognized with that prefix stripped,
//! while test output keeps it.

use crate::errors::ReportParseError;
use junit_tee_metadata::TestCounts;
use regex::Regex;
use std::{sync::LazyLock, time::Duration};
use tracing::debug;

static CAPTURE_TIMESTAMP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\] ").unwrap());
static RUN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*=== RUN\s+(\S+)\s*$").unwrap());
static PAUSE_CONT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*=== (?:PAUSE|CONT|NAME)\s+(\S+)\s*$").unwrap());
static RESULT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*--- (PASS|FAIL|SKIP): (.+) \(([^)]*)\)\s*$").unwrap()
});
static PACKAGE_SUMMARY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:ok|FAIL)\s+(?<package>\S+)\s+(?:(?<secs>\d+(?:\.\d+)?)s|\(cached\)|(?<note>\[[^\]]*\]))(?:\s+coverage:\s+(?<coverage>\d+(?:\.\d+)?)% of statements.*)?\s*$",
    )
    .unwrap()
});
static NO_TEST_FILES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\?\s+(\S+)\s+\[no test files\]\s*$").unwrap());
static BUILD_HEADER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^# (\S+)(?: \[[^\]]*\])?\s*$").unwrap());
static COVERAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*coverage:\s+(\d+(?:\.\d+)?)% of statements").unwrap());

/// The indentation `go test` adds per subtest level.
const INDENT: &str = "    ";

/// The result of a single test.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TestResult {
    /// The test passed.
    Pass,

    /// The test failed, or started but never reported a result.
    Fail,

    /// The test was skipped.
    Skip,
}

/// A single test found in the output.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedTest {
    /// The test name, including any `/`-separated subtest path.
    pub name: String,

    /// The result of the test.
    pub result: TestResult,

    /// The duration reported on the result line, or zero if there wasn't one.
    pub duration: Duration,

    /// Output lines attached to this test.
    pub output: Vec<String>,
}

impl ParsedTest {
    fn started(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            result: TestResult::Fail,
            duration: Duration::ZERO,
            output: Vec::new(),
        }
    }

    /// Returns the output of this test as a single newline-terminated string.
    pub fn output_text(&self) -> String {
        let mut text = self.output.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        text
    }
}

/// A package, as closed by a package summary line.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedPackage {
    /// The package path, e.g. `github.com/org/repo/pkg`.
    pub name: String,

    /// The duration from the package summary line, if present.
    pub duration: Option<Duration>,

    /// The statement coverage percentage, if reported.
    pub coverage: Option<String>,

    /// The tests in this package, in the order they were first seen.
    pub tests: Vec<ParsedTest>,
}

impl ParsedPackage {
    /// Returns the package duration, or the sum of the test durations if the summary didn't
    /// report one.
    pub fn total_duration(&self) -> Duration {
        self.duration
            .unwrap_or_else(|| self.tests.iter().map(|test| test.duration).sum())
    }

    /// Returns the last segment of the package path.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// The hierarchy of packages and tests recovered from captured output.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedReport {
    /// Packages in the order their summary lines appeared.
    pub packages: Vec<ParsedPackage>,
}

impl ParsedReport {
    /// Returns counts of tests across all packages.
    pub fn test_counts(&self) -> TestCounts {
        let mut counts = TestCounts::default();
        for test in self.packages.iter().flat_map(|package| &package.tests) {
            counts.tests += 1;
            match test.result {
                TestResult::Pass => {}
                TestResult::Fail => counts.failures += 1,
                TestResult::Skip => counts.skipped += 1,
            }
        }
        counts
    }
}

/// Parses captured `go test` output.
///
/// Tests that aren't closed by a package summary line are collected into a package named
/// `default_package`.
pub fn parse_test_output(
    output: &str,
    default_package: &str,
) -> Result<ParsedReport, ReportParseError> {
    let mut state = ParseState::default();
    for (index, line) in output.lines().enumerate() {
        state.parse_line(index + 1, line)?;
    }
    state.finish(default_package)
}

#[derive(Debug, Default)]
struct ParseState {
    packages: Vec<ParsedPackage>,
    // Tests seen since the last package summary.
    pending: Vec<ParsedTest>,
    current: Option<usize>,
    coverage: Option<String>,
    // Compiler output following a `# <package>` header.
    build_output: Option<BuildOutput>,
}

#[derive(Debug)]
struct BuildOutput {
    package: String,
    lines: Vec<String>,
}

impl ParseState {
    fn parse_line(&mut self, line_number: usize, line: &str) -> Result<(), ReportParseError> {
        let content = CAPTURE_TIMESTAMP_REGEX
            .find(line)
            .map_or(line, |m| &line[m.end()..]);

        if let Some(captures) = RUN_REGEX.captures(content) {
            self.build_output = None;
            self.pending.push(ParsedTest::started(&captures[1]));
            self.current = Some(self.pending.len() - 1);
        } else if let Some(captures) = PAUSE_CONT_REGEX.captures(content) {
            self.current = self.find_test(&captures[1]);
        } else if let Some(captures) = RESULT_REGEX.captures(content) {
            let name = &captures[2];
            let duration = parse_result_duration(&captures[3]).ok_or_else(|| {
                ReportParseError::InvalidDuration {
                    line_number,
                    test_name: name.to_owned(),
                    duration: captures[3].to_owned(),
                }
            })?;
            let index = match self.find_test(name) {
                Some(index) => index,
                None => {
                    self.pending.push(ParsedTest::started(name));
                    self.pending.len() - 1
                }
            };
            let test = &mut self.pending[index];
            test.result = match &captures[1] {
                "PASS" => TestResult::Pass,
                "SKIP" => TestResult::Skip,
                _ => TestResult::Fail,
            };
            test.duration = duration;
            self.current = Some(index);
        } else if let Some(captures) = PACKAGE_SUMMARY_REGEX.captures(content) {
            let package = &captures["package"];
            let duration = captures
                .name("secs")
                .and_then(|secs| secs.as_str().parse::<f64>().ok())
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok());
            let coverage = captures.name("coverage").map(|cov| cov.as_str().to_owned());
            // `[build failed]`, `[setup failed]` and the like: the package never ran, so record
            // the failure as a test carrying the compiler output.
            if let Some(note) = captures
                .name("note")
                .filter(|note| note.as_str().ends_with("failed]"))
            {
                self.add_build_failure(package, note.as_str());
            }
            self.close_package(package, duration, coverage);
        } else if let Some(captures) = NO_TEST_FILES_REGEX.captures(content) {
            self.close_package(&captures[1], None, None);
        } else if let Some(captures) = COVERAGE_REGEX.captures(content) {
            self.coverage = Some(captures[1].to_owned());
        } else if matches!(content.trim(), "PASS" | "FAIL") {
            // Overall result lines carry no per-test information.
        } else if let Some(captures) = BUILD_HEADER_REGEX
            .captures(content)
            .filter(|_| self.current.is_none())
        {
            self.build_output = Some(BuildOutput {
                package: captures[1].to_owned(),
                lines: Vec::new(),
            });
        } else if let Some(build_output) = &mut self.build_output {
            build_output.lines.push(line.to_owned());
        } else if let Some(index) = self.current {
            let text = line.strip_prefix(INDENT).unwrap_or(line);
            self.pending[index].output.push(text.to_owned());
        }

        Ok(())
    }

    fn find_test(&self, name: &str) -> Option<usize> {
        self.pending.iter().rposition(|test| test.name == name)
    }

    fn add_build_failure(&mut self, package: &str, note: &str) {
        let mut test = ParsedTest::started(note);
        if let Some(build_output) = self
            .build_output
            .take()
            .filter(|build_output| build_output.package == package)
        {
            test.output = build_output.lines;
        }
        self.pending.push(test);
    }

    fn close_package(&mut self, name: &str, duration: Option<Duration>, coverage: Option<String>) {
        let tests = std::mem::take(&mut self.pending);
        debug!("package `{name}` closed with {} tests", tests.len());
        self.packages.push(ParsedPackage {
            name: name.to_owned(),
            duration,
            coverage: coverage.or_else(|| self.coverage.take()),
            tests,
        });
        self.current = None;
        self.coverage = None;
        self.build_output = None;
    }

    fn finish(mut self, default_package: &str) -> Result<ParsedReport, ReportParseError> {
        if !self.pending.is_empty() {
            self.close_package(default_package, None, None);
        }
        if self.packages.is_empty() {
            return Err(ReportParseError::NoTestMarkers);
        }
        Ok(ParsedReport {
            packages: self.packages,
        })
    }
}

fn parse_result_duration(text: &str) -> Option<Duration> {
    let secs = text
        .strip_suffix(" seconds")
        .or_else(|| text.strip_suffix('s'))?;
    let secs: f64 = secs.parse().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn parses_verbose_output() {
        let output = indoc! {"
            === RUN   TestA
            --- PASS: TestA (0.01s)
            === RUN   TestB
            [2024-01-01T00:00:00]     main_test.go:12: boom
            --- FAIL: TestB (1.50s)
            === RUN   TestC
            [2024-01-01T00:00:00]     main_test.go:20: not on this platform
            --- SKIP: TestC (0.00s)
            FAIL
            [2024-01-01T00:00:00] FAIL\tgithub.com/org/repo/pkg\t1.520s
        "};

        let report = parse_test_output(output, "suite").expect("output parses");
        assert_eq!(report.packages.len(), 1);
        let package = &report.packages[0];
        assert_eq!(package.name, "github.com/org/repo/pkg");
        assert_eq!(package.short_name(), "pkg");
        assert_eq!(package.duration, Some(Duration::from_millis(1520)));

        let results: Vec<_> = package
            .tests
            .iter()
            .map(|test| (test.name.as_str(), test.result, test.duration))
            .collect();
        assert_eq!(
            results,
            vec![
                ("TestA", TestResult::Pass, Duration::from_millis(10)),
                ("TestB", TestResult::Fail, Duration::from_millis(1500)),
                ("TestC", TestResult::Skip, Duration::ZERO),
            ]
        );
        assert_eq!(
            package.tests[1].output,
            vec!["[2024-01-01T00:00:00]     main_test.go:12: boom"]
        );

        let counts = report.test_counts();
        assert_eq!((counts.tests, counts.failures, counts.skipped), (3, 1, 1));
    }

    #[test]
    fn subtests_and_indented_output() {
        let output = indoc! {"
            === RUN   TestParent
            === RUN   TestParent/child
                --- PASS: TestParent/child (0.00s)
            --- FAIL: TestParent (0.02s)
                    detail line
            ok  \tpkg\t0.1s
        "};

        let report = parse_test_output(output, "suite").expect("output parses");
        let tests = &report.packages[0].tests;
        assert_eq!(tests.len(), 2);
        assert_eq!(tests[0].name, "TestParent");
        assert_eq!(tests[0].result, TestResult::Fail);
        // One level of indentation is removed.
        assert_eq!(tests[0].output, vec!["    detail line"]);
        assert_eq!(tests[1].name, "TestParent/child");
        assert_eq!(tests[1].result, TestResult::Pass);
    }

    #[test]
    fn pause_and_cont_switch_the_current_test() {
        let output = indoc! {"
            === RUN   TestX
            === PAUSE TestX
            === RUN   TestY
            === CONT  TestX
            output for x
            --- PASS: TestY (0.00s)
            --- PASS: TestX (0.00s)
        "};

        let report = parse_test_output(output, "suite").expect("output parses");
        let tests = &report.packages[0].tests;
        assert_eq!(tests[0].output, vec!["output for x"]);
        assert!(tests[1].output.is_empty());
    }

    #[test]
    fn name_switches_the_current_test() {
        let output = indoc! {"
            === RUN   TestX
            === PAUSE TestX
            === RUN   TestY
            === PAUSE TestY
            === CONT  TestX
            === CONT  TestY
            === NAME  TestX
                x_test.go:7: output for x
            === NAME  TestY
                y_test.go:9: output for y
            --- PASS: TestX (0.00s)
            --- PASS: TestY (0.00s)
        "};

        let report = parse_test_output(output, "suite").expect("output parses");
        let tests = &report.packages[0].tests;
        assert_eq!(tests[0].output, vec!["x_test.go:7: output for x"]);
        assert_eq!(tests[1].output, vec!["y_test.go:9: output for y"]);
    }

    #[test]
    fn build_failure_is_a_failing_test() {
        let output = indoc! {"
            [2024-01-01T00:00:00] # github.com/org/op/pkg
            [2024-01-01T00:00:00] pkg/main.go:3:1: syntax error: non-declaration statement outside function body
            [2024-01-01T00:00:00] FAIL\tgithub.com/org/op/pkg [build failed]
            === RUN   TestOther
            --- PASS: TestOther (0.01s)
            PASS
            [2024-01-01T00:00:00] ok  \tgithub.com/org/op/other\t0.020s
        "};

        let report = parse_test_output(output, "suite").expect("output parses");
        let [broken, other] = &report.packages[..] else {
            panic!("expected two packages: {:?}", report.packages);
        };
        assert_eq!(broken.name, "github.com/org/op/pkg");
        assert_eq!(broken.duration, None);
        let [test] = &broken.tests[..] else {
            panic!("expected one test: {:?}", broken.tests);
        };
        assert_eq!(test.name, "[build failed]");
        assert_eq!(test.result, TestResult::Fail);
        assert_eq!(
            test.output,
            vec![
                "[2024-01-01T00:00:00] pkg/main.go:3:1: syntax error: non-declaration statement \
                 outside function body"
            ]
        );

        assert_eq!(other.tests.len(), 1);
        assert!(other.tests[0].output.is_empty());

        let counts = report.test_counts();
        assert_eq!((counts.tests, counts.failures, counts.skipped), (2, 1, 0));
    }

    #[test]
    fn hash_lines_inside_a_test_are_test_output() {
        let output = indoc! {"
            === RUN   TestA
            [2024-01-01T00:00:00] # scratch
            --- FAIL: TestA (0.01s)
        "};

        let report = parse_test_output(output, "suite").expect("output parses");
        assert_eq!(
            report.packages[0].tests[0].output,
            vec!["[2024-01-01T00:00:00] # scratch"]
        );
    }

    #[test]
    fn result_without_run_line_creates_the_test() {
        let output = "--- FAIL: TestQuiet (0.30s)\n    quiet_test.go:4: failed\n";
        let report = parse_test_output(output, "suite").expect("output parses");
        let test = &report.packages[0].tests[0];
        assert_eq!(test.name, "TestQuiet");
        assert_eq!(test.result, TestResult::Fail);
        assert_eq!(test.output_text(), "quiet_test.go:4: failed\n");
    }

    #[test]
    fn test_without_result_is_a_failure() {
        let output = "=== RUN   TestHang\nstill going\n";
        let report = parse_test_output(output, "suite").expect("output parses");
        assert_eq!(report.packages[0].tests[0].result, TestResult::Fail);
    }

    #[test]
    fn unclosed_tests_use_the_default_package() {
        let output = "--- PASS: TestA (0.01s)\n--- PASS: TestB (0.02s)\n";
        let report = parse_test_output(output, "integreatly-operator").expect("output parses");
        let package = &report.packages[0];
        assert_eq!(package.name, "integreatly-operator");
        assert_eq!(package.duration, None);
        assert_eq!(package.total_duration(), Duration::from_millis(30));
    }

    #[test]
    fn multiple_packages_and_coverage() {
        let output = indoc! {"
            --- PASS: TestA (0.01s)
            PASS
            coverage: 71.4% of statements
            ok  \texample.com/a\t0.2s
            --- PASS: TestB (0.01s)
            ok  \texample.com/b\t(cached)\tcoverage: 12.0% of statements
            ?   \texample.com/c\t[no test files]
        "};

        let report = parse_test_output(output, "suite").expect("output parses");
        let summary: Vec<_> = report
            .packages
            .iter()
            .map(|package| {
                (
                    package.name.as_str(),
                    package.tests.len(),
                    package.coverage.as_deref(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("example.com/a", 1, Some("71.4")),
                ("example.com/b", 1, Some("12.0")),
                ("example.com/c", 0, None),
            ]
        );
        assert_eq!(report.packages[1].duration, None);
    }

    #[test_case("" ; "empty input")]
    #[test_case("[2024-01-01T00:00:00] hello\n[2024-01-01T00:00:00] world\n" ; "only log lines")]
    #[test_case("PASS\n" ; "only an overall result")]
    fn no_test_markers(output: &str) {
        assert_eq!(
            parse_test_output(output, "suite"),
            Err(ReportParseError::NoTestMarkers)
        );
    }

    #[test_case("--- PASS: TestA (fast)\n", "fast" ; "not a number")]
    #[test_case("=== RUN   TestA\n--- PASS: TestA (-1.00s)\n", "-1.00s" ; "negative")]
    #[test_case("--- FAIL: TestA (1.0.0s)\n", "1.0.0s" ; "two decimal points")]
    fn invalid_duration(output: &str, duration: &str) {
        let err = parse_test_output(output, "suite").expect_err("duration is invalid");
        let ReportParseError::InvalidDuration {
            line_number,
            test_name,
            duration: actual,
        } = err
        else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(line_number, output.lines().count());
        assert_eq!(test_name, "TestA");
        assert_eq!(actual, duration);
    }

    #[test_case("0.01s", Some(Duration::from_millis(10)) ; "go 1.x format")]
    #[test_case("2.50 seconds", Some(Duration::from_millis(2500)) ; "legacy format")]
    #[test_case("12", None ; "missing unit")]
    fn result_durations(text: &str, expected: Option<Duration>) {
        assert_eq!(parse_result_duration(text), expected);
    }
}
