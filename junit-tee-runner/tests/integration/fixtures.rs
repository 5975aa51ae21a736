// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8Path;
use chrono::{TimeZone, Utc};
use junit_tee_runner::{
    capture::{FixedClock, OutputCapture},
    config::{ConfigOverrides, TeeConfig},
    runner::{TestCommand, TestRunner},
};

/// A script that prints `go test -v` output for one package, with a failing test, a skipped test
/// and log lines on both streams.
pub(crate) static GO_TEST_SCRIPT: &str = r#"
echo '=== RUN   TestInstall'
echo 'installing operator'
echo '--- PASS: TestInstall (1.25s)'
echo '=== RUN   TestUpgrade'
echo '    upgrade_test.go:42: subscription never became ready' >&2
echo '--- FAIL: TestUpgrade (3.00s)'
echo '=== RUN   TestUninstall'
echo '--- SKIP: TestUninstall (0.00s)'
echo 'FAIL'
printf 'FAIL\tgithub.com/org/operator/test/functional\t4.300s\n'
exit 1
"#;

pub(crate) fn fixed_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
}

pub(crate) fn sh_runner(script: &str) -> TestRunner<FixedClock> {
    let command = TestCommand::new("sh", ["-c", script]);
    TestRunner::new(command, OutputCapture::new().with_clock(fixed_clock()))
}

pub(crate) fn config_for(results_dir: &Utf8Path, report_name: &str) -> TeeConfig {
    let mut config = TeeConfig::default();
    config.apply_overrides(ConfigOverrides {
        results_dir: Some(results_dir.to_owned()),
        report_name: Some(report_name.to_owned()),
        facts: vec![("cluster".to_owned(), "ci-3".to_owned())],
    });
    config
}
