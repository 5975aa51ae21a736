// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::Deserialize;

/// JUnit report configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JunitConfig {
    report_name: String,
    store_success_output: bool,
    store_failure_output: bool,
}

impl JunitConfig {
    pub(in crate::config) fn new(custom: &JunitImpl, default: &JunitImpl) -> Self {
        let report_name = custom
            .report_name
            .as_ref()
            .or(default.report_name.as_ref())
            .expect("junit.report-name present in default config")
            .clone();
        let store_success_output = custom
            .store_success_output
            .or(default.store_success_output)
            .expect("junit.store-success-output present in default config");
        let store_failure_output = custom
            .store_failure_output
            .or(default.store_failure_output)
            .expect("junit.store-failure-output present in default config");

        Self {
            report_name,
            store_success_output,
            store_failure_output,
        }
    }

    /// Returns the name of the JUnit report.
    ///
    /// This is also the name of the test suite that collects tests without a package.
    pub fn report_name(&self) -> &str {
        &self.report_name
    }

    /// Overrides the name of the JUnit report.
    pub fn set_report_name(&mut self, report_name: impl Into<String>) {
        self.report_name = report_name.into();
    }

    /// Returns true if the output of passing tests should be stored.
    pub fn store_success_output(&self) -> bool {
        self.store_success_output
    }

    /// Returns true if the output of failing and skipped tests should be stored.
    pub fn store_failure_output(&self) -> bool {
        self.store_failure_output
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(in crate::config) struct JunitImpl {
    #[serde(default)]
    pub(in crate::config) report_name: Option<String>,
    #[serde(default)]
    store_success_output: Option<bool>,
    #[serde(default)]
    store_failure_output: Option<bool>,
}
