// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Facts about a single captured test run, written out as JSON next to the JUnit report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunMetadata {
    /// The name of the JUnit report generated for this run.
    pub report_name: String,

    /// The test command, as a list of arguments.
    pub command: Vec<String>,

    /// The time at which the test command was started.
    pub started_at: DateTime<FixedOffset>,

    /// The wall-clock duration of the run, in seconds.
    pub duration_secs: f64,

    /// The exit code reported by the test command.
    pub exit_code: i32,

    /// Test counts, if the captured output could be parsed into a report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_counts: Option<TestCounts>,

    /// Free-form key/value facts provided through configuration or the command line.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub facts: IndexMap<String, String>,
}

impl RunMetadata {
    /// Returns the metadata serialized as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Counts of test outcomes in a run.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestCounts {
    /// The total number of tests seen.
    pub tests: usize,

    /// The number of tests that failed.
    pub failures: usize,

    /// The number of tests that were skipped.
    pub skipped: usize,
}

impl TestCounts {
    /// Returns the number of tests that passed.
    pub fn passed(&self) -> usize {
        self.tests.saturating_sub(self.failures + self.skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn sample() -> RunMetadata {
        RunMetadata {
            report_name: "my-suite".to_owned(),
            command: vec!["go".to_owned(), "test".to_owned(), "-v".to_owned()],
            started_at: DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00")
                .expect("valid timestamp"),
            duration_secs: 1.5,
            exit_code: 0,
            test_counts: None,
            facts: IndexMap::new(),
        }
    }

    #[test]
    fn serializes_with_kebab_case_keys() {
        let json = sample().to_json_pretty().expect("serialization succeeds");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");

        assert_eq!(value["report-name"], "my-suite");
        assert_eq!(value["exit-code"], 0);
        // A zero offset is written as `Z`.
        assert_eq!(value["started-at"], "2024-01-01T00:00:00Z");
        // Empty optional fields are omitted.
        assert!(value.get("test-counts").is_none());
        assert!(value.get("facts").is_none());
    }

    #[test]
    fn facts_keep_insertion_order() {
        let mut metadata = sample();
        metadata.facts.insert("zone".to_owned(), "us-east-1".to_owned());
        metadata.facts.insert("cluster".to_owned(), "ci-3".to_owned());
        metadata.test_counts = Some(TestCounts {
            tests: 5,
            failures: 1,
            skipped: 2,
        });

        let json = metadata.to_json_pretty().expect("serialization succeeds");
        let zone = json.find("zone").expect("zone present");
        let cluster = json.find("cluster").expect("cluster present");
        assert!(zone < cluster, "facts are written in insertion order");

        let parsed: RunMetadata = serde_json::from_str(&json).expect("round trips");
        assert_eq!(parsed, metadata);
        assert_eq!(parsed.test_counts.map(|counts| counts.passed()), Some(2));
    }

    #[test_case(0, 0, 0, 0 ; "empty run")]
    #[test_case(5, 0, 0, 5 ; "all passed")]
    #[test_case(5, 1, 2, 2 ; "mixed")]
    #[test_case(3, 3, 0, 0 ; "all failed")]
    fn passed_count(tests: usize, failures: usize, skipped: usize, expected: usize) {
        let counts = TestCounts {
            tests,
            failures,
            skipped,
        };
        assert_eq!(counts.passed(), expected);
    }
}
