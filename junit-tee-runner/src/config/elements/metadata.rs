// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use indexmap::IndexMap;
use serde::Deserialize;

/// Run metadata configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MetadataConfig {
    facts: IndexMap<String, String>,
}

impl MetadataConfig {
    // Facts from both sources are kept; on conflict the custom value wins but the default's
    // position is kept.
    pub(in crate::config) fn new(custom: &MetadataImpl, default: &MetadataImpl) -> Self {
        let mut facts = default.facts.clone();
        facts.extend(
            custom
                .facts
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        Self { facts }
    }

    /// Returns the facts to record in the run metadata, in order.
    pub fn facts(&self) -> &IndexMap<String, String> {
        &self.facts
    }

    /// Adds a fact, replacing any existing value for `key`.
    pub fn add_fact(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.facts.insert(key.into(), value.into());
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(in crate::config) struct MetadataImpl {
    #[serde(default)]
    facts: IndexMap<String, String>,
}
