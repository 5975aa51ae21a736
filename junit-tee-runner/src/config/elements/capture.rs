// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::Deserialize;

/// Output capture configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CaptureConfig {
    read_buffer_size: usize,
}

impl CaptureConfig {
    pub(in crate::config) fn new(custom: &CaptureImpl, default: &CaptureImpl) -> Self {
        Self {
            read_buffer_size: custom
                .read_buffer_size
                .or(default.read_buffer_size)
                .expect("capture.read-buffer-size present in default config"),
        }
    }

    /// Returns the size of each read from the capture pipes. Always non-zero.
    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(in crate::config) struct CaptureImpl {
    #[serde(default)]
    pub(in crate::config) read_buffer_size: Option<usize>,
}
