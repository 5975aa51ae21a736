// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Line classification and timestamping for captured output.

use chrono::{DateTime, Utc};
use std::fmt;

/// Prefixes marking a test-framework status line.
///
/// These are matched against the start of a line after trimming surrounding whitespace.
pub const STATUS_LINE_PREFIXES: &[&str] =
    &["--- PASS", "PASS", "--- FAIL", "--- SKIP", "=== CONT", "=== RUN"];

/// The `strftime` format used for log line timestamps, e.g. `2024-01-01T00:00:00`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A source of the current time, used to timestamp log lines.
pub trait Clock: Send + Sync {
    /// Returns the current time in UTC.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// A [`Clock`] backed by the system time.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A [`Clock`] that always returns the same instant.
#[derive(Copy, Clone, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    #[inline]
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The classification of a single captured line.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LineKind {
    /// A test-framework status line, passed through verbatim.
    Status,

    /// Any other non-empty line, prefixed with a timestamp.
    Log,

    /// A line that is empty after trimming whitespace. Dropped.
    Empty,
}

impl LineKind {
    /// Classifies a line (without its trailing newline).
    ///
    /// Only the start of the trimmed line is checked against [`STATUS_LINE_PREFIXES`].
    pub fn classify(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            LineKind::Empty
        } else if STATUS_LINE_PREFIXES
            .iter()
            .any(|prefix| trimmed.starts_with(prefix))
        {
            LineKind::Status
        } else {
            LineKind::Log
        }
    }
}

/// A single line of captured output, along with its classification.
///
/// The [`Display`](fmt::Display) implementation produces the text that is forwarded and
/// accumulated for this line, including the trailing newline.
#[derive(Clone, Debug)]
pub struct CapturedLine<'a> {
    text: &'a str,
    kind: LineKind,
    timestamp: Option<DateTime<Utc>>,
}

impl<'a> CapturedLine<'a> {
    /// Classifies `text`, and stamps it with the current time from `clock` if it is a log line.
    pub fn new(text: &'a str, clock: &dyn Clock) -> Self {
        let kind = LineKind::classify(text);
        let timestamp = (kind == LineKind::Log).then(|| clock.now_utc());
        Self {
            text,
            kind,
            timestamp,
        }
    }

    /// Returns the original, untrimmed text of the line.
    #[inline]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Returns the classification of the line.
    #[inline]
    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Returns the timestamp synthesized for this line, if it's a log line.
    #[inline]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }
}

impl fmt::Display for CapturedLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.timestamp) {
            (LineKind::Empty, _) => Ok(()),
            (LineKind::Log, Some(timestamp)) => {
                writeln!(f, "[{}] {}", timestamp.format(TIMESTAMP_FORMAT), self.text)
            }
            (LineKind::Status | LineKind::Log, _) => writeln!(f, "{}", self.text),
        }
    }
}

/// Splits a byte stream into lines and formats them.
///
/// Reads from a pipe are not line-aligned. The trailing unterminated fragment of each chunk is
/// held back until a later chunk terminates it, so a logical line is always classified as a
/// whole.
#[derive(Debug, Default)]
pub struct LineBuffer {
    partial: Vec<u8>,
}

impl LineBuffer {
    /// Creates a new, empty line buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a chunk of bytes, returning the formatted text for every line it completes.
    pub fn push(&mut self, chunk: &[u8], clock: &dyn Clock) -> String {
        let mut out = String::new();
        let mut rest = chunk;

        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            let (line, tail) = rest.split_at(pos);
            if self.partial.is_empty() {
                format_line_into(line, clock, &mut out);
            } else {
                self.partial.extend_from_slice(line);
                let line = std::mem::take(&mut self.partial);
                format_line_into(&line, clock, &mut out);
            }
            rest = &tail[1..];
        }

        self.partial.extend_from_slice(rest);
        out
    }

    /// Returns true if an unterminated fragment is being held back.
    #[inline]
    pub fn has_partial(&self) -> bool {
        !self.partial.is_empty()
    }

    /// Formats the remaining unterminated fragment, if any, as a final line.
    ///
    /// Called at end of stream.
    pub fn finish(self, clock: &dyn Clock) -> String {
        let mut out = String::new();
        if !self.partial.is_empty() {
            format_line_into(&self.partial, clock, &mut out);
        }
        out
    }
}

fn format_line_into(line: &[u8], clock: &dyn Clock, out: &mut String) {
    use std::fmt::Write as _;

    let text = String::from_utf8_lossy(line);
    // Writing to a String is infallible.
    _ = write!(out, "{}", CapturedLine::new(&text, clock));
}
