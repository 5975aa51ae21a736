// Copyright (c) The junit-tee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::line::{Clock, LineBuffer, SystemClock};
use crate::errors::CaptureError;
use std::{
    fmt,
    io::{self, PipeReader, PipeWriter, Read, Write},
    panic::{self, AssertUnwindSafe},
    process::Stdio,
    sync::{Mutex, PoisonError},
    thread,
};
use tracing::debug;

/// The default size of each read from a capture pipe.
///
/// This is the (normal) page size on most Linux, Windows and macOS systems.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4 * 1024;

/// One of the two captured standard streams.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CaptureStream {
    /// Standard output.
    Stdout,

    /// Standard error.
    Stderr,
}

impl fmt::Display for CaptureStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureStream::Stdout => write!(f, "stdout"),
            CaptureStream::Stderr => write!(f, "stderr"),
        }
    }
}

/// The write ends of the capture pipes, handed to the unit of work.
///
/// Everything written to these is captured. Dropping them (or handing them to a child process that
/// then exits) signals end-of-stream to the forwarders.
#[derive(Debug)]
pub struct CaptureStreams {
    /// The destination standing in for standard output.
    pub stdout: PipeWriter,

    /// The destination standing in for standard error.
    pub stderr: PipeWriter,
}

impl CaptureStreams {
    /// Converts the streams into [`Stdio`] values suitable for a child process's stdout and stderr.
    pub fn into_stdio(self) -> (Stdio, Stdio) {
        (Stdio::from(self.stdout), Stdio::from(self.stderr))
    }
}

/// The result of a captured unit of work.
#[derive(Clone, Debug)]
pub struct CapturedRun<T> {
    /// The value returned by the unit of work.
    pub value: T,

    /// The combined, formatted output of both streams, in the order it was read.
    pub output: String,
}

/// Captures everything a unit of work writes to a pair of output streams.
///
/// For each stream, a forwarding thread reads from a pipe, formats the output line by line (see
/// [`LineBuffer`]), writes it to the live destination and appends it to a combined buffer.
pub struct OutputCapture<C = SystemClock> {
    clock: C,
    read_buffer_size: usize,
}

impl Default for OutputCapture<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputCapture<SystemClock> {
    /// Creates a new capture that timestamps log lines with the system clock.
    pub fn new() -> Self {
        Self {
            clock: SystemClock,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl<C: Clock> OutputCapture<C> {
    /// Uses the given clock to timestamp log lines.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> OutputCapture<C2> {
        OutputCapture {
            clock,
            read_buffer_size: self.read_buffer_size,
        }
    }

    /// Sets the size of each read from the capture pipes.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        assert!(size > 0, "read buffer size must be non-zero");
        self.read_buffer_size = size;
        self
    }

    /// Runs `work` with its output captured.
    ///
    /// Output written to the [`CaptureStreams`] passed to `work` is formatted and forwarded to
    /// `stdout` and `stderr` as it arrives. This call returns once `work` has returned *and* both
    /// streams have been closed and fully drained.
    ///
    /// If `work` panics, both forwarders are still drained and joined before the panic is
    /// resumed.
    pub fn run<F, T>(
        &self,
        stdout: &mut (dyn Write + Send),
        stderr: &mut (dyn Write + Send),
        work: F,
    ) -> Result<CapturedRun<T>, CaptureError>
    where
        F: FnOnce(CaptureStreams) -> T,
    {
        let (stdout_reader, stdout_writer) =
            io::pipe().map_err(|error| CaptureError::PipeCreate {
                stream: CaptureStream::Stdout,
                error,
            })?;
        let (stderr_reader, stderr_writer) =
            io::pipe().map_err(|error| CaptureError::PipeCreate {
                stream: CaptureStream::Stderr,
                error,
            })?;
        let streams = CaptureStreams {
            stdout: stdout_writer,
            stderr: stderr_writer,
        };

        let combined = Mutex::new(String::new());

        let (value, stdout_res, stderr_res) = thread::scope(|s| {
            let stdout_forwarder = Forwarder {
                stream: CaptureStream::Stdout,
                clock: &self.clock,
                combined: &combined,
                read_buffer_size: self.read_buffer_size,
            };
            let stderr_forwarder = Forwarder {
                stream: CaptureStream::Stderr,
                ..stdout_forwarder
            };

            let stdout_handle = s.spawn(move || stdout_forwarder.forward(stdout_reader, stdout));
            let stderr_handle = s.spawn(move || stderr_forwarder.forward(stderr_reader, stderr));

            // `streams` is moved into `work`, so the write ends are closed when it returns or
            // unwinds.
            let value = panic::catch_unwind(AssertUnwindSafe(|| work(streams)));
            debug!("unit of work finished, draining capture pipes");

            let stdout_res = stdout_handle.join();
            let stderr_res = stderr_handle.join();
            (value, stdout_res, stderr_res)
        });

        let value = value.unwrap_or_else(|payload| panic::resume_unwind(payload));
        let stdout_res = stdout_res.unwrap_or_else(|payload| panic::resume_unwind(payload));
        let stderr_res = stderr_res.unwrap_or_else(|payload| panic::resume_unwind(payload));
        stdout_res?;
        stderr_res?;

        let output = combined
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(CapturedRun { value, output })
    }
}

impl<C: fmt::Debug> fmt::Debug for OutputCapture<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputCapture")
            .field("clock", &self.clock)
            .field("read_buffer_size", &self.read_buffer_size)
            .finish()
    }
}

#[derive(Copy, Clone)]
struct Forwarder<'a> {
    stream: CaptureStream,
    clock: &'a dyn Clock,
    combined: &'a Mutex<String>,
    read_buffer_size: usize,
}

impl Forwarder<'_> {
    // On error, the read end is dropped on return. Anything still writing to the pipe then gets
    // EPIPE rather than blocking forever.
    fn forward(
        self,
        mut reader: PipeReader,
        live: &mut (dyn Write + Send),
    ) -> Result<(), CaptureError> {
        let mut buf = vec![0u8; self.read_buffer_size];
        let mut lines = LineBuffer::new();
        let mut bytes_read = 0usize;

        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => {
                    return Err(CaptureError::Read {
                        stream: self.stream,
                        error,
                    });
                }
            };
            bytes_read += n;

            let formatted = lines.push(&buf[..n], self.clock);
            self.emit(&formatted, live)?;
        }

        let formatted = lines.finish(self.clock);
        self.emit(&formatted, live)?;

        debug!(stream = %self.stream, bytes_read, "capture stream closed");
        Ok(())
    }

    fn emit(&self, formatted: &str, live: &mut (dyn Write + Send)) -> Result<(), CaptureError> {
        if formatted.is_empty() {
            return Ok(());
        }

        live.write_all(formatted.as_bytes())
            .and_then(|()| live.flush())
            .map_err(|error| CaptureError::Write {
                stream: self.stream,
                error,
            })?;

        self.combined
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(formatted);
        Ok(())
    }
}
