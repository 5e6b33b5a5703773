//! ReadAhead: the detachable "read until a line matches" job.

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};

use regex::Regex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::deque::RingDeque;
use crate::source::LineSource;

/// How a read-ahead job ended.
#[derive(Debug)]
pub enum ReadAheadStatus {
    /// The newest line in the buffer matched the pattern on its own.
    Matched,
    /// The source ran dry without a matching line.
    Exhausted,
    /// The token fired between two reads.
    Canceled,
    /// A read failed, or the source panicked; lines read before it are
    /// discarded on commit.
    Failed(io::Error),
}

/// Work detached from a [`WindowModel`](super::WindowModel) by
/// `begin_read_ahead`.
///
/// Owns the source and a private copy of the window, so it can run on a
/// worker thread while the live window stays untouched.
pub struct ReadAhead {
    buffer: RingDeque<String>,
    source: Box<dyn LineSource>,
    last_line_number: i64,
    reference_line: i64,
    pattern: String,
    regex: Regex,
}

/// Everything [`ReadAhead::run`] produced, to be committed by
/// `finish_read_ahead` on the model's owner.
pub struct ReadAheadReport {
    pub(super) buffer: RingDeque<String>,
    pub(super) source: Box<dyn LineSource>,
    pub(super) last_line_number: i64,
    pub(super) reference_line: i64,
    pub(super) pattern: String,
    pub(super) regex: Regex,
    pub(super) status: ReadAheadStatus,
}

impl ReadAhead {
    pub(super) fn new(
        buffer: RingDeque<String>,
        source: Box<dyn LineSource>,
        last_line_number: i64,
        pattern: String,
        regex: Regex,
    ) -> Self {
        ReadAhead {
            buffer,
            source,
            last_line_number,
            reference_line: last_line_number,
            pattern,
            regex,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Read one line at a time, testing each new line alone, until one
    /// matches, the source is exhausted, or `cancel` fires.
    ///
    /// A panic inside the source is caught and reported as
    /// [`ReadAheadStatus::Failed`], so the source always comes back in the
    /// report.
    pub fn run(mut self, cancel: &CancellationToken) -> ReadAheadReport {
        let status = panic::catch_unwind(AssertUnwindSafe(|| self.read_until_match(cancel)))
            .unwrap_or_else(|payload| {
                let message = panic_message(payload.as_ref());
                warn!("line source panicked during read-ahead: {message}");
                ReadAheadStatus::Failed(io::Error::other(format!(
                    "line source panicked: {message}"
                )))
            });

        let lines_read = self.last_line_number - self.reference_line;
        debug!(lines_read, ?status, pattern = %self.pattern, "read-ahead finished");
        ReadAheadReport {
            buffer: self.buffer,
            source: self.source,
            last_line_number: self.last_line_number,
            reference_line: self.reference_line,
            pattern: self.pattern,
            regex: self.regex,
            status,
        }
    }

    fn read_until_match(&mut self, cancel: &CancellationToken) -> ReadAheadStatus {
        loop {
            if cancel.is_cancelled() {
                return ReadAheadStatus::Canceled;
            }
            if self.source.at_end() {
                return ReadAheadStatus::Exhausted;
            }
            match self.source.read_line() {
                Ok(Some(line)) => {
                    let matched = self.regex.is_match(&line);
                    self.buffer.push_back(line);
                    self.last_line_number += 1;
                    if matched {
                        return ReadAheadStatus::Matched;
                    }
                }
                Ok(None) => return ReadAheadStatus::Exhausted,
                Err(err) => return ReadAheadStatus::Failed(err),
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

impl ReadAheadReport {
    pub fn status(&self) -> &ReadAheadStatus {
        &self.status
    }

    /// Lines consumed from the source by the job.
    pub fn lines_read(&self) -> u64 {
        (self.last_line_number - self.reference_line) as u64
    }
}
