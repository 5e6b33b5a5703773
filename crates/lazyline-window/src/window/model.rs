//! WindowModel: the sliding window over a line source.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use encoding_rs::Encoding;
use lazyline_common::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::deque::RingDeque;
use crate::event::{DequeEvent, ModelEvent, ModelProperty, Subscribers};
use crate::search::{compile_pattern, SearchMatch, SearchOutcome, SearchState};
use crate::source::{open_file, LineSource};

use super::read_ahead::{ReadAhead, ReadAheadReport, ReadAheadStatus};
use super::types::LinePosition;

/// Default number of lines held in memory.
pub const MAX_LINES: usize = 20;

/// Appended after every buffered line when materializing the window text.
pub const LINE_TERMINATOR: &str = "\n";

/// A fixed-size window of consecutive lines plus the search over them.
///
/// Line numbers are absolute and 0-based: after opening a source that
/// yields `m <= capacity` lines, `last_line_number() == Some(m - 1)` and
/// `first_line_number() == Some(0)`. An empty source gives `Some(-1)` and
/// `Some(0)`.
pub struct WindowModel {
    lines: RingDeque<String>,
    source: Option<Box<dyn LineSource>>,
    last_line_number: Option<i64>,
    text: String,
    /// Byte offset of each buffered line inside `text`.
    line_starts: Vec<usize>,
    search: SearchState,
    file_path: Option<PathBuf>,
    subscribers: Subscribers<ModelEvent>,
}

impl WindowModel {
    /// Create a model holding at most [`MAX_LINES`] lines.
    pub fn new() -> Self {
        Self::with_capacity(MAX_LINES)
    }

    /// Create a model holding at most `max_lines` lines.
    ///
    /// # Panics
    ///
    /// Panics if `max_lines == 0`.
    pub fn with_capacity(max_lines: usize) -> Self {
        WindowModel {
            lines: RingDeque::new(max_lines),
            source: None,
            last_line_number: None,
            text: String::new(),
            line_starts: Vec::new(),
            search: SearchState::new(),
            file_path: None,
            subscribers: Subscribers::new(),
        }
    }

    /// Listen for property changes.
    pub fn subscribe(&mut self) -> mpsc::Receiver<ModelEvent> {
        self.subscribers.subscribe()
    }

    /// Listen for structural changes of the buffered lines.
    pub fn subscribe_lines(&mut self) -> mpsc::Receiver<DequeEvent<String>> {
        self.lines.subscribe()
    }

    // -----------------------------------------------------------------------
    // Source lifecycle
    // -----------------------------------------------------------------------

    /// Replace the current source with `source` and fill the window from it.
    ///
    /// The previous source and its file path are released first. If the
    /// initial fill fails the new source is released too and the window is
    /// left empty.
    pub fn open(&mut self, source: impl LineSource + 'static) -> Result<()> {
        self.close();
        self.lines.clear();
        self.last_line_number = None;
        if self.file_path.take().is_some() {
            self.notify(ModelProperty::FilePath);
        }

        let mut source: Box<dyn LineSource> = Box::new(source);
        let mut staged = RingDeque::new(self.lines.capacity());
        let filled = read_batch(&mut *source, self.lines.capacity(), &mut staged);

        let count = match filled {
            Ok(count) => count,
            Err(err) => {
                warn!("initial fill failed: {err}");
                self.refresh_text();
                self.notify_line_numbers();
                return Err(err.into());
            }
        };
        for line in staged.into_vec() {
            self.lines.push_back(line);
        }
        let encoding = source.encoding().name();
        self.source = Some(source);
        self.last_line_number = Some(count as i64 - 1);

        self.refresh_text();
        self.notify_line_numbers();
        self.notify(ModelProperty::Encoding);
        info!(lines = count, encoding, "opened source");
        Ok(())
    }

    /// Open the file at `path` (gzip-aware) and remember its path.
    ///
    /// If the file cannot be opened the current window is left untouched.
    pub fn open_path(&mut self, path: &Path) -> Result<()> {
        let source = open_file(path)?;
        self.open(source)?;
        self.file_path = Some(path.to_path_buf());
        self.notify(ModelProperty::FilePath);
        Ok(())
    }

    /// Append up to `count` more lines, evicting the oldest as needed.
    ///
    /// Returns how many lines were read. A no-op without an open source or
    /// at end of stream. Lines are staged in a deque of the window's
    /// capacity, so only the newest `capacity` of them are ever held.
    ///
    /// On a read error nothing is appended, but the source has still moved
    /// past the lines read before the error: from then on line numbers lag
    /// behind the true position in the source.
    pub fn read_next(&mut self, count: usize) -> Result<usize> {
        let Some(source) = self.source.as_mut() else {
            return Ok(0);
        };
        if source.at_end() {
            return Ok(0);
        }

        let mut staged = RingDeque::new(self.lines.capacity());
        let read = read_batch(&mut **source, count, &mut staged)?;
        if read == 0 {
            return Ok(0);
        }
        for line in staged.into_vec() {
            self.lines.push_back(line);
        }
        self.last_line_number = self.last_line_number.map(|last| last + read as i64);

        self.refresh_text();
        self.notify_line_numbers();
        debug!(read, last = ?self.last_line_number, "read next lines");
        Ok(read)
    }

    /// Release the source. Buffered lines and text stay viewable.
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            info!("closed source");
            self.notify(ModelProperty::EndOfStream);
            self.notify(ModelProperty::Encoding);
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Buffered lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(String::as_str)
    }

    /// Buffered line at window `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn line(&self, index: usize) -> &str {
        &self.lines[index]
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lines.capacity()
    }

    /// All buffered lines, each followed by [`LINE_TERMINATOR`].
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Absolute number of the most recently read line; `None` before the
    /// first successful open.
    pub fn last_line_number(&self) -> Option<i64> {
        self.last_line_number
    }

    /// Absolute number of the oldest buffered line.
    pub fn first_line_number(&self) -> Option<i64> {
        self.last_line_number
            .map(|last| last - self.lines.len() as i64 + 1)
    }

    /// `true` iff a source is open and has no more lines.
    pub fn is_end_of_stream(&self) -> bool {
        self.source.as_ref().is_some_and(|s| s.at_end())
    }

    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    /// Encoding of the open source.
    pub fn encoding(&self) -> Option<&'static Encoding> {
        self.source.as_ref().map(|s| s.encoding())
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    /// Map a byte offset in [`text`](Self::text) to an absolute line number
    /// and a byte column within that line.
    pub fn locate(&self, offset: usize) -> Option<LinePosition> {
        if offset >= self.text.len() {
            return None;
        }
        let index = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let first = self.first_line_number()?;
        Some(LinePosition {
            line_number: first + index as i64,
            column: offset - self.line_starts[index],
        })
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Next occurrence of `pattern` in the current window, reading nothing.
    ///
    /// See [`SearchState::search`]. Before any source has been opened this
    /// clears the search and reports no match.
    pub fn search(&mut self, pattern: Option<&str>) -> Result<Option<SearchMatch>> {
        if self.last_line_number.is_none() {
            self.search.clear();
            return Ok(None);
        }
        let found = self.search.search(pattern, &self.text)?;
        debug!(?pattern, ?found, index = self.search.current_index(), "search");
        Ok(found)
    }

    /// Read forward until a line matches `pattern`, then report the match.
    pub fn read_and_search(&mut self, pattern: Option<&str>) -> Result<Option<SearchMatch>> {
        let outcome = self.read_and_search_cancelable(pattern, &CancellationToken::new())?;
        Ok(outcome.into_match())
    }

    /// [`read_and_search`](Self::read_and_search) that stops between line
    /// reads once `cancel` fires, keeping the lines read so far.
    pub fn read_and_search_cancelable(
        &mut self,
        pattern: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome> {
        let Some(job) = self.begin_read_ahead(pattern)? else {
            return Ok(SearchOutcome::NotFound);
        };
        let report = job.run(cancel);
        self.finish_read_ahead(report)
    }

    /// Detach a read-ahead job that can run on another thread.
    ///
    /// The job takes the source and a copy of the window; the model must not
    /// be read from again until the report is handed to
    /// [`finish_read_ahead`](Self::finish_read_ahead). Returns `None` (and
    /// clears the search) when no source is open or `pattern` is empty.
    pub fn begin_read_ahead(&mut self, pattern: Option<&str>) -> Result<Option<ReadAhead>> {
        let pattern = match pattern.filter(|p| !p.is_empty()) {
            Some(p) if self.source.is_some() => p,
            _ => {
                self.search.clear();
                return Ok(None);
            }
        };
        let regex = compile_pattern(pattern)?;

        let (Some(source), Some(last_line_number)) = (self.source.take(), self.last_line_number)
        else {
            self.search.clear();
            return Ok(None);
        };

        Ok(Some(ReadAhead::new(
            self.lines.clone(),
            source,
            last_line_number,
            pattern.to_string(),
            regex,
        )))
    }

    /// Commit a finished read-ahead job in one step and resolve its match.
    ///
    /// Lines read before a match, the end of input, or cancellation are kept.
    /// On a read error the window stays as it was and the error is returned;
    /// as with [`read_next`](Self::read_next), the discarded lines are gone
    /// from the source and later line numbers lag behind by that many.
    pub fn finish_read_ahead(&mut self, report: ReadAheadReport) -> Result<SearchOutcome> {
        let ReadAheadReport {
            buffer,
            source,
            last_line_number,
            reference_line,
            pattern,
            regex,
            status,
        } = report;
        self.source = Some(source);

        if let ReadAheadStatus::Failed(err) = status {
            warn!("read-ahead failed: {err}");
            return Err(err.into());
        }

        self.lines.replace_all(buffer);
        self.last_line_number = Some(last_line_number);
        self.refresh_text();
        self.notify_line_numbers();

        let outcome = match status {
            ReadAheadStatus::Matched => {
                let evicted_reference = self
                    .first_line_number()
                    .is_some_and(|first| reference_line < first);

                let newest = self.newest_line();
                let rescanned = if evicted_reference {
                    self.search.search(Some(pattern.as_str()), &self.text)?
                } else {
                    None
                };
                rescanned
                    .or_else(|| {
                        let line = newest?;
                        self.search.anchor_line(&pattern, &regex, &self.text, line)
                    })
                    .map_or(SearchOutcome::NotFound, SearchOutcome::Found)
            }
            ReadAheadStatus::Canceled => SearchOutcome::Canceled,
            ReadAheadStatus::Exhausted | ReadAheadStatus::Failed(_) => SearchOutcome::NotFound,
        };

        info!(
            last = last_line_number,
            reference = reference_line,
            ?outcome,
            "read-ahead committed"
        );
        Ok(outcome)
    }

    /// Give up on a read-ahead whose report never came back (its worker
    /// died). The source went down with the job, so the model is closed;
    /// buffered lines stay viewable.
    pub fn abandon_read_ahead(&mut self) {
        if self.source.is_some() {
            return;
        }
        warn!(last = ?self.last_line_number, "read-ahead lost the source, closing");
        self.search.clear();
        self.notify(ModelProperty::EndOfStream);
        self.notify(ModelProperty::Encoding);
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    /// Byte range of the newest buffered line in `text`, terminator excluded.
    fn newest_line(&self) -> Option<Range<usize>> {
        let start = *self.line_starts.last()?;
        Some(start..self.text.len() - LINE_TERMINATOR.len())
    }

    /// Rebuild the text from the buffer; any search sequence is void.
    fn refresh_text(&mut self) {
        let size: usize = self
            .lines
            .iter()
            .map(|line| line.len() + LINE_TERMINATOR.len())
            .sum();
        let mut text = String::with_capacity(size);
        self.line_starts.clear();

        for line in self.lines.iter() {
            self.line_starts.push(text.len());
            text.push_str(line);
            text.push_str(LINE_TERMINATOR);
        }

        self.text = text;
        self.search.clear();
        self.notify(ModelProperty::Text);
    }

    fn notify_line_numbers(&mut self) {
        self.notify(ModelProperty::LastLineNumber);
        self.notify(ModelProperty::FirstLineNumber);
        self.notify(ModelProperty::EndOfStream);
    }

    fn notify(&mut self, property: ModelProperty) {
        self.subscribers
            .publish(ModelEvent::PropertyChanged(property));
    }
}

impl Default for WindowModel {
    fn default() -> Self {
        WindowModel::new()
    }
}

/// Read up to `limit` lines into `staged`, stopping early at end of stream.
/// Returns how many were read; `staged` keeps only the newest of them.
fn read_batch(
    source: &mut dyn LineSource,
    limit: usize,
    staged: &mut RingDeque<String>,
) -> std::io::Result<usize> {
    let mut read = 0;
    while read < limit && !source.at_end() {
        match source.read_line()? {
            Some(line) => {
                staged.push_back(line);
                read += 1;
            }
            None => break,
        }
    }
    Ok(read)
}
