//! Search engine: pattern compilation, match collection, and the cursor
//! that walks successive matches in the window text.

use std::ops::Range;

use lazyline_common::{LazylineError, Result};
use regex::{Regex, RegexBuilder};

use super::types::SearchMatch;

/// Compile `pattern` case-insensitively with `.` matching line breaks, so a
/// single expression can span the joined lines of the window.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| LazylineError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

/// All non-overlapping matches of `regex` in `text`, scanning from byte
/// offset `start`. Text before `start` still counts as context for anchors
/// and word boundaries.
pub fn find_matches(regex: &Regex, text: &str, start: usize) -> Vec<SearchMatch> {
    let mut matches = Vec::new();
    let mut pos = start;

    while pos <= text.len() {
        let Some(m) = regex.find_at(text, pos) else {
            break;
        };
        matches.push(SearchMatch {
            start: m.start(),
            len: m.len(),
        });

        pos = if m.is_empty() {
            // Step over one character so an empty match cannot repeat.
            match text[m.end()..].chars().next() {
                Some(c) => m.end() + c.len_utf8(),
                None => break,
            }
        } else {
            m.end()
        };
    }
    matches
}

/// Manages the active pattern, the matches found for it, and the cursor.
///
/// `matches` is only ever valid for the text it was computed against; the
/// owner must call [`clear`](Self::clear) whenever that text changes.
#[derive(Debug, Default)]
pub struct SearchState {
    pattern: Option<String>,
    matches: Option<Vec<SearchMatch>>,
    current_index: usize,
}

impl SearchState {
    /// Create a new, empty search state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the next occurrence of `pattern` in `text`.
    ///
    /// Continues an unbroken sequence for the same pattern; otherwise scans
    /// `text` from the start. Reaching the last match does not wrap: the
    /// following call clears the state and reports no match. An empty or
    /// absent pattern clears the state. An invalid pattern is an error and
    /// leaves the state untouched.
    pub fn search(&mut self, pattern: Option<&str>, text: &str) -> Result<Option<SearchMatch>> {
        let Some(pattern) = pattern.filter(|p| !p.is_empty()) else {
            self.clear();
            return Ok(None);
        };

        if self.pattern.as_deref() == Some(pattern) {
            if let Some(matches) = &self.matches {
                let next = self.current_index + 1;
                if let Some(&m) = matches.get(next) {
                    self.current_index = next;
                    return Ok(Some(m));
                }
                self.clear();
                return Ok(None);
            }
        }

        let regex = compile_pattern(pattern)?;
        Ok(self.start(pattern, find_matches(&regex, text, 0)))
    }

    /// Restart the sequence at byte offset `start` of `text` with an
    /// already-compiled `regex`, returning the first match at or after it.
    pub fn anchor(
        &mut self,
        pattern: &str,
        regex: &Regex,
        text: &str,
        start: usize,
    ) -> Option<SearchMatch> {
        self.start(pattern, find_matches(regex, text, start))
    }

    /// [`anchor`](Self::anchor) for a match known to lie in the line
    /// spanning `line` (terminator excluded).
    ///
    /// `^` and `$` only hold at the edges of the whole text, so a line that
    /// matched on its own can yield nothing when scanned in place. The line
    /// is then matched alone and its hits are shifted to `line.start`.
    pub fn anchor_line(
        &mut self,
        pattern: &str,
        regex: &Regex,
        text: &str,
        line: Range<usize>,
    ) -> Option<SearchMatch> {
        let mut matches = find_matches(regex, text, line.start);
        if matches.is_empty() {
            matches = find_matches(regex, &text[line.clone()], 0)
                .into_iter()
                .map(|m| SearchMatch {
                    start: m.start + line.start,
                    len: m.len,
                })
                .collect();
        }
        self.start(pattern, matches)
    }

    /// The match the cursor is on.
    pub fn current(&self) -> Option<SearchMatch> {
        self.matches
            .as_ref()
            .and_then(|m| m.get(self.current_index).copied())
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Matches computed for the current text, if a sequence is in progress.
    pub fn matches(&self) -> Option<&[SearchMatch]> {
        self.matches.as_deref()
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Returns `true` while a sequence is in progress.
    pub fn is_active(&self) -> bool {
        self.matches.is_some()
    }

    /// Reset the search state entirely.
    pub fn clear(&mut self) {
        self.pattern = None;
        self.matches = None;
        self.current_index = 0;
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn start(&mut self, pattern: &str, matches: Vec<SearchMatch>) -> Option<SearchMatch> {
        let Some(&first) = matches.first() else {
            self.clear();
            return None;
        };
        self.pattern = Some(pattern.to_string());
        self.matches = Some(matches);
        self.current_index = 0;
        Some(first)
    }
}
