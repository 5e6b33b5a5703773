//! Search types: SearchMatch, SearchOutcome.

use std::ops::Range;

/// A single hit inside the window text, as byte offsets into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    pub start: usize,
    pub len: usize,
}

impl SearchMatch {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// The matched slice of `text`, if `text` is the one searched.
    pub fn as_str<'t>(&self, text: &'t str) -> Option<&'t str> {
        text.get(self.range())
    }
}

/// Result of a read-ahead search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(SearchMatch),
    NotFound,
    /// Stopped by the caller before a match or end of input.
    Canceled,
}

impl SearchOutcome {
    pub fn into_match(self) -> Option<SearchMatch> {
        match self {
            SearchOutcome::Found(m) => Some(m),
            SearchOutcome::NotFound | SearchOutcome::Canceled => None,
        }
    }
}
