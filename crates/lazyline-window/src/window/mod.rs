//! The sliding window: a bounded run of consecutive lines from a source,
//! materialized as one text blob that the search engine scans.
//!
//! When the window holds no further match, a read-ahead pulls lines into a
//! private copy of the window until one matches, then commits the copy in
//! a single step.

mod model;
mod read_ahead;
mod types;

pub use model::*;
pub use read_ahead::*;
pub use types::*;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
