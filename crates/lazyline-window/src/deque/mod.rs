//! Fixed-capacity ring deque backing the sliding window.
//!
//! Holds at most `capacity` elements; once full, each insertion overwrites
//! one element and reports it through [`DequeEvent`](crate::event::DequeEvent).

mod ring;

pub use ring::*;

/// Default deque capacity, matching the default window size.
pub const DEFAULT_CAPACITY: usize = 20;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
