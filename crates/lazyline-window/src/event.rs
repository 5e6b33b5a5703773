//! Change notifications published by the ring deque and the window model.
//!
//! @module event

use std::sync::mpsc;

// =============================================================================
// TYPES
// =============================================================================

/// A structural change to a [`RingDeque`](crate::deque::RingDeque).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DequeEvent<T> {
    /// `item` now lives at logical `index`.
    Added { item: T, index: usize },
    /// `item` was overwritten; it used to live at logical `index`.
    Evicted { item: T, index: usize },
    /// Every position may have changed (clear or wholesale replacement).
    Reset,
    /// The element count changed to the carried value.
    CountChanged(usize),
}

/// A derived property of the window model that may need redisplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelProperty {
    Text,
    LastLineNumber,
    FirstLineNumber,
    EndOfStream,
    Encoding,
    FilePath,
}

/// Notification published by the window model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    PropertyChanged(ModelProperty),
}

// =============================================================================
// SUBSCRIBERS
// =============================================================================

/// Fan-out list of mpsc senders.
///
/// Publishing never blocks and never fails: senders whose receiver has been
/// dropped are pruned on the next publish.
pub struct Subscribers<E> {
    senders: Vec<mpsc::Sender<E>>,
}

impl<E: Clone> Subscribers<E> {
    pub fn new() -> Self {
        Self {
            senders: Vec::new(),
        }
    }

    /// Register a new listener and return its receiving end.
    pub fn subscribe(&mut self) -> mpsc::Receiver<E> {
        let (sender, receiver) = mpsc::channel();
        self.senders.push(sender);
        receiver
    }

    /// Deliver `event` to every live listener. Returns how many received it.
    pub fn publish(&mut self, event: E) -> usize {
        if self.senders.is_empty() {
            return 0;
        }
        self.senders.retain(|s| s.send(event.clone()).is_ok());
        self.senders.len()
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}

impl<E: Clone> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.senders.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
