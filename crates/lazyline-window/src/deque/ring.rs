//! RingDeque: fixed-capacity circular deque with change notifications.

use std::ops::Index;
use std::sync::mpsc;

use crate::event::{DequeEvent, Subscribers};

/// A circular deque that never grows past its capacity.
///
/// Logical index `i` (0 = oldest) lives in slot `(offset + i) % capacity`.
/// Once full, every insertion overwrites exactly one element: `push_back`
/// drops the oldest, `push_front` drops the newest.
#[derive(Debug)]
pub struct RingDeque<T> {
    slots: Vec<Option<T>>,
    /// Slot of logical index 0.
    offset: usize,
    count: usize,
    subscribers: Subscribers<DequeEvent<T>>,
}

impl<T: Clone> RingDeque<T> {
    /// Create an empty deque holding at most `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingDeque capacity must be > 0");
        RingDeque {
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
            offset: 0,
            count: 0,
            subscribers: Subscribers::new(),
        }
    }

    /// Register a listener for structural changes.
    pub fn subscribe(&mut self) -> mpsc::Receiver<DequeEvent<T>> {
        self.subscribers.subscribe()
    }

    /// Maximum number of elements.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of elements currently stored.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the deque holds no elements.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns `true` once the next insertion will evict.
    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    /// Element at logical `index` (`0` = oldest), or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.count {
            self.slots[self.slot(index)].as_ref()
        } else {
            None
        }
    }

    /// Oldest element.
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Newest element.
    pub fn back(&self) -> Option<&T> {
        self.count.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.count).filter_map(move |i| self.slots[self.slot(i)].as_ref())
    }

    /// Append `item` as the newest element, evicting the oldest when full.
    pub fn push_back(&mut self, item: T) {
        let capacity = self.capacity();
        let slot = (self.offset + self.count) % capacity;
        let previous = self.slots[slot].replace(item);

        if self.count == capacity {
            self.offset = (self.offset + 1) % capacity;
            if let Some(evicted) = previous {
                self.notify(|| DequeEvent::Evicted {
                    item: evicted,
                    index: 0,
                });
            }
        } else {
            self.count += 1;
            let count = self.count;
            self.notify(|| DequeEvent::CountChanged(count));
        }

        let index = self.count - 1;
        self.notify_added(slot, index);
    }

    /// Prepend `item` as the oldest element, evicting the newest when full.
    pub fn push_front(&mut self, item: T) {
        let capacity = self.capacity();
        self.offset = (self.offset + capacity - 1) % capacity;
        let slot = self.offset;
        let previous = self.slots[slot].replace(item);

        if self.count == capacity {
            if let Some(evicted) = previous {
                self.notify(|| DequeEvent::Evicted {
                    item: evicted,
                    index: capacity - 1,
                });
            }
        } else {
            self.count += 1;
            let count = self.count;
            self.notify(|| DequeEvent::CountChanged(count));
        }

        self.notify_added(slot, 0);
    }

    /// Remove every element. Silent when already empty.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.offset = 0;

        if self.count > 0 {
            self.count = 0;
            self.notify(|| DequeEvent::CountChanged(0));
            self.notify(|| DequeEvent::Reset);
        }
    }

    /// Swap in the whole state of `other` in one step.
    ///
    /// Listeners of `self` stay registered and see a single `Reset`
    /// (preceded by `CountChanged` when the count differs); listeners of
    /// `other` are dropped with it.
    pub fn replace_all(&mut self, other: RingDeque<T>) {
        let old_count = self.count;
        self.slots = other.slots;
        self.offset = other.offset;
        self.count = other.count;

        if self.count != old_count {
            let count = self.count;
            self.notify(|| DequeEvent::CountChanged(count));
        }
        self.notify(|| DequeEvent::Reset);
    }

    /// Collect the elements oldest to newest.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Consume the deque, yielding its elements oldest to newest.
    pub fn into_vec(mut self) -> Vec<T> {
        let (offset, capacity) = (self.offset, self.capacity());
        (0..self.count)
            .filter_map(|i| self.slots[(offset + i) % capacity].take())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn slot(&self, index: usize) -> usize {
        (self.offset + index) % self.slots.len()
    }

    fn notify_added(&mut self, slot: usize, index: usize) {
        if self.subscribers.is_empty() {
            return;
        }
        if let Some(item) = self.slots[slot].clone() {
            self.subscribers.publish(DequeEvent::Added { item, index });
        }
    }

    /// Build and publish an event only when someone is listening.
    fn notify(&mut self, event: impl FnOnce() -> DequeEvent<T>) {
        if !self.subscribers.is_empty() {
            self.subscribers.publish(event());
        }
    }
}

/// Deep copy with the same capacity and contents, laid out from slot 0.
///
/// The copy starts with no listeners; mutating it never touches `self`.
impl<T: Clone> Clone for RingDeque<T> {
    fn clone(&self) -> Self {
        let mut slots: Vec<Option<T>> = self.iter().cloned().map(Some).collect();
        slots.resize_with(self.capacity(), || None);
        RingDeque {
            slots,
            offset: 0,
            count: self.count,
            subscribers: Subscribers::new(),
        }
    }
}

impl<T: Clone> Index<usize> for RingDeque<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `index >= len()`.
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(item) => item,
            None => panic!(
                "RingDeque index out of range: index {index}, len {}",
                self.count
            ),
        }
    }
}

impl<T: Clone> Default for RingDeque<T> {
    fn default() -> Self {
        RingDeque::new(super::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
impl<T> RingDeque<T> {
    pub(super) fn offset(&self) -> usize {
        self.offset
    }
}
