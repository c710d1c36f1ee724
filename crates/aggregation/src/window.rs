//! Fixed-capacity circular buffer of the most recent raw values.
//!
//! Holds at most `delta` values. Pushing into a full window overwrites the
//! oldest slot and returns the evicted value; for the aggregation scan this
//! eviction is exactly the `tail > min_timestamp` condition (the window has
//! seen more than `delta` values), so the caller never tracks it
//! separately. `pop_front` drains the remaining values during record
//! finalization.

/// Circular FIFO over the last `capacity` raw values.
#[derive(Debug)]
pub struct SlidingWindow {
    slots: Box<[u16]>,
    /// Index of the oldest value.
    front: usize,
    len: usize,
}

impl SlidingWindow {
    /// Create a window holding at most `capacity` values (`capacity ≥ 1`).
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![0; capacity].into_boxed_slice(),
            front: 0,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Push a value; if the window is full, evict and return the oldest.
    pub fn push(&mut self, value: u16) -> Option<u16> {
        if self.len == self.slots.len() {
            let evicted = self.slots[self.front];
            self.slots[self.front] = value;
            self.front = (self.front + 1) % self.slots.len();
            Some(evicted)
        } else {
            let back = (self.front + self.len) % self.slots.len();
            self.slots[back] = value;
            self.len += 1;
            None
        }
    }

    /// Remove and return the oldest value.
    pub fn pop_front(&mut self) -> Option<u16> {
        if self.len == 0 {
            return None;
        }
        let value = self.slots[self.front];
        self.front = (self.front + 1) % self.slots.len();
        self.len -= 1;
        Some(value)
    }

    /// Drop all values without reallocating.
    pub fn clear(&mut self) {
        self.front = 0;
        self.len = 0;
    }
}
