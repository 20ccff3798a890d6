//! Cancellable deadline queue.
//!
//! The host event loop is single-threaded: nothing here runs on its own.
//! Owners call `drain_due(now)` from their frame/timer callback and act on
//! whatever expired. A cancelled entry is never yielded, which is what makes
//! teardown safe against late callbacks.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

#[derive(Debug)]
struct Entry<T> {
    at: f64,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max-heap pops the earliest deadline first; ties fire in
    // scheduling order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .at
            .total_cmp(&self.at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    live: HashSet<u64>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: HashSet::new(),
            next_seq: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to become due at absolute time `at` (ms).
    pub fn schedule(&mut self, at: f64, payload: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.heap.push(Entry { at, seq, payload });
        self.live.insert(seq);
        TimerId(seq)
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id.0)
    }

    #[inline]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.live.contains(&id.0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Earliest live deadline, discarding cancelled heads on the way.
    pub fn next_deadline(&mut self) -> Option<f64> {
        while let Some(top) = self.heap.peek() {
            if self.live.contains(&top.seq) {
                return Some(top.at);
            }
            self.heap.pop();
        }
        None
    }

    /// Pop every live entry with `at <= now`, earliest first.
    pub fn drain_due(&mut self, now: f64) -> Vec<(TimerId, T)> {
        let mut due = Vec::new();
        while let Some(top) = self.heap.peek() {
            if top.at > now {
                break;
            }
            if let Some(entry) = self.heap.pop() {
                if self.live.remove(&entry.seq) {
                    due.push((TimerId(entry.seq), entry.payload));
                }
            }
        }
        due
    }

    /// Drop every pending entry.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.live.clear();
    }
}
