use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};
use std::time::{Duration, Instant};

/// Handle to a scheduled one-shot timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<T> {
    due: Instant,
    id: TimerId,
    action: T,
}

// Ordered by deadline, then by scheduling order so same-deadline timers
// fire in the order they were set.
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due.cmp(&other.due).then(self.id.0.cmp(&other.id.0))
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Entry<T> {}

/// Fire-and-forget timer queue. Nothing runs on its own: the event loop
/// drains whatever is due between events.
#[derive(Debug)]
pub struct Scheduler<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    cancelled: HashSet<TimerId>,
    next_id: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            cancelled: HashSet::new(),
            next_id: 0,
        }
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, action: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.heap.push(Reverse(Entry {
            due: now + delay,
            id,
            action,
        }));
        id
    }

    /// Cancelling an already fired or unknown timer does nothing.
    pub fn cancel(&mut self, id: TimerId) {
        if self.heap.iter().any(|Reverse(e)| e.id == id) {
            self.cancelled.insert(id);
        }
    }

    /// Removes and returns every action whose deadline is at or before `now`.
    pub fn drain_due(&mut self, now: Instant) -> Vec<T> {
        let mut fired = Vec::new();
        while let Some(Reverse(entry)) = self.heap.peek() {
            if entry.due > now {
                break;
            }
            if let Some(Reverse(entry)) = self.heap.pop() {
                if !self.cancelled.remove(&entry.id) {
                    fired.push(entry.action);
                }
            }
        }
        fired
    }

    /// Earliest deadline among live timers
    pub fn next_due(&self) -> Option<Instant> {
        self.heap
            .iter()
            .filter(|Reverse(e)| !self.cancelled.contains(&e.id))
            .map(|Reverse(e)| e.due)
            .min()
    }

    pub fn len(&self) -> usize {
        self.heap.len() - self.cancelled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
