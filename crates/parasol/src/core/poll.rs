use std::{
    cmp::Ordering,
    collections::binary_heap::BinaryHeap,
    time::{Duration, Instant},
};

use slotmap::SlotMap;
use tracing::trace;

use crate::{OverlayId, TimerId};

/// What happens when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// Close an overlay whose hover region the pointer has left.
    HoverClose(OverlayId),
    /// Unmount an overlay once its exit transition has finished.
    Unmount(OverlayId),
}

/// A timer that is waiting in the heap.
#[derive(Debug)]
struct Pending {
    /// Scheduled time for the timer.
    time: Instant,
    /// Insertion order, so equal deadlines fire first-in first-out.
    seq: u64,
    /// Timer identifier.
    id: TimerId,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl Eq for Pending {}

/// Reverse order so timers with the closest deadline are at the top.
impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reverse order so timers with the closest deadline are at the top.
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A heap of cancelable one-shot timers. Time is supplied by the caller, so
/// the scheduler never reads the clock itself.
#[derive(Debug, Default)]
pub struct Scheduler {
    /// Deadline heap. Cancelled timers stay in the heap until they surface.
    heap: BinaryHeap<Pending>,
    /// Live timers. A heap entry whose id is missing here was cancelled.
    live: SlotMap<TimerId, Timer>,
    /// Next insertion sequence number.
    next_seq: u64,
}

impl Scheduler {
    /// Schedule `timer` to fire `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, timer: Timer) -> TimerId {
        let id = self.live.insert(timer);
        self.heap.push(Pending {
            time: now + delay,
            seq: self.next_seq,
            id,
        });
        self.next_seq += 1;
        trace!(?id, ?timer, ?delay, "timer scheduled");
        id
    }

    /// Cancel a timer. Returns true if it had not yet fired.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let cancelled = self.live.remove(id).is_some();
        if cancelled {
            trace!(?id, "timer cancelled");
        }
        cancelled
    }

    /// Is the timer still waiting to fire?
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.live.contains_key(id)
    }

    /// Number of timers waiting to fire.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Are there no timers waiting?
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Drop cancelled entries from the top of the heap.
    fn prune(&mut self) {
        while let Some(top) = self.heap.peek() {
            if self.live.contains_key(top.id) {
                break;
            }
            self.heap.pop();
        }
    }

    /// The earliest live deadline, if any.
    pub fn next_deadline(&mut self) -> Option<Instant> {
        self.prune();
        self.heap.peek().map(|top| top.time)
    }

    /// Time to wait from `now` until the next deadline. A deadline in the past
    /// yields zero.
    pub fn current_wait(&mut self, now: Instant) -> Option<Duration> {
        self.next_deadline()
            .map(|t| t.checked_duration_since(now).unwrap_or(Duration::ZERO))
    }

    /// Remove and return every timer due at or before `now`, in deadline
    /// order.
    pub fn collect(&mut self, now: Instant) -> Vec<(TimerId, Timer)> {
        let mut due = vec![];
        while let Some(top) = self.heap.pop() {
            if top.time > now {
                // Put it back on the heap.
                self.heap.push(top);
                break;
            }
            if let Some(timer) = self.live.remove(top.id) {
                due.push((top.id, timer));
            }
        }
        due
    }
}
