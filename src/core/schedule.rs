use crate::core::event::Event;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Min-priority queue of predicted events, earliest first.
///
/// Entries are never removed from the interior: superseded predictions stay
/// queued and are rejected by `Event::is_valid` when they surface.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Event>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, ev: Event) {
        self.heap.push(Reverse(ev));
    }

    /// Remove and return the earliest event.
    #[inline]
    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop().map(|Reverse(ev)| ev)
    }

    /// Time of the earliest queued event, stale or not.
    #[inline]
    pub fn peek_time(&self) -> Option<f64> {
        self.heap.peek().map(|Reverse(ev)| ev.time_f64())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
