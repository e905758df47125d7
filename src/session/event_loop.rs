use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

/// Timing sources multiplexed onto the cooperative loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoopSource {
    /// Fixed-period animation timer.
    AnimationTick,
    /// Display refresh callback.
    Frame,
}

/// Deterministic single-threaded timer queue.
///
/// Determinism rule: entries fire by due time, and entries due at the same millisecond fire in
/// the order they were scheduled.
#[derive(Debug, Default)]
pub struct EventLoop {
    now_ms: u64,
    seq: u64,
    queue: BinaryHeap<Reverse<(u64, u64, LoopSource)>>,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Move the wall clock forward.
    pub fn advance(&mut self, dt: Duration) {
        self.now_ms = self.now_ms.saturating_add(dt.as_millis() as u64);
    }

    pub fn schedule(&mut self, source: LoopSource, delay: Duration) {
        let due = self.now_ms.saturating_add(delay.as_millis() as u64);
        self.seq += 1;
        self.queue.push(Reverse((due, self.seq, source)));
    }

    /// Drop every pending entry of `source`.
    pub fn cancel(&mut self, source: LoopSource) {
        self.queue.retain(|Reverse((_, _, s))| *s != source);
    }

    pub fn is_pending(&self, source: LoopSource) -> bool {
        self.queue.iter().any(|Reverse((_, _, s))| *s == source)
    }

    /// Next entry due at or before the current time.
    pub fn pop_due(&mut self) -> Option<LoopSource> {
        let Reverse((due, _, _)) = self.queue.peek()?;
        if *due > self.now_ms {
            return None;
        }
        let Reverse((_, _, source)) = self.queue.pop()?;
        Some(source)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/event_loop.rs"]
mod tests;
