// Scheduler - deferred callbacks as data
//
// Recurring animation work (counter ramps, delayed stroke reveals) is expressed
// as tasks placed on a timer queue instead of self-rescheduling closures. The
// queue owns a virtual clock, so the whole page timeline can be driven
// deterministically in tests and paced against real time by the session driver.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

/// Something that can run a task later
pub trait Scheduler<T> {
    /// Current virtual time
    fn now(&self) -> Duration;

    /// Run `task` once `delay` has elapsed from `now()`
    fn schedule(&mut self, delay: Duration, task: T);
}

struct Timer<T> {
    due: Duration,
    /// Insertion order, keeps equal deadlines FIFO
    seq: u64,
    task: T,
}

impl<T> PartialEq for Timer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Timer<T> {}

impl<T> PartialOrd for Timer<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Timer<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want the earliest deadline on top
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Timer queue with a virtual clock starting at zero
pub struct TimerQueue<T> {
    now: Duration,
    next_seq: u64,
    timers: BinaryHeap<Timer<T>>,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            timers: BinaryHeap::new(),
        }
    }

    /// Deadline of the earliest pending task
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.peek().map(|t| t.due)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Pop the earliest task if it is due at or before `until`, moving the
    /// clock to its deadline. Returns `None` once nothing more is due.
    ///
    /// Popping one task at a time lets callers schedule follow-up work that
    /// may itself fall due before `until`.
    pub fn pop_due(&mut self, until: Duration) -> Option<T> {
        if self.next_deadline()? > until {
            return None;
        }
        let timer = self.timers.pop()?;
        self.now = self.now.max(timer.due);
        Some(timer.task)
    }

    /// Move the clock forward without running anything. Never moves backwards.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> for TimerQueue<T> {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, delay: Duration, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            due: self.now + delay,
            seq,
            task,
        });
    }
}
