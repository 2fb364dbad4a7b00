//! Step barrier.
//!
//! Releases when all N workers have reported for the current cycle, or
//! when the deadline passes. `worker_done` is idempotent within a cycle
//! and safe to call from any thread; `reset` arms the next cycle.

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

struct Slots {
    done: Vec<bool>,
    ok: Vec<bool>,
    arrived: usize,
}

pub struct StepBarrier {
    expected: usize,
    slots: Mutex<Slots>,
    released: Condvar,
}

impl StepBarrier {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            slots: Mutex::new(Slots {
                done: vec![false; expected],
                ok: vec![false; expected],
                arrived: 0,
            }),
            released: Condvar::new(),
        }
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Record worker k's completion for this cycle. A second call for the
    /// same k in the same cycle is silently ignored; out-of-range ids are
    /// dropped.
    pub fn worker_done(&self, k: usize, ok: bool) {
        let mut slots = self.lock();
        if k >= self.expected || slots.done[k] {
            return;
        }
        slots.done[k] = true;
        slots.ok[k] = ok;
        slots.arrived += 1;
        if slots.arrived == self.expected {
            self.released.notify_all();
        }
    }

    /// Block until all workers have reported or the deadline elapses.
    /// Returns true iff everyone arrived in time.
    pub fn wait_for_all(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut slots = self.lock();
        while slots.arrived < self.expected {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _timed_out) = self
                .released
                .wait_timeout(slots, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            slots = guard;
            // Loop re-checks: spurious wakeups fall through harmlessly.
        }
        true
    }

    /// Whether every worker reported ok this cycle. Only meaningful in
    /// quiescent state (after `wait_for_all` has returned).
    pub fn all_succeeded(&self) -> bool {
        let slots = self.lock();
        slots.arrived == self.expected && slots.ok.iter().all(|&ok| ok)
    }

    /// Arm the next cycle.
    pub fn reset(&self) {
        let mut slots = self.lock();
        slots.done.iter_mut().for_each(|d| *d = false);
        slots.ok.iter_mut().for_each(|o| *o = false);
        slots.arrived = 0;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn releases_when_all_report() {
        let barrier = StepBarrier::new(3);
        barrier.worker_done(0, true);
        barrier.worker_done(1, true);
        barrier.worker_done(2, true);
        assert!(barrier.wait_for_all(Duration::from_millis(10)));
        assert!(barrier.all_succeeded());
    }

    #[test]
    fn times_out_when_one_is_missing() {
        let barrier = StepBarrier::new(3);
        barrier.worker_done(0, true);
        barrier.worker_done(1, true);
        let start = Instant::now();
        assert!(!barrier.wait_for_all(Duration::from_millis(200)));
        assert!(start.elapsed() >= Duration::from_millis(200));
        assert!(!barrier.all_succeeded());
    }

    #[test]
    fn reset_rearms_the_cycle() {
        let barrier = StepBarrier::new(3);
        barrier.worker_done(0, true);
        barrier.worker_done(1, true);
        assert!(!barrier.wait_for_all(Duration::from_millis(50)));
        assert!(!barrier.all_succeeded());

        barrier.reset();
        for k in 0..3 {
            barrier.worker_done(k, true);
        }
        assert!(barrier.wait_for_all(Duration::from_millis(50)));
        assert!(barrier.all_succeeded());
    }

    #[test]
    fn duplicate_reports_are_ignored() {
        let barrier = StepBarrier::new(2);
        barrier.worker_done(0, true);
        barrier.worker_done(0, true);
        barrier.worker_done(0, false); // must not overwrite the first
        assert!(!barrier.wait_for_all(Duration::from_millis(20)));
        barrier.worker_done(1, true);
        assert!(barrier.wait_for_all(Duration::from_millis(20)));
        assert!(barrier.all_succeeded());
    }

    #[test]
    fn failed_worker_flips_all_succeeded() {
        let barrier = StepBarrier::new(2);
        barrier.worker_done(0, true);
        barrier.worker_done(1, false);
        assert!(barrier.wait_for_all(Duration::from_millis(20)));
        assert!(!barrier.all_succeeded());
    }

    #[test]
    fn out_of_range_worker_is_dropped() {
        let barrier = StepBarrier::new(1);
        barrier.worker_done(5, true);
        assert!(!barrier.wait_for_all(Duration::from_millis(20)));
    }

    #[test]
    fn concurrent_reports_release_a_waiting_thread() {
        let barrier = Arc::new(StepBarrier::new(8));
        let waiter = {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || barrier.wait_for_all(Duration::from_secs(5)))
        };
        let mut workers = Vec::new();
        for k in 0..8 {
            let barrier = Arc::clone(&barrier);
            workers.push(thread::spawn(move || {
                barrier.worker_done(k, true);
                // Hammer the idempotent path concurrently.
                barrier.worker_done(k, false);
            }));
        }
        for w in workers {
            w.join().expect("worker thread");
        }
        assert!(waiter.join().expect("waiter thread"));
        assert!(barrier.all_succeeded());
    }
}
