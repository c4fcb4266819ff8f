//! Cooperative cancellation and progress sampling for long runs.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// One-way cancellation flag checked at stage boundaries.
///
/// `cancel` may be called from any thread; waiters blocked in [`wait`]
/// wake immediately instead of sleeping out their timeout.
///
/// [`wait`]: CancelToken::wait
#[derive(Debug, Default)]
pub struct CancelToken {
    flag: AtomicBool,
    lock: Mutex<()>,
    signal: Condvar,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the token; idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        let guard = match self.lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        drop(guard);
        self.signal.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Sleeps for `timeout` unless cancelled first. Returns whether the
    /// token is cancelled when the call ends.
    pub fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut guard = match self.lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        loop {
            if self.flag.load(Ordering::SeqCst) {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (next, _timed_out) = match self.signal.wait_timeout(guard, deadline - now) {
                Ok(pair) => pair,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard = next;
        }
    }
}

/// Monotonic completed/total counters, safe to sample from any thread.
#[derive(Debug, Default)]
pub struct Progress {
    completed: AtomicUsize,
    total: AtomicUsize,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_total(&self, total: usize) {
        self.total.store(total, Ordering::Relaxed);
    }

    pub(crate) fn record_done(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    pub fn fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.completed() as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn cancel_is_visible_and_idempotent() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn wait_runs_full_timeout_when_not_cancelled() {
        let token = CancelToken::new();
        let started = Instant::now();
        assert!(!token.wait(Duration::from_millis(30)));
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn wait_returns_immediately_when_already_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        let started = Instant::now();
        assert!(token.wait(Duration::from_secs(5)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn wait_is_interrupted_by_concurrent_cancel() {
        let token = CancelToken::new();
        let started = Instant::now();
        thread::scope(|scope| {
            scope.spawn(|| {
                thread::sleep(Duration::from_millis(20));
                token.cancel();
            });
            assert!(token.wait(Duration::from_secs(10)));
        });
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn progress_counts_and_fraction() {
        let progress = Progress::new();
        assert_eq!(progress.fraction(), 0.0);
        progress.set_total(4);
        progress.record_done();
        progress.record_done();
        assert_eq!(progress.completed(), 2);
        assert_eq!(progress.total(), 4);
        assert!((progress.fraction() - 0.5).abs() < f64::EPSILON);
    }
}
