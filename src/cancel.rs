//! Cooperative cancellation for builds and queries
//!
//! A `CancelToken` combines an externally triggered flag with an optional
//! deadline. Long-running work polls `check()` at safe points and unwinds
//! with the matching error; nothing is interrupted preemptively.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Why a poll of a `CancelToken` says to stop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interrupt {
    Cancelled,
    DeadlineExceeded,
}

/// Shared cancellation handle. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// A token that never fires unless `cancel()` is called
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that also fires once `timeout` has elapsed from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Signal every holder of this token to stop
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Explicit cancellation wins over an expired deadline
    pub fn check(&self) -> Option<Interrupt> {
        if self.is_cancelled() {
            return Some(Interrupt::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Interrupt::DeadlineExceeded),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_does_not_fire() {
        let token = CancelToken::new();
        assert_eq!(token.check(), None);
        assert!(token.deadline().is_none());
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
        assert_eq!(token.check(), Some(Interrupt::Cancelled));
    }

    #[test]
    fn test_expired_deadline() {
        let token = CancelToken::new().with_deadline(Instant::now() - Duration::from_millis(1));
        assert_eq!(token.check(), Some(Interrupt::DeadlineExceeded));

        token.cancel();
        assert_eq!(token.check(), Some(Interrupt::Cancelled));
    }

    #[test]
    fn test_future_deadline() {
        let token = CancelToken::with_timeout(Duration::from_secs(60));
        assert_eq!(token.check(), None);
    }
}
