//! Fixed-interval polling with an injectable clock and cancellation.
//!
//! `poll_until` re-evaluates a predicate until it holds, the attempt cap is
//! hit, or a shutdown signal arrives. No backoff: every miss waits the same
//! interval.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};

/// Source of delays between poll attempts
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real time, backed by `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` polls forever
    pub max_attempts: Option<u32>,
}

impl PollPolicy {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

/// How a poll loop ended. `attempts` counts predicate evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Ready { attempts: u32 },
    Cancelled { attempts: u32 },
    Exhausted { attempts: u32 },
}

impl PollOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, PollOutcome::Ready { .. })
    }

    pub fn attempts(&self) -> u32 {
        match *self {
            PollOutcome::Ready { attempts }
            | PollOutcome::Cancelled { attempts }
            | PollOutcome::Exhausted { attempts } => attempts,
        }
    }
}

/// Evaluate `check` until it returns `true`.
///
/// A dropped shutdown sender never cancels; the loop then just keeps its
/// interval.
pub async fn poll_until<F, Fut>(
    policy: PollPolicy,
    clock: &dyn Clock,
    shutdown_rx: &mut broadcast::Receiver<()>,
    mut check: F,
) -> PollOutcome
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = bool>,
{
    let mut attempts = 0u32;

    loop {
        match shutdown_rx.try_recv() {
            Ok(()) | Err(broadcast::error::TryRecvError::Lagged(_)) => {
                return PollOutcome::Cancelled { attempts };
            }
            Err(_) => {}
        }

        attempts += 1;
        if check(attempts).await {
            return PollOutcome::Ready { attempts };
        }

        if let Some(max) = policy.max_attempts {
            if attempts >= max {
                return PollOutcome::Exhausted { attempts };
            }
        }

        let cancelled = tokio::select! {
            _ = clock.sleep(policy.interval) => false,
            signal = shutdown_rx.recv() => match signal {
                Err(RecvError::Closed) => {
                    clock.sleep(policy.interval).await;
                    false
                }
                Ok(()) | Err(RecvError::Lagged(_)) => true,
            },
        };

        if cancelled {
            return PollOutcome::Cancelled { attempts };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct CountingClock {
        sleeps: AtomicU32,
    }

    #[async_trait]
    impl Clock for CountingClock {
        async fn sleep(&self, _duration: Duration) {
            self.sleeps.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_ready_after_misses() {
        let clock = CountingClock::default();
        let (_tx, mut rx) = broadcast::channel(1);

        let outcome = poll_until(PollPolicy::default(), &clock, &mut rx, |attempt| async move {
            attempt > 3
        })
        .await;

        assert_eq!(outcome, PollOutcome::Ready { attempts: 4 });
        assert_eq!(clock.sleeps.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_attempt_cap() {
        let clock = CountingClock::default();
        let (_tx, mut rx) = broadcast::channel(1);
        let policy = PollPolicy::default().with_max_attempts(5);

        let outcome = poll_until(policy, &clock, &mut rx, |_| async { false }).await;

        assert_eq!(outcome, PollOutcome::Exhausted { attempts: 5 });
        assert_eq!(clock.sleeps.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_cancelled_before_first_check() {
        let clock = CountingClock::default();
        let (tx, mut rx) = broadcast::channel(1);
        tx.send(()).unwrap();

        let outcome = poll_until(PollPolicy::default(), &clock, &mut rx, |_| async { true }).await;

        assert_eq!(outcome, PollOutcome::Cancelled { attempts: 0 });
    }

    #[tokio::test]
    async fn test_dropped_sender_does_not_cancel() {
        let clock = CountingClock::default();
        let (tx, mut rx) = broadcast::channel::<()>(1);
        drop(tx);

        let outcome = poll_until(PollPolicy::default(), &clock, &mut rx, |attempt| async move {
            attempt == 3
        })
        .await;

        assert_eq!(outcome, PollOutcome::Ready { attempts: 3 });
        assert_eq!(clock.sleeps.load(Ordering::SeqCst), 2);
    }
}
