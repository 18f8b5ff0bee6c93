//! Periodic refresh timer.
//!
//! At most one timer is armed at a time: arming always cancels the previous
//! one first. Each arming gets a new epoch, and every tick carries the epoch
//! it came from, so the receiver can discard ticks that were already queued
//! when the timer was cancelled.

use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
struct Armed {
    epoch: u64,
    token: CancellationToken,
}

/// Shortest period a timer will run with.
pub const MIN_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct RefreshScheduler {
    period: Duration,
    armed: Option<Armed>,
    epochs: u64,
}

impl RefreshScheduler {
    /// Periods below [`MIN_PERIOD`] are raised to it.
    pub fn new(period: Duration) -> Self {
        let period = if period < MIN_PERIOD {
            tracing::warn!(
                requested_secs = period.as_secs_f64(),
                "Refresh period too short, using {}s",
                MIN_PERIOD.as_secs()
            );
            MIN_PERIOD
        } else {
            period
        };
        Self {
            period,
            armed: None,
            epochs: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Arm the timer. `on_tick` runs once per period, first one period from
    /// now, until the timer is cancelled or `on_tick` returns false.
    ///
    /// Must be called from within a tokio runtime. Returns the new epoch.
    pub fn arm<F>(&mut self, mut on_tick: F) -> u64
    where
        F: FnMut(u64) -> bool + Send + 'static,
    {
        self.cancel();

        self.epochs += 1;
        let epoch = self.epochs;
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let period = self.period;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            // A stalled loop does not get a burst of catch-up ticks.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        if !on_tick(epoch) {
                            break;
                        }
                    }
                }
            }
            tracing::trace!(epoch, "Refresh timer stopped");
        });

        tracing::debug!(epoch, period_secs = period.as_secs_f64(), "Refresh timer armed");
        self.armed = Some(Armed { epoch, token });
        epoch
    }

    /// Cancel the armed timer, if any. Returns whether one was armed.
    pub fn cancel(&mut self) -> bool {
        match self.armed.take() {
            Some(armed) => {
                armed.token.cancel();
                tracing::debug!(epoch = armed.epoch, "Refresh timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Whether a tick stamped with `epoch` comes from the armed timer.
    pub fn is_current(&self, epoch: u64) -> bool {
        self.armed.as_ref().is_some_and(|armed| armed.epoch == epoch)
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
