//! Sliding-window call-rate limiter shared by every gated X API call site.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Allows at most `max_calls` acquisitions within any trailing `period`.
///
/// The prune, check, wait, and record steps run under one async mutex, so
/// callers sharing a limiter (through an `Arc`) are serialized and no two of
/// them can take the last free slot. A caller that has to wait keeps the lock
/// while it sleeps; later callers queue behind it.
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    period: Duration,
    calls: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(max_calls: usize, period: Duration) -> Self {
        Self {
            max_calls,
            period,
            calls: Mutex::new(VecDeque::with_capacity(max_calls)),
        }
    }

    #[must_use]
    pub fn max_calls(&self) -> usize {
        self.max_calls
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait for a free slot and record a call at the current instant.
    ///
    /// Returns immediately while fewer than `max_calls` calls fall inside
    /// the trailing window. Otherwise sleeps until the oldest one leaves
    /// the window. A timestamp exactly `period` old counts as expired.
    /// With `max_calls == 0` this never returns.
    pub async fn acquire_slot(&self) {
        let mut calls = self.calls.lock().await;

        loop {
            let now = Instant::now();
            while calls
                .front()
                .is_some_and(|&oldest| now.duration_since(oldest) >= self.period)
            {
                calls.pop_front();
            }

            if calls.len() < self.max_calls {
                break;
            }

            let Some(&oldest) = calls.front() else {
                tracing::warn!("rate limiter has no capacity; waiting indefinitely");
                std::future::pending::<()>().await;
                continue;
            };

            let resume_at = oldest + self.period;
            tracing::info!(
                wait_secs = resume_at.saturating_duration_since(now).as_secs_f64(),
                max_calls = self.max_calls,
                period_secs = self.period.as_secs(),
                "rate limit reached, waiting for a free slot"
            );
            tokio::time::sleep_until(resume_at).await;
        }

        calls.push_back(Instant::now());
    }
}
