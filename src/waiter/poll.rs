//! Poll-until-deadline waiter.
//!
//! # Responsibilities
//! - Repeatedly GET a status endpoint until a body predicate holds
//! - Stop at a fixed wall-clock deadline
//! - Swallow transport failures; they only cost a poll
//!
//! # Design Decisions
//! - Timeout is not an error. The outcome is informational and callers
//!   re-check the awaited state themselves
//! - Fixed cadence, no backoff
//! - Sleeps never run past the deadline

use std::time::Duration;

use reqwest::header::HeaderMap;
use tokio::time::{sleep, Instant};

use crate::config::WaiterConfig;
use crate::http::{HttpResponse, StatusProbe};
use crate::waiter::condition::WaitCondition;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(60_000);
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

/// Shortest pause between polls; smaller intervals are raised to this.
pub const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Result of a single poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollResult {
    Matched,
    NotMatched,
    TransportError,
}

/// Why a wait loop exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Matched,
    TimedOut,
}

impl WaitOutcome {
    pub fn is_matched(self) -> bool {
        self == WaitOutcome::Matched
    }
}

/// Polls an endpoint until a condition is observed or the budget runs out.
#[derive(Debug, Clone)]
pub struct EventualConsistencyWaiter<P> {
    probe: P,
    timeout: Duration,
    interval: Duration,
}

impl<P: StatusProbe> EventualConsistencyWaiter<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            timeout: DEFAULT_TIMEOUT,
            interval: DEFAULT_INTERVAL,
        }
    }

    pub fn from_config(probe: P, config: &WaiterConfig) -> Self {
        Self::new(probe)
            .with_timeout(Duration::from_millis(config.timeout_ms))
            .with_interval(Duration::from_millis(config.interval_ms))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the pause between polls, raised to [`MIN_INTERVAL`] if shorter.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Poll `url` until `condition` holds for the response body or the
    /// timeout elapses.
    pub async fn wait_until<C>(&self, url: &str, headers: &HeaderMap, condition: &C) -> WaitOutcome
    where
        C: WaitCondition + ?Sized,
    {
        match self.wait_for_match(url, headers, condition).await {
            Some(_) => WaitOutcome::Matched,
            None => WaitOutcome::TimedOut,
        }
    }

    /// Same loop as [`wait_until`](Self::wait_until), returning the response
    /// that satisfied the condition.
    pub async fn wait_for_match<C>(
        &self,
        url: &str,
        headers: &HeaderMap,
        condition: &C,
    ) -> Option<HttpResponse>
    where
        C: WaitCondition + ?Sized,
    {
        let started = Instant::now();
        let deadline = started + self.timeout;
        let mut attempt: u32 = 0;

        while Instant::now() < deadline {
            attempt += 1;
            tracing::info!(
                url,
                attempt,
                expected = %condition.describe(),
                "Waiting for condition"
            );

            let (result, response) = self.poll_once(url, headers, condition).await;
            if result == PollResult::Matched {
                tracing::info!(
                    url,
                    attempt,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Condition met"
                );
                return response;
            }

            let now = Instant::now();
            if now >= deadline {
                break;
            }
            sleep(self.interval.min(deadline - now)).await;
        }

        tracing::warn!(
            url,
            attempts = attempt,
            timeout_ms = self.timeout.as_millis() as u64,
            "Gave up waiting for condition"
        );
        None
    }

    /// Issue one GET and classify it.
    pub async fn poll_once<C>(
        &self,
        url: &str,
        headers: &HeaderMap,
        condition: &C,
    ) -> (PollResult, Option<HttpResponse>)
    where
        C: WaitCondition + ?Sized,
    {
        match self.probe.get(url, headers).await {
            Ok(response) => {
                tracing::debug!(url, status = response.status, data = %response.data, "Poll response");
                if condition.is_met(&response.data) {
                    (PollResult::Matched, Some(response))
                } else {
                    (PollResult::NotMatched, None)
                }
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "Status endpoint not reachable yet");
                (PollResult::TransportError, None)
            }
        }
    }
}
