//! Wait until an endpoint answers at all.
//!
//! Gateway resources answer with 404 until the router has the route, and
//! refuse connections while the listener restarts. Test cases await any
//! completed response before asserting on status and body.

use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::config::WaiterConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::http::{HttpResponse, StatusProbe};
use crate::waiter::condition::AnyResponse;
use crate::waiter::poll::EventualConsistencyWaiter;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_AT_MOST: Duration = Duration::from_secs(10);

/// Poll `url` until a request completes, whatever its status.
///
/// Unlike [`EventualConsistencyWaiter::wait_until`], running out of budget
/// is an error here.
pub async fn await_response_available<P>(
    probe: P,
    url: &str,
    headers: &HeaderMap,
    poll_interval: Duration,
    at_most: Duration,
) -> HarnessResult<HttpResponse>
where
    P: StatusProbe,
{
    let waiter = EventualConsistencyWaiter::new(probe)
        .with_interval(poll_interval)
        .with_timeout(at_most);

    waiter
        .wait_for_match(url, headers, &AnyResponse)
        .await
        .ok_or_else(|| HarnessError::ConditionTimeout {
            url: url.to_string(),
            waited: at_most,
        })
}

/// [`await_response_available`] with the configured cadence.
pub async fn await_response_available_with<P>(
    probe: P,
    url: &str,
    headers: &HeaderMap,
    config: &WaiterConfig,
) -> HarnessResult<HttpResponse>
where
    P: StatusProbe,
{
    await_response_available(
        probe,
        url,
        headers,
        Duration::from_millis(config.availability_interval_ms),
        Duration::from_millis(config.availability_timeout_ms),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waiter::poll::tests::{ScriptedProbe, Step};
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn returns_first_completed_response() {
        let probe = ScriptedProbe::new(vec![
            Step::Fail,
            Step::Body(403, r#"{"code":"900908","message":"Resource forbidden"}"#),
        ]);
        let start = Instant::now();

        let response = await_response_available(
            &probe,
            "https://gw/subscriptionValidationTestAPI/1.0.0/pet/findByStatus",
            &HeaderMap::new(),
            DEFAULT_POLL_INTERVAL,
            DEFAULT_AT_MOST,
        )
        .await
        .unwrap();

        assert_eq!(response.status, 403);
        assert!(response.data.contains("900908"));
        assert_eq!(probe.calls(), 2);
        assert!(start.elapsed() >= DEFAULT_POLL_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_endpoint_is_an_error() {
        let probe = ScriptedProbe::new(vec![Step::Fail]);

        let err = await_response_available_with(
            &probe,
            "https://gw/down",
            &HeaderMap::new(),
            &WaiterConfig::default(),
        )
        .await
        .unwrap_err();

        match err {
            HarnessError::ConditionTimeout { url, waited } => {
                assert_eq!(url, "https://gw/down");
                assert_eq!(waited, Duration::from_secs(10));
            }
            other => panic!("unexpected error: {other}"),
        }
        // polls at 0, 2, 4, 6, 8 seconds
        assert_eq!(probe.calls(), 5);
    }
}
