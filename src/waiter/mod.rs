//! Eventual-consistency waiters.
//!
//! # Data Flow
//! ```text
//! caller (test case, CI script, mgw-wait)
//!     → deployment.rs   (APIStatusMonitor URL + Basic auth, or fixed delay)
//!     → availability.rs (any response, error on timeout)
//!     → poll.rs         (GET → condition.rs → sleep → GET ... until deadline)
//!     → http::StatusProbe
//! ```
//!
//! # Design Decisions
//! - One request in flight per waiter; the caller's task awaits the whole loop
//! - Transport failures are logged and count as a non-matching poll
//! - `wait_until` never errors on timeout; it reports a `WaitOutcome`

pub mod availability;
pub mod condition;
pub mod deployment;
pub mod poll;

pub use availability::{await_response_available, await_response_available_with};
pub use condition::{AnyResponse, Contains, WaitCondition};
pub use deployment::{ApiPresence, DeploymentSync};
pub use poll::{EventualConsistencyWaiter, PollResult, WaitOutcome};
