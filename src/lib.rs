//! Microgateway integration harness library
//!
//! Poll-until-deadline waiters for an API Manager control plane and its
//! microgateway data plane.

pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod observability;
pub mod waiter;

pub use config::HarnessConfig;
pub use error::{HarnessError, HarnessResult, HttpError};
pub use http::{HttpClient, HttpResponse, StatusProbe};
pub use model::TestUser;
pub use waiter::{ApiPresence, DeploymentSync, EventualConsistencyWaiter, WaitOutcome};
