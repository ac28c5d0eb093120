//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! waiter (poll loop)
//!     → client.rs (StatusProbe::get over reqwest)
//!     → response.rs (status + body, or HttpError::Transport)
//! ```

pub mod client;
pub mod response;

pub use client::{basic_auth_header, parse_header, parse_headers, HttpClient, StatusProbe};
pub use response::HttpResponse;
