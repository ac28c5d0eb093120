//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! waiters, config loader, CLI
//!     → tracing events (url, attempt, expected, elapsed_ms)
//!     → logging.rs (EnvFilter + fmt layer on stderr)
//! ```

pub mod logging;

pub use logging::{build_subscriber, init_logging, LogLevelHandle};
