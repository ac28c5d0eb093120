//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Honour `RUST_LOG`, falling back to the configured level
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Installed before configuration is loaded; the level can be swapped in
//!   afterwards through [`LogLevelHandle`]
//! - Repeated initialisation (one per test binary entry point) is a no-op

use tracing_subscriber::{
    layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(level: &str) -> String {
    format!("mgw_harness={},mgw_wait={}", level, level)
}

/// Changes the active level of an installed subscriber.
pub struct LogLevelHandle {
    handle: reload::Handle<EnvFilter, Registry>,
    pinned_by_env: bool,
}

impl LogLevelHandle {
    /// True when `RUST_LOG` chose the filter. Level changes are then ignored.
    pub fn is_pinned(&self) -> bool {
        self.pinned_by_env
    }

    pub fn set_level(&self, level: &str) -> Result<(), reload::Error> {
        if self.pinned_by_env {
            return Ok(());
        }
        self.handle.reload(EnvFilter::new(default_directive(level)))
    }
}

/// Build the subscriber without installing it.
pub fn build_subscriber(
    level: &str,
) -> (impl tracing::Subscriber + Send + Sync + 'static, LogLevelHandle) {
    let (filter, pinned_by_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(default_directive(level)), false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    let subscriber = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true),
    );
    (
        subscriber,
        LogLevelHandle {
            handle,
            pinned_by_env,
        },
    )
}

/// Install the global subscriber. Returns `None` if one was already set.
pub fn init_logging(level: &str) -> Option<LogLevelHandle> {
    let (subscriber, handle) = build_subscriber(level);
    subscriber.try_init().ok().map(|()| handle)
}
