//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! harness.toml (optional)
//!     → loader.rs (parse & deserialize, apply MGW_* environment overrides)
//!     → validation.rs (semantic checks)
//!     → HarnessConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an empty file describes a local deployment
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{default_config, load_config, load_config_str, ConfigError};
pub use schema::{
    ApimConfig, GatewayConfig, HarnessConfig, HttpConfig, ObservabilityConfig, TenantConfig,
    UserConfig, WaiterConfig,
};
pub use validation::{validate_config, ValidationError};
