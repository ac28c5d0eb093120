//! Configuration schema definitions.
//!
//! This module defines the configuration structure for the harness.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the harness.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HarnessConfig {
    /// API Manager control plane endpoints.
    pub apim: ApimConfig,

    /// Microgateway data plane endpoints.
    pub gateway: GatewayConfig,

    /// Credentials used against the control plane.
    pub user: UserConfig,

    /// Tenant the APIs are published under.
    pub tenant: TenantConfig,

    /// Polling cadence and budgets.
    pub waiter: WaiterConfig,

    /// HTTP client settings.
    pub http: HttpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl HarnessConfig {
    /// Join a path onto the gateway's HTTPS service URL.
    pub fn gateway_url(&self, path: &str) -> String {
        join_url(&self.gateway.service_url_https, path)
    }

    /// Join a path onto the API Manager's HTTPS service URL.
    pub fn apim_https_url(&self, path: &str) -> String {
        join_url(&self.apim.service_url_https, path)
    }

    /// Join a path onto the API Manager's plain HTTP service URL.
    pub fn apim_http_url(&self, path: &str) -> String {
        join_url(&self.apim.service_url_http, path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// API Manager endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApimConfig {
    /// Plain HTTP service URL (hosts the APIStatusMonitor web app).
    pub service_url_http: String,

    /// HTTPS service URL.
    pub service_url_https: String,
}

impl Default for ApimConfig {
    fn default() -> Self {
        Self {
            service_url_http: "http://localhost:9763".to_string(),
            service_url_https: "https://localhost:9443".to_string(),
        }
    }
}

/// Microgateway endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTPS listener of the router.
    pub service_url_https: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            service_url_https: "https://localhost:9095".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UserConfig {
    /// Username, optionally suffixed with `@tenant-domain`.
    pub username: String,
    pub password: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TenantConfig {
    /// Used when the API provider's domain has no known id.
    pub domain: String,
    pub id: i64,

    /// Known tenant ids by domain, e.g. `"wso2.com" = 1`.
    pub ids: BTreeMap<String, i64>,
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            domain: "carbon.super".to_string(),
            id: -1234,
            ids: BTreeMap::new(),
        }
    }
}

/// Waiter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WaiterConfig {
    /// Total budget for a deployment-sync wait in milliseconds.
    pub timeout_ms: u64,

    /// Delay between polls in milliseconds.
    pub interval_ms: u64,

    /// Fixed delay used when no status endpoint can be polled.
    pub deployment_delay_ms: u64,

    /// Poll interval while waiting for an endpoint to answer at all.
    pub availability_interval_ms: u64,

    /// Budget while waiting for an endpoint to answer at all.
    pub availability_timeout_ms: u64,
}

impl Default for WaiterConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            interval_ms: 500,
            deployment_delay_ms: 15_000,
            availability_interval_ms: 2_000,
            availability_timeout_ms: 10_000,
        }
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Trust self-signed certificates (the test deployment ships one).
    pub accept_invalid_certs: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            accept_invalid_certs: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
