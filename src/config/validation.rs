//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URLs and value ranges (intervals > 0, interval within budget)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HarnessConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::HarnessConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{interval_field} ({interval} ms) exceeds {timeout_field} ({timeout} ms)")]
    IntervalExceedsTimeout {
        interval_field: &'static str,
        interval: u64,
        timeout_field: &'static str,
        timeout: u64,
    },

    #[error("user.username must not be empty")]
    EmptyUsername,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &HarnessConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "apim.service_url_http", &config.apim.service_url_http);
    check_url(&mut errors, "apim.service_url_https", &config.apim.service_url_https);
    check_url(&mut errors, "gateway.service_url_https", &config.gateway.service_url_https);

    let waiter = &config.waiter;
    check_budget(
        &mut errors,
        ("waiter.interval_ms", waiter.interval_ms),
        ("waiter.timeout_ms", waiter.timeout_ms),
    );
    check_budget(
        &mut errors,
        ("waiter.availability_interval_ms", waiter.availability_interval_ms),
        ("waiter.availability_timeout_ms", waiter.availability_timeout_ms),
    );

    if config.http.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "http.request_timeout_secs",
        });
    }

    if config.user.username.trim().is_empty() {
        errors.push(ValidationError::EmptyUsername);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn check_budget(
    errors: &mut Vec<ValidationError>,
    (interval_field, interval): (&'static str, u64),
    (timeout_field, timeout): (&'static str, u64),
) {
    if interval == 0 {
        errors.push(ValidationError::Zero { field: interval_field });
    }
    if timeout == 0 {
        errors.push(ValidationError::Zero { field: timeout_field });
    }
    if interval > timeout && timeout > 0 {
        errors.push(ValidationError::IntervalExceedsTimeout {
            interval_field,
            interval,
            timeout_field,
            timeout,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&HarnessConfig::default()).is_ok());
    }

    #[test]
    fn reports_every_violation() {
        let mut config = HarnessConfig::default();
        config.apim.service_url_http = "not a url".into();
        config.gateway.service_url_https = "ftp://gateway:21".into();
        config.waiter.interval_ms = 0;
        config.waiter.availability_interval_ms = 20_000;
        config.user.username = " ".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5, "{errors:?}");
        assert!(errors.contains(&ValidationError::Zero {
            field: "waiter.interval_ms"
        }));
        assert!(errors.contains(&ValidationError::EmptyUsername));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::IntervalExceedsTimeout { interval: 20_000, timeout: 10_000, .. }
        )));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::InvalidUrl { field: "gateway.service_url_https", .. }
        )));
    }

    #[test]
    fn zero_timeout_is_not_also_reported_as_interval_overflow() {
        let mut config = HarnessConfig::default();
        config.waiter.timeout_ms = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::Zero {
                field: "waiter.timeout_ms"
            }]
        );
    }
}
