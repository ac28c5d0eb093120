//! HTTP GET capability used by the waiters.
//!
//! # Responsibilities
//! - Issue read-only requests against status and gateway endpoints
//! - Report transport failures as errors, never as panics
//! - Build the header values the control plane expects

use std::future::Future;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

use crate::config::HttpConfig;
use crate::error::HttpError;
use crate::http::response::HttpResponse;

/// A read-only request against an endpoint.
///
/// The waiters are generic over this so that polling can be driven by a
/// scripted sequence of replies in tests.
pub trait StatusProbe {
    fn get(
        &self,
        url: &str,
        headers: &HeaderMap,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send;
}

impl<P: StatusProbe + Sync> StatusProbe for &P {
    fn get(
        &self,
        url: &str,
        headers: &HeaderMap,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send {
        (**self).get(url, headers)
    }
}

/// reqwest-backed implementation of [`StatusProbe`].
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .no_proxy()
            .build()
            .map_err(HttpError::Build)?;

        Ok(Self { client })
    }
}

impl StatusProbe for HttpClient {
    async fn get(&self, url: &str, headers: &HeaderMap) -> Result<HttpResponse, HttpError> {
        let transport = |source| HttpError::Transport {
            url: url.to_string(),
            source,
        };

        let res = self
            .client
            .get(url)
            .headers(headers.clone())
            .send()
            .await
            .map_err(transport)?;

        let status = res.status().as_u16();
        let data = res.text().await.map_err(transport)?;

        Ok(HttpResponse { status, data })
    }
}

/// `Basic base64(user:password)`.
pub fn basic_auth_header(user: &str, password: &str) -> Result<HeaderValue, HttpError> {
    let encoded = STANDARD.encode(format!("{}:{}", user, password));
    let mut value =
        HeaderValue::from_str(&format!("Basic {}", encoded)).map_err(|e| HttpError::InvalidHeader {
            name: "authorization".to_string(),
            reason: e.to_string(),
        })?;
    value.set_sensitive(true);
    Ok(value)
}

/// Parse a `Name: value` pair as given on the command line.
pub fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue), HttpError> {
    let (name, value) = raw.split_once(':').ok_or_else(|| HttpError::InvalidHeader {
        name: raw.to_string(),
        reason: "expected 'Name: value'".to_string(),
    })?;

    let name = name.trim();
    let header_name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|e| HttpError::InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
    let header_value =
        HeaderValue::from_str(value.trim()).map_err(|e| HttpError::InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

    Ok((header_name, header_value))
}

/// Collect several `Name: value` pairs into a header map.
pub fn parse_headers<I, S>(raw: I) -> Result<HeaderMap, HttpError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut headers = HeaderMap::new();
    for item in raw {
        let (name, value) = parse_header(item.as_ref())?;
        headers.append(name, value);
    }
    Ok(headers)
}
