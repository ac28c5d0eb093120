//! Waits for API deployment to reach the gateway.
//!
//! The API Manager exposes an `APIStatusMonitor` web app that answers
//! `GET /APIStatusMonitor/apiInformation/api/{domain}/{id}/{name}/{version}`
//! with a JSON document carrying `"isApiExists":true|false`. Polling it is the
//! only way to observe that a published revision has synced.

use std::time::Duration;

use reqwest::header::{HeaderMap, AUTHORIZATION};

use crate::config::{HarnessConfig, TenantConfig};
use crate::error::HttpError;
use crate::http::{basic_auth_header, StatusProbe};
use crate::model::{TestUser, SUPER_TENANT_DOMAIN};
use crate::waiter::condition::Contains;
use crate::waiter::poll::{EventualConsistencyWaiter, WaitOutcome};

const STATUS_MONITOR_PATH: &str = "APIStatusMonitor/apiInformation/api";
const SUPER_TENANT_ID: i64 = -1234;

/// Whether the awaited state is "deployed" or "gone".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiPresence {
    Exists,
    NotExists,
}

impl ApiPresence {
    /// Fragment the status monitor reply must contain.
    pub fn expected_response(self) -> &'static str {
        match self {
            ApiPresence::Exists => "\"isApiExists\":true",
            ApiPresence::NotExists => "\"isApiExists\":false",
        }
    }
}

/// Deployment-sync waits against one API Manager.
pub struct DeploymentSync<P> {
    waiter: EventualConsistencyWaiter<P>,
    base_url: String,
    tenant: TenantConfig,
    user: Option<TestUser>,
    fixed_delay: Duration,
}

impl<P: StatusProbe> DeploymentSync<P> {
    pub fn new(probe: P, config: &HarnessConfig) -> Self {
        Self {
            waiter: EventualConsistencyWaiter::from_config(probe, &config.waiter),
            base_url: config.apim.service_url_http.clone(),
            tenant: config.tenant.clone(),
            user: Some(TestUser::from(&config.user)),
            fixed_delay: Duration::from_millis(config.waiter.deployment_delay_ms),
        }
    }

    /// Override the credentials sent to the status monitor. `None` falls
    /// back to `admin:admin`.
    pub fn with_user(mut self, user: Option<TestUser>) -> Self {
        self.user = user;
        self
    }

    pub fn waiter(&self) -> &EventualConsistencyWaiter<P> {
        &self.waiter
    }

    /// `tenantDomain/tenantId/` for the tenant `api_provider` belongs to.
    ///
    /// The domain is the part of the provider name after the last `@`. Its id
    /// comes from `tenant.domain`/`tenant.id`, then `tenant.ids`, then the
    /// super tenant. A domain with no known id falls back to the configured
    /// tenant.
    pub fn tenant_identifier(&self, api_provider: &str) -> String {
        let domain = TestUser::new(api_provider, "").user_domain().to_string();

        let id = if domain == self.tenant.domain {
            Some(self.tenant.id)
        } else if let Some(id) = self.tenant.ids.get(&domain) {
            Some(*id)
        } else if domain == SUPER_TENANT_DOMAIN {
            Some(SUPER_TENANT_ID)
        } else {
            None
        };

        match id {
            Some(id) => format!("{}/{}/", domain, id),
            None => {
                tracing::warn!(
                    api_provider,
                    domain = %domain,
                    fallback = %self.tenant.domain,
                    "No tenant id known for provider domain, using configured tenant"
                );
                format!("{}/{}/", self.tenant.domain, self.tenant.id)
            }
        }
    }

    pub fn status_url(&self, api_provider: &str, api_name: &str, api_version: &str) -> String {
        format!(
            "{}/{}/{}{}/{}",
            self.base_url.trim_end_matches('/'),
            STATUS_MONITOR_PATH,
            self.tenant_identifier(api_provider),
            api_name,
            api_version
        )
    }

    pub fn auth_headers(&self) -> Result<HeaderMap, HttpError> {
        let fallback = TestUser::default();
        let user = self.user.as_ref().unwrap_or(&fallback);

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            basic_auth_header(user.username_without_domain(), user.password())?,
        );
        Ok(headers)
    }

    /// Poll the status monitor until the API reaches `presence`.
    ///
    /// A timeout is reported as [`WaitOutcome::TimedOut`], not as an error;
    /// callers assert on the gateway afterwards.
    pub async fn wait_for_api_deployment_sync(
        &self,
        api_provider: &str,
        api_name: &str,
        api_version: &str,
        presence: ApiPresence,
    ) -> Result<WaitOutcome, HttpError> {
        let headers = self.auth_headers()?;
        let url = self.status_url(api_provider, api_name, api_version);

        tracing::info!(
            api_name,
            api_version,
            api_provider,
            url = %url,
            expected = presence.expected_response(),
            "Waiting for API deployment sync"
        );

        let outcome = self
            .waiter
            .wait_until(&url, &headers, &Contains::new(presence.expected_response()))
            .await;

        if outcome.is_matched() {
            tracing::info!(api_name, api_version, "API deployment state observed");
        }
        Ok(outcome)
    }

    /// Sleep for the configured fixed delay. Used where no status endpoint
    /// reflects the deployment (API products).
    pub async fn wait_for_api_deployment(&self) {
        tracing::info!(
            delay_ms = self.fixed_delay.as_millis() as u64,
            "Waiting for gateway to pick up deployment"
        );
        tokio::time::sleep(self.fixed_delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waiter::poll::tests::{ScriptedProbe, Step};
    use tokio::time::Instant;

    fn config() -> HarnessConfig {
        let mut config = HarnessConfig::default();
        config.apim.service_url_http = "http://apim:9763/".into();
        config.waiter.timeout_ms = 2_000;
        config.waiter.interval_ms = 500;
        config.waiter.deployment_delay_ms = 15_000;
        config
    }

    #[test]
    fn status_url_includes_tenant_identifier() {
        let sync = DeploymentSync::new(ScriptedProbe::new(vec![Step::Fail]), &config());
        assert_eq!(sync.tenant_identifier("admin"), "carbon.super/-1234/");
        assert_eq!(
            sync.status_url("admin", "SubscriptionValidationTestAPI", "1.0.0"),
            "http://apim:9763/APIStatusMonitor/apiInformation/api/carbon.super/-1234/SubscriptionValidationTestAPI/1.0.0"
        );
    }

    #[test]
    fn tenant_follows_provider_domain() {
        let mut config = config();
        config.tenant.ids.insert("wso2.com".into(), 3);
        let sync = DeploymentSync::new(ScriptedProbe::new(vec![Step::Fail]), &config);

        assert_eq!(sync.tenant_identifier("alice@wso2.com"), "wso2.com/3/");
        assert_eq!(sync.tenant_identifier("admin"), "carbon.super/-1234/");
        assert_eq!(
            sync.status_url("alice@wso2.com", "PizzaShack", "1.0.0"),
            "http://apim:9763/APIStatusMonitor/apiInformation/api/wso2.com/3/PizzaShack/1.0.0"
        );
    }

    #[test]
    fn configured_tenant_covers_its_own_domain_and_unknown_ones() {
        let mut config = config();
        config.tenant.domain = "abc.com".into();
        config.tenant.id = 5;
        let sync = DeploymentSync::new(ScriptedProbe::new(vec![Step::Fail]), &config);

        assert_eq!(sync.tenant_identifier("bob@abc.com"), "abc.com/5/");
        assert_eq!(sync.tenant_identifier("admin"), "carbon.super/-1234/");
        assert_eq!(sync.tenant_identifier("eve@unknown.org"), "abc.com/5/");
    }

    #[tokio::test(start_paused = true)]
    async fn tenant_provider_polls_tenant_path() {
        let mut config = config();
        config.tenant.ids.insert("wso2.com".into(), 3);
        let probe = ScriptedProbe::new(vec![Step::Body(200, r#"{"isApiExists":true}"#)]);
        let sync = DeploymentSync::new(probe, &config);

        let outcome = sync
            .wait_for_api_deployment_sync("alice@wso2.com", "PizzaShack", "1.0.0", ApiPresence::Exists)
            .await
            .unwrap();

        assert_eq!(outcome, WaitOutcome::Matched);
        assert!(sync.waiter().probe().seen()[0]
            .0
            .ends_with("/wso2.com/3/PizzaShack/1.0.0"));
    }

    #[test]
    fn auth_header_strips_tenant_domain() {
        let sync = DeploymentSync::new(ScriptedProbe::new(vec![Step::Fail]), &config())
            .with_user(Some(TestUser::new("admin@wso2.com", "secret")));
        let headers = sync.auth_headers().unwrap();
        // base64("admin:secret")
        assert_eq!(headers[AUTHORIZATION], "Basic YWRtaW46c2VjcmV0");
    }

    #[test]
    fn missing_user_falls_back_to_admin() {
        let sync =
            DeploymentSync::new(ScriptedProbe::new(vec![Step::Fail]), &config()).with_user(None);
        let headers = sync.auth_headers().unwrap();
        assert_eq!(headers[AUTHORIZATION], "Basic YWRtaW46YWRtaW4=");
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_undeployment() {
        let probe = ScriptedProbe::new(vec![
            Step::Body(200, r#"{"isApiExists":true}"#),
            Step::Body(200, r#"{"isApiExists":false}"#),
        ]);
        let sync = DeploymentSync::new(probe, &config());

        let outcome = sync
            .wait_for_api_deployment_sync("admin", "PizzaShack", "1.0.0", ApiPresence::NotExists)
            .await
            .unwrap();

        assert_eq!(outcome, WaitOutcome::Matched);
        let seen = sync.waiter().probe().seen();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].0.ends_with("/carbon.super/-1234/PizzaShack/1.0.0"));
        assert!(seen[0].1.contains_key(AUTHORIZATION));
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_monitor_times_out_without_error() {
        let sync = DeploymentSync::new(ScriptedProbe::new(vec![Step::Fail]), &config());

        let outcome = sync
            .wait_for_api_deployment_sync("admin", "PizzaShack", "1.0.0", ApiPresence::Exists)
            .await
            .unwrap();

        assert_eq!(outcome, WaitOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_delay_sleeps_configured_time() {
        let sync = DeploymentSync::new(ScriptedProbe::new(vec![Step::Fail]), &config());
        let start = Instant::now();
        sync.wait_for_api_deployment().await;
        assert!(start.elapsed() >= Duration::from_millis(15_000));
        assert_eq!(sync.waiter().probe().calls(), 0);
    }
}
