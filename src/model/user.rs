//! Test user credentials.

use crate::config::UserConfig;

/// Domain assumed when a username carries no `@tenant` suffix.
pub const SUPER_TENANT_DOMAIN: &str = "carbon.super";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestUser {
    username: String,
    password: String,
}

impl TestUser {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Everything before the last `@`, or the whole name.
    pub fn username_without_domain(&self) -> &str {
        match self.username.rfind('@') {
            Some(idx) => &self.username[..idx],
            None => &self.username,
        }
    }

    /// Everything after the last `@`, or the super tenant domain.
    pub fn user_domain(&self) -> &str {
        match self.username.rfind('@') {
            Some(idx) => &self.username[idx + 1..],
            None => SUPER_TENANT_DOMAIN,
        }
    }
}

impl Default for TestUser {
    fn default() -> Self {
        Self::new("admin", "admin")
    }
}

impl From<&UserConfig> for TestUser {
    fn from(config: &UserConfig) -> Self {
        Self::new(config.username.clone(), config.password.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_username_belongs_to_super_tenant() {
        let user = TestUser::new("admin", "admin");
        assert_eq!(user.username_without_domain(), "admin");
        assert_eq!(user.user_domain(), SUPER_TENANT_DOMAIN);
    }

    #[test]
    fn splits_on_last_at_sign() {
        let user = TestUser::new("john@example.com@tenant.org", "pw");
        assert_eq!(user.username_without_domain(), "john@example.com");
        assert_eq!(user.user_domain(), "tenant.org");
    }
}
