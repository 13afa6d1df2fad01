use anyhow::{Context, Result};
use url::Url;

/// Settings for the upstream identity service and the session cookie it issues.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub service_base_url: Option<Url>,
    pub service_api_key: Option<String>,
    pub cookie_name: String,
    pub cookie_max_age_secs: u64,
    pub cookie_domain: Option<String>,
}

impl AuthConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let service_base_url = match lookup("AUTH_SERVICE_BASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(
                Url::parse(raw.trim()).context("AUTH_SERVICE_BASE_URL must be an absolute URL")?,
            ),
            None => None,
        };

        Ok(Self {
            service_base_url,
            service_api_key: lookup("AUTH_SERVICE_API_KEY").filter(|v| !v.is_empty()),
            cookie_name: lookup("SESSION_COOKIE_NAME").unwrap_or_else(|| "session_token".to_string()),
            cookie_max_age_secs: lookup("SESSION_COOKIE_MAX_AGE_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(60 * 24 * 60 * 60),
            cookie_domain: lookup("COOKIE_DOMAIN").filter(|v| !v.is_empty()),
        })
    }
}
