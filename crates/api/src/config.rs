use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use infra::repos::GroundCatalog;

use crate::auth::AuthConfig;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    /// Empty means every origin is accepted (the request origin is mirrored back).
    pub allowed_origins: Vec<HeaderValue>,
    pub request_timeout: Duration,
    pub grounds_file: Option<PathBuf>,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.parse().with_context(|| format!("invalid PORT {raw:?}"))?,
            None => 8080,
        };

        let allowed_origins = parse_origins(&lookup("ALLOWED_ORIGINS").unwrap_or_default())?;

        let request_timeout = Duration::from_secs(
            lookup("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        );

        Ok(Self {
            port,
            allowed_origins,
            request_timeout,
            grounds_file: lookup("GROUNDS_FILE")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            auth: AuthConfig::from_lookup(&lookup)?,
        })
    }

    /// Ground catalog from `GROUNDS_FILE`, or the built-in one.
    pub fn load_catalog(&self) -> Result<GroundCatalog> {
        match &self.grounds_file {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                GroundCatalog::from_json(&raw).with_context(|| format!("parsing {}", path.display()))
            }
            None => Ok(GroundCatalog::builtin()),
        }
    }
}

/// Comma-separated origin list. Credentials are allowed, so a literal `*` is refused;
/// leave the variable unset to mirror every origin.
fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|origin| {
            if origin == "*" {
                anyhow::bail!("ALLOWED_ORIGINS cannot contain `*`; unset it to accept every origin");
            }
            HeaderValue::from_str(origin)
                .with_context(|| format!("invalid origin {origin:?} in ALLOWED_ORIGINS"))
        })
        .collect()
}
