use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "0.0.0.0:8630";
pub const DEFAULT_METRICS_BIND: &str = "0.0.0.0:9630";
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8700";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 300;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

// Back-office configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct BackofficeConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub backend_url: String,
    pub page_size: u32,
    pub session_ttl: Duration,
    pub http_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct BackofficeConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    backend_url: Option<String>,
    page_size: Option<u32>,
    session_ttl_secs: Option<u64>,
    http_timeout_ms: Option<u64>,
}

impl BackofficeConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("LANYARD_BIND")
            .unwrap_or_else(|_| DEFAULT_BIND.to_string())
            .parse()
            .with_context(|| "parse LANYARD_BIND")?;
        let metrics_bind = std::env::var("LANYARD_METRICS_BIND")
            .unwrap_or_else(|_| DEFAULT_METRICS_BIND.to_string())
            .parse()
            .with_context(|| "parse LANYARD_METRICS_BIND")?;
        let backend_url =
            std::env::var("LANYARD_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let page_size = match std::env::var("LANYARD_PAGE_SIZE") {
            Ok(raw) => raw.parse().with_context(|| "parse LANYARD_PAGE_SIZE")?,
            Err(_) => DEFAULT_PAGE_SIZE,
        };
        let session_ttl_secs = match std::env::var("LANYARD_SESSION_TTL_SECS") {
            Ok(raw) => raw.parse().with_context(|| "parse LANYARD_SESSION_TTL_SECS")?,
            Err(_) => DEFAULT_SESSION_TTL_SECS,
        };
        let http_timeout_ms = match std::env::var("LANYARD_HTTP_TIMEOUT_MS") {
            Ok(raw) => raw.parse().with_context(|| "parse LANYARD_HTTP_TIMEOUT_MS")?,
            Err(_) => DEFAULT_HTTP_TIMEOUT_MS,
        };
        Ok(Self {
            bind_addr,
            metrics_bind,
            backend_url,
            page_size,
            session_ttl: Duration::from_secs(session_ttl_secs),
            http_timeout: Duration::from_millis(http_timeout_ms),
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("LANYARD_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read LANYARD_CONFIG: {path}"))?;
            let override_cfg: BackofficeConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse back-office config yaml")?;
            if let Some(value) = override_cfg.bind_addr {
                config.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
            }
            if let Some(value) = override_cfg.metrics_bind {
                config.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
            }
            if let Some(value) = override_cfg.backend_url {
                config.backend_url = value;
            }
            if let Some(value) = override_cfg.page_size {
                config.page_size = value;
            }
            if let Some(value) = override_cfg.session_ttl_secs {
                config.session_ttl = Duration::from_secs(value);
            }
            if let Some(value) = override_cfg.http_timeout_ms {
                config.http_timeout = Duration::from_millis(value);
            }
        }
        Ok(config)
    }
}
