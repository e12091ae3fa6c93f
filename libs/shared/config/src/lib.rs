use std::env;
use std::time::Duration;
use tracing::warn;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;
const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_WIDGET_IDLE_TTL_SECS: u64 = 30 * 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_api_url: String,
    pub request_timeout_secs: u64,
    pub retry_backoff_ms: u64,
    pub default_utc_offset_minutes: i32,
    pub server_port: u16,
    /// Mounted widgets untouched for longer than this are evicted.
    pub widget_idle_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_api_url: String::new(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            default_utc_offset_minutes: 0,
            server_port: DEFAULT_SERVER_PORT,
            widget_idle_ttl_secs: DEFAULT_WIDGET_IDLE_TTL_SECS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let backend_api_url = env::var("BACKEND_API_URL")
            .or_else(|_| env::var("NEXT_PUBLIC_BACKEND_API_URL"))
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| {
                warn!("BACKEND_API_URL not set, using empty value");
                String::new()
            });

        let config = Self {
            backend_api_url,
            request_timeout_secs: parse_var(
                "BACKEND_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            ),
            retry_backoff_ms: parse_var("BACKEND_RETRY_BACKOFF_MS", defaults.retry_backoff_ms),
            default_utc_offset_minutes: parse_var(
                "DEFAULT_UTC_OFFSET_MINUTES",
                defaults.default_utc_offset_minutes,
            ),
            server_port: parse_var("PORT", defaults.server_port),
            widget_idle_ttl_secs: parse_var("WIDGET_IDLE_TTL_SECS", defaults.widget_idle_ttl_secs),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    /// Config pointing at an explicit backend, everything else defaulted.
    pub fn with_backend_url(url: impl Into<String>) -> Self {
        Self {
            backend_api_url: url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.backend_api_url.is_empty()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn widget_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.widget_idle_ttl_secs)
    }
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
