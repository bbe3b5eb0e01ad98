use std::env;

use anyhow::{Context, Result};

pub const DEFAULT_ACTIVITY_FEED_LIMIT: usize = 10;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub backend_url: String,
    pub service_key: String,
    pub server_host: String,
    pub server_port: u16,
    pub cors_allowed_origin: Option<String>,
    pub activity_feed_limit: usize,
    pub search_debounce_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let backend_url = env::var("SIBIMA_BACKEND_URL")
            .context("SIBIMA_BACKEND_URL must be set")?
            .trim_end_matches('/')
            .to_string();
        let service_key =
            env::var("SIBIMA_SERVICE_KEY").context("SIBIMA_SERVICE_KEY must be set")?;
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("SERVER_PORT must be a valid u16")?;
        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN").ok();
        let activity_feed_limit = env::var("ACTIVITY_FEED_LIMIT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_ACTIVITY_FEED_LIMIT);
        let search_debounce_ms = env::var("SEARCH_DEBOUNCE_MS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_SEARCH_DEBOUNCE_MS);

        Ok(Self {
            backend_url,
            service_key,
            server_host,
            server_port,
            cors_allowed_origin,
            activity_feed_limit,
            search_debounce_ms,
        })
    }

    pub fn redacted_service_key(&self) -> String {
        redact_key(&self.service_key)
    }
}

fn redact_key(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}
