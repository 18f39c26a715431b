use std::env;
use tracing::warn;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_vars(env::var("DOWNVOTE_API_URL").ok(), env::var("PORT").ok())
    }

    pub fn from_vars(api_url: Option<String>, port: Option<String>) -> Self {
        let api_base_url = match api_url.map(|url| url.trim().to_string()) {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => {
                warn!("DOWNVOTE_API_URL is not set, using {DEFAULT_API_URL}");
                DEFAULT_API_URL.to_string()
            }
        };

        let port = port
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Self { api_base_url, port }
    }
}
