use std::env;
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub api_token: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("ROSTER_API_URL")
                .unwrap_or_else(|_| {
                    warn!("ROSTER_API_URL not set, using default");
                    DEFAULT_API_URL.to_string()
                }),
            // login and register run without one
            api_token: env::var("ROSTER_API_TOKEN")
                .unwrap_or_else(|_| {
                    debug!("ROSTER_API_TOKEN not set, using empty value");
                    String::new()
                }),
        }
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(mut self, api_url: Option<String>, api_token: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if let Some(token) = api_token {
            self.api_token = token;
        }
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.api_url.is_empty() && !self.api_token.is_empty()
    }

    pub fn token(&self) -> Option<&str> {
        if self.api_token.is_empty() {
            None
        } else {
            Some(&self.api_token)
        }
    }
}
