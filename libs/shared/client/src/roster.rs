use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method, Response,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::AppError;

pub struct RosterApiClient {
    client: Client,
    base_url: String,
}

impl RosterApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token.filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| AppError::Auth(format!("Invalid token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    async fn send(&self, method: Method, path: &str,
                  auth_token: Option<&str>, body: Option<Value>)
                  -> Result<Response, AppError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let headers = self.get_headers(auth_token)?;

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = error_message(status.as_u16(), &error_text);
            error!("API error ({}): {}", status, message);

            return Err(AppError::from_status(status.as_u16(), message));
        }

        Ok(response)
    }

    /// Sends a JSON request and decodes the JSON reply. An empty body decodes as `{}`.
    pub async fn request<T>(&self, method: Method, path: &str,
                            auth_token: Option<&str>, body: Option<Value>)
                            -> Result<T, AppError>
    where T: DeserializeOwned {
        let response = self.send(method, path, auth_token, body).await?;
        let text = response.text().await?;

        let data = if text.trim().is_empty() {
            serde_json::from_str("{}")?
        } else {
            serde_json::from_str(&text)?
        };

        Ok(data)
    }

    /// Sends a request and returns the raw body, for non-JSON payloads such as CSV exports.
    pub async fn request_text(&self, method: Method, path: &str,
                              auth_token: Option<&str>)
                              -> Result<String, AppError> {
        let response = self.send(method, path, auth_token, None).await?;
        Ok(response.text().await?)
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

/// Extracts the human-readable reason from an error body.
fn error_message(status: u16, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["error", "message", "msg"] {
            if let Some(Value::String(msg)) = map.get(key) {
                return msg.clone();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}
