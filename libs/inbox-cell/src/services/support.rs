use anyhow::{Result, anyhow};
use reqwest::Method;
use serde_json::json;
use tracing::info;

use shared_client::RosterApiClient;
use shared_config::AppConfig;
use shared_models::MessageResponse;

use crate::models::{ResolveResponse, SupportListResponse, SupportRequest, SupportTicket};

pub struct SupportService {
    client: RosterApiClient,
}

impl SupportService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: RosterApiClient::new(config),
        }
    }

    /// Anonymous senders must leave an email; signed-in ones fall back to
    /// their account address.
    pub async fn submit(
        &self,
        message: &str,
        email: Option<&str>,
        auth_token: Option<&str>,
    ) -> Result<MessageResponse> {
        let message = message.trim();
        if message.is_empty() {
            return Err(anyhow!("Message is required"));
        }

        let email = email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());
        let auth_token = auth_token.filter(|t| !t.is_empty());
        if auth_token.is_none() && email.is_none() {
            return Err(anyhow!("Email is required when not signed in"));
        }

        let body = serde_json::to_value(SupportRequest {
            message: message.to_string(),
            email,
        })?;
        let response: MessageResponse = self.client.request(
            Method::POST,
            "/support",
            auth_token,
            Some(body),
        ).await?;

        info!("Support message submitted");
        Ok(response)
    }

    /// Admin view; `resolved` narrows the list, `None` returns everything
    pub async fn list(&self, resolved: Option<bool>, auth_token: &str) -> Result<Vec<SupportTicket>> {
        let path = match resolved {
            Some(flag) => format!("/admin/support?resolved={}", flag),
            None => "/admin/support".to_string(),
        };

        let response: SupportListResponse = self.client.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        Ok(response.items)
    }

    pub async fn set_resolved(
        &self,
        ticket_id: &str,
        resolved: bool,
        auth_token: &str,
    ) -> Result<ResolveResponse> {
        let path = format!("/admin/support/{}", ticket_id);
        let response: ResolveResponse = self.client.request(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(json!({ "resolved": resolved })),
        ).await?;

        info!("Support ticket {} resolved={}", ticket_id, response.resolved);
        Ok(response)
    }
}
