use anyhow::{Result, anyhow};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use shared_client::RosterApiClient;
use shared_config::AppConfig;

use crate::models::{MessageResponse, PendingResponse, User, UsersResponse};

/// Account moderation endpoints; every call needs an admin token.
pub struct AdminService {
    client: RosterApiClient,
}

impl AdminService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: RosterApiClient::new(config),
        }
    }

    pub async fn list_users(&self, auth_token: &str) -> Result<Vec<User>> {
        let response: UsersResponse = self.client.request(
            Method::GET,
            "/admin/users",
            Some(auth_token),
            None,
        ).await?;

        Ok(response.users)
    }

    pub async fn list_pending(&self, auth_token: &str) -> Result<Vec<User>> {
        let response: PendingResponse = self.client.request(
            Method::GET,
            "/admin/pending",
            Some(auth_token),
            None,
        ).await?;

        Ok(response.pending)
    }

    pub async fn approve(&self, user_id: &str, auth_token: &str) -> Result<MessageResponse> {
        info!("Approving user {}", user_id);
        let path = format!("/admin/approve/{}", user_id);
        Ok(self.client.request(Method::PATCH, &path, Some(auth_token), None).await?)
    }

    pub async fn reject(&self, user_id: &str, auth_token: &str) -> Result<MessageResponse> {
        info!("Rejecting user {}", user_id);
        let path = format!("/admin/reject/{}", user_id);
        Ok(self.client.request(Method::PATCH, &path, Some(auth_token), None).await?)
    }

    pub async fn update_email(
        &self,
        user_id: &str,
        email: &str,
        auth_token: &str,
    ) -> Result<MessageResponse> {
        let email = email.trim();
        if email.is_empty() {
            return Err(anyhow!("Email is required"));
        }

        debug!("Updating email for user {}", user_id);
        let path = format!("/admin/users/{}/email", user_id);
        Ok(self.client.request(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(json!({ "email": email })),
        ).await?)
    }

    pub async fn set_password(
        &self,
        user_id: &str,
        password: &str,
        auth_token: &str,
    ) -> Result<MessageResponse> {
        if password.is_empty() {
            return Err(anyhow!("Password is required"));
        }

        let path = format!("/admin/users/{}/password", user_id);
        Ok(self.client.request(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(json!({ "password": password })),
        ).await?)
    }

    pub async fn delete_user(&self, user_id: &str, auth_token: &str) -> Result<MessageResponse> {
        info!("Deleting user {}", user_id);
        let path = format!("/admin/users/{}", user_id);
        Ok(self.client.request(Method::DELETE, &path, Some(auth_token), None).await?)
    }
}
