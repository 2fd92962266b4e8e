use anyhow::{Result, anyhow};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use shared_client::RosterApiClient;
use shared_config::AppConfig;

use crate::models::{
    ChangePasswordRequest, LoginRequest, LoginResponse, MessageResponse,
    RegisterRequest, UpdateProfileRequest, User,
};

pub struct AccountService {
    client: RosterApiClient,
}

impl AccountService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: RosterApiClient::new(config),
        }
    }

    /// Register a new account; it stays pending until an admin approves it
    pub async fn register(&self, request: RegisterRequest) -> Result<MessageResponse> {
        debug!("Registering account for: {}", request.email);

        if [&request.first_name, &request.last_name, &request.email, &request.password]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(anyhow!("All fields are required"));
        }

        if request.password != request.password_recheck {
            return Err(anyhow!("Passwords do not match"));
        }

        let body = serde_json::to_value(&request)?;
        let response: MessageResponse = self.client.request(
            Method::POST,
            "/register",
            None,
            Some(body),
        ).await?;

        info!("Registration submitted for {}", request.email);
        Ok(response)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        debug!("Logging in: {}", request.email);

        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(anyhow!("Email and password are required"));
        }

        let body = serde_json::to_value(&request)?;
        let response: LoginResponse = self.client.request(
            Method::POST,
            "/login",
            None,
            Some(body),
        ).await?;

        Ok(response)
    }

    pub async fn me(&self, auth_token: &str) -> Result<User> {
        let user: User = self.client.request(
            Method::GET,
            "/me",
            Some(auth_token),
            None,
        ).await?;

        Ok(user)
    }

    pub async fn update_profile(
        &self,
        request: UpdateProfileRequest,
        auth_token: &str,
    ) -> Result<MessageResponse> {
        if request.first_name.is_none() && request.last_name.is_none() && request.phone.is_none() {
            return Err(anyhow!("Nothing to update"));
        }

        let body = serde_json::to_value(&request)?;
        let response: MessageResponse = self.client.request(
            Method::PATCH,
            "/me",
            Some(auth_token),
            Some(body),
        ).await?;

        Ok(response)
    }

    pub async fn change_password(
        &self,
        request: ChangePasswordRequest,
        auth_token: &str,
    ) -> Result<MessageResponse> {
        if request.new_password != request.confirm_password {
            return Err(anyhow!("Passwords do not match"));
        }

        let response: MessageResponse = self.client.request(
            Method::POST,
            "/me/change-password",
            Some(auth_token),
            Some(json!({
                "current_password": request.current_password,
                "new_password": request.new_password,
                "confirm_password": request.confirm_password,
            })),
        ).await?;

        Ok(response)
    }
}
