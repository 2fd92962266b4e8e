use anyhow::{Result, anyhow};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use auth_cell::DirectoryService;
use shared_client::RosterApiClient;
use shared_config::AppConfig;
use shared_models::{MessageResponse, User};

use crate::models::{Member, MembersResponse, RemoveMemberResponse};

pub struct MembershipService {
    client: RosterApiClient,
    directory: DirectoryService,
}

impl MembershipService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: RosterApiClient::new(config),
            directory: DirectoryService::new(config),
        }
    }

    pub async fn list_members(&self, center_id: &str, auth_token: &str) -> Result<Vec<Member>> {
        debug!("Fetching members for center: {}", center_id);

        let path = format!("/centers/{}/members", center_id);
        let response: MembersResponse = self.client.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        Ok(response.members)
    }

    pub async fn add_member(
        &self,
        center_id: &str,
        user_id: &str,
        auth_token: &str,
    ) -> Result<MessageResponse> {
        let path = format!("/centers/{}/members", center_id);
        Ok(self.client.request(
            Method::POST,
            &path,
            Some(auth_token),
            Some(json!({ "user_id": user_id })),
        ).await?)
    }

    /// Looks the user up by email and adds them once their account is approved
    pub async fn add_member_by_email(
        &self,
        center_id: &str,
        email: &str,
        auth_token: &str,
    ) -> Result<User> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(anyhow!("Enter an email"));
        }

        let user = self.directory.find_by_email(&email, auth_token).await?;
        if user.id.is_empty() {
            return Err(anyhow!("User not found"));
        }
        if !user.is_approved() {
            return Err(anyhow!("User is not approved"));
        }

        self.add_member(center_id, &user.id, auth_token).await?;
        info!("Added {} to center {}", user.display_name(), center_id);

        Ok(user)
    }

    /// Removes the membership; the API also drops the member's future shifts there
    pub async fn remove_member(
        &self,
        center_id: &str,
        user_id: &str,
        auth_token: &str,
    ) -> Result<RemoveMemberResponse> {
        let path = format!("/centers/{}/members/{}", center_id, user_id);
        let response: RemoveMemberResponse = self.client.request(
            Method::DELETE,
            &path,
            Some(auth_token),
            None,
        ).await?;

        info!(
            "Removed {} from center {} ({} future shifts dropped)",
            user_id, center_id, response.future_shifts_removed
        );
        Ok(response)
    }

    /// Makes the user the center's only lead, demoting any previous one
    pub async fn assign_lead(
        &self,
        center_id: &str,
        user_id: &str,
        auth_token: &str,
    ) -> Result<MessageResponse> {
        let path = format!("/centers/{}/assign-lead", center_id);
        Ok(self.client.request(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(json!({ "user_id": user_id })),
        ).await?)
    }
}
