use anyhow::{Result, anyhow};
use reqwest::Method;
use tracing::{debug, info};

use shared_client::RosterApiClient;
use shared_config::AppConfig;
use shared_models::MessageResponse;

use crate::models::{
    Center, CentersResponse, CreateCenterRequest, CreatedResponse, UpdateCenterRequest,
};

pub struct CenterService {
    client: RosterApiClient,
}

impl CenterService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: RosterApiClient::new(config),
        }
    }

    /// Admins see every center; everyone else only the centers they belong to
    pub async fn list_centers(&self, auth_token: &str) -> Result<Vec<Center>> {
        let response: CentersResponse = self.client.request(
            Method::GET,
            "/centers",
            Some(auth_token),
            None,
        ).await?;

        debug!("Fetched {} centers", response.centers.len());
        Ok(response.centers)
    }

    pub async fn create_center(
        &self,
        request: CreateCenterRequest,
        auth_token: &str,
    ) -> Result<String> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Center name is required"));
        }

        let body = serde_json::to_value(CreateCenterRequest {
            name: name.to_string(),
            location: request.location.map(|l| l.trim().to_string()),
        })?;

        let created: CreatedResponse = self.client.request(
            Method::POST,
            "/centers",
            Some(auth_token),
            Some(body),
        ).await?;

        info!("Created center {} ({})", name, created.id);
        Ok(created.id)
    }

    pub async fn update_center(
        &self,
        center_id: &str,
        request: UpdateCenterRequest,
        auth_token: &str,
    ) -> Result<MessageResponse> {
        if request.name.is_none() && request.location.is_none() {
            return Err(anyhow!("Nothing to update"));
        }
        if request.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(anyhow!("Center name cannot be empty"));
        }

        let path = format!("/centers/{}", center_id);
        let body = serde_json::to_value(&request)?;

        Ok(self.client.request(Method::PATCH, &path, Some(auth_token), Some(body)).await?)
    }

    /// Deleting a center also drops its memberships on the server side
    pub async fn delete_center(&self, center_id: &str, auth_token: &str) -> Result<MessageResponse> {
        info!("Deleting center {}", center_id);
        let path = format!("/centers/{}", center_id);
        Ok(self.client.request(Method::DELETE, &path, Some(auth_token), None).await?)
    }
}
