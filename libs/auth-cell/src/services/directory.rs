use anyhow::Result;
use reqwest::Method;
use tracing::debug;

use shared_client::RosterApiClient;
use shared_config::AppConfig;

use crate::models::{User, UserBasics, UserBasicsResponse};

pub struct DirectoryService {
    client: RosterApiClient,
}

impl DirectoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: RosterApiClient::new(config),
        }
    }

    pub async fn find_by_email(&self, email: &str, auth_token: &str) -> Result<User> {
        let email = email.trim().to_lowercase();
        debug!("Looking up user by email: {}", email);

        let path = format!("/users/find?email={}", urlencoding::encode(&email));
        let user: User = self.client.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        Ok(user)
    }

    pub async fn basics(&self, ids: &[String], auth_token: &str) -> Result<Vec<UserBasics>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let path = format!("/users/basics?ids={}", urlencoding::encode(&ids.join(",")));
        let response: UserBasicsResponse = self.client.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        Ok(response.users)
    }
}
