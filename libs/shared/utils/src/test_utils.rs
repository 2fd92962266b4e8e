use chrono::Datelike;
use serde_json::{json, Value};

use shared_config::AppConfig;

use crate::dates::Month;

pub struct TestConfig {
    pub api_url: String,
    pub api_token: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            api_token: "test-token".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_url(api_url: &str) -> Self {
        Self {
            api_url: api_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_url: self.api_url.clone(),
            api_token: self.api_token.clone(),
        }
    }
}

pub struct TestMember {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
}

impl TestMember {
    pub fn new(user_id: &str, role: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            first_name: format!("First-{}", user_id),
            last_name: format!("Last-{}", user_id),
            email: format!("{}@roster.test", user_id),
            role: role.to_string(),
        }
    }

    pub fn medic(user_id: &str) -> Self {
        Self::new(user_id, "medic")
    }

    pub fn lead(user_id: &str) -> Self {
        Self::new(user_id, "lead")
    }

    pub fn to_json(&self) -> Value {
        json!({
            "user_id": self.user_id,
            "first_name": self.first_name,
            "last_name": self.last_name,
            "email": self.email,
            "phone": null,
            "role": self.role
        })
    }
}

/// Canned payloads shaped like the roster API's responses.
pub struct MockRosterResponses;

impl MockRosterResponses {
    pub fn members_response(members: &[TestMember]) -> Value {
        json!({
            "members": members.iter().map(TestMember::to_json).collect::<Vec<_>>()
        })
    }

    /// A full month of days; `assigned` lists `(day_of_month, medic_id)` pairs.
    pub fn schedule_response(center_id: &str, month: Month, assigned: &[(u32, &str)]) -> Value {
        let days: Vec<Value> = month
            .days()
            .map(|date| {
                let medic = assigned
                    .iter()
                    .find(|(day, _)| date.day() == *day)
                    .map(|(_, medic)| *medic);

                json!({
                    "date": date.format("%Y-%m-%d").to_string(),
                    "assigned": medic.is_some(),
                    "medic_id": medic,
                    "medic_first_name": medic.map(|m| format!("First-{}", m)),
                    "medic_last_name": medic.map(|m| format!("Last-{}", m)),
                    "medic_email": medic.map(|m| format!("{}@roster.test", m)),
                })
            })
            .collect();

        json!({
            "center_id": center_id,
            "month": month.to_string(),
            "days": days
        })
    }

    pub fn user_response(user_id: &str, status: &str) -> Value {
        json!({
            "id": user_id,
            "first_name": "Test",
            "last_name": "User",
            "email": "test@roster.test",
            "global_role": "medic",
            "status": status,
            "phone": null
        })
    }

    pub fn login_response(user_id: &str, token: &str) -> Value {
        json!({
            "access_token": token,
            "user": Self::user_response(user_id, "approved")
        })
    }

    pub fn centers_response() -> Value {
        json!({
            "centers": [
                { "_id": "c1", "name": "SMURD Cluj", "location": "Cluj-Napoca" },
                { "_id": "c2", "name": "UPU Iasi", "location": null }
            ]
        })
    }

    pub fn error_response(message: &str) -> Value {
        json!({ "error": message })
    }
}
