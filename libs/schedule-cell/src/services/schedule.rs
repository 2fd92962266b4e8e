use std::collections::BTreeMap;

use anyhow::Result;
use chrono::NaiveDate;
use reqwest::Method;
use tracing::{debug, info};

use shared_client::RosterApiClient;
use shared_config::AppConfig;
use shared_models::MessageResponse;
use shared_utils::{format_date, Month};

use crate::models::{AssignShiftRequest, ScheduleDay, ScheduleMonthResponse};

/// Whether `set_day` created a new shift or replaced the existing holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetDayOutcome {
    Assigned,
    Replaced,
}

pub struct ScheduleService {
    client: RosterApiClient,
}

impl ScheduleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: RosterApiClient::new(config),
        }
    }

    pub async fn get_month(
        &self,
        center_id: &str,
        month: Month,
        auth_token: &str,
    ) -> Result<ScheduleMonthResponse> {
        debug!("Fetching schedule for center {} month {}", center_id, month);

        let path = format!(
            "/centers/{}/schedule?month={}",
            center_id,
            urlencoding::encode(&month.to_string())
        );
        let response: ScheduleMonthResponse = self.client.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        Ok(response)
    }

    /// The month with every missing day filled in as unassigned
    pub async fn get_full_month(
        &self,
        center_id: &str,
        month: Month,
        auth_token: &str,
    ) -> Result<Vec<ScheduleDay>> {
        let response = self.get_month(center_id, month, auth_token).await?;
        Ok(normalize_month(month, response.days))
    }

    pub async fn assign(
        &self,
        center_id: &str,
        medic_id: &str,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<MessageResponse> {
        debug!("Assigning {} on {} in center {}", medic_id, date, center_id);
        self.write_shift(Method::POST, center_id, medic_id, date, auth_token).await
    }

    pub async fn replace(
        &self,
        center_id: &str,
        medic_id: &str,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<MessageResponse> {
        debug!("Replacing holder of {} in center {} with {}", date, center_id, medic_id);
        self.write_shift(Method::PUT, center_id, medic_id, date, auth_token).await
    }

    pub async fn unassign(
        &self,
        center_id: &str,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<MessageResponse> {
        let path = format!("/centers/{}/schedule/{}", center_id, format_date(date));
        let response = self.client.request(
            Method::DELETE,
            &path,
            Some(auth_token),
            None,
        ).await?;

        info!("Cleared {} in center {}", date, center_id);
        Ok(response)
    }

    /// Assigns a free day or replaces the member already holding it.
    pub async fn set_day(
        &self,
        center_id: &str,
        medic_id: &str,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<SetDayOutcome> {
        let days = self.get_full_month(center_id, Month::of(date), auth_token).await?;
        let taken = days
            .iter()
            .any(|day| day.date == date && day.assignee().is_some());

        if taken {
            self.replace(center_id, medic_id, date, auth_token).await?;
            Ok(SetDayOutcome::Replaced)
        } else {
            self.assign(center_id, medic_id, date, auth_token).await?;
            Ok(SetDayOutcome::Assigned)
        }
    }

    async fn write_shift(
        &self,
        method: Method,
        center_id: &str,
        medic_id: &str,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<MessageResponse> {
        let path = format!("/centers/{}/schedule", center_id);
        let body = AssignShiftRequest {
            medic_id: medic_id.to_string(),
            date,
        };

        Ok(self.client.request(
            method,
            &path,
            Some(auth_token),
            Some(serde_json::to_value(&body)?),
        ).await?)
    }
}

/// One entry per day of `month`, in order. Days the API left out are unassigned;
/// days outside the month are dropped.
pub fn normalize_month(month: Month, days: Vec<ScheduleDay>) -> Vec<ScheduleDay> {
    let mut by_date: BTreeMap<NaiveDate, ScheduleDay> = days
        .into_iter()
        .filter(|day| month.contains(day.date))
        .map(|day| (day.date, day))
        .collect();

    month
        .days()
        .map(|date| by_date.remove(&date).unwrap_or_else(|| ScheduleDay::unassigned(date)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, d).unwrap()
    }

    #[test]
    fn normalize_fills_gaps_and_drops_foreign_days() {
        let month: Month = "2026-02".parse().unwrap();
        let days = vec![
            ScheduleDay::assigned_to(date(10), "m1"),
            ScheduleDay::assigned_to(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), "m2"),
        ];

        let full = normalize_month(month, days);

        assert_eq!(full.len(), 28);
        assert_eq!(full[0].date, date(1));
        assert_eq!(full[9].assignee(), Some("m1"));
        assert!(full.iter().all(|day| month.contains(day.date)));
        assert_eq!(full.iter().filter(|day| day.assignee().is_some()).count(), 1);
    }
}
