use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use shared_client::RosterApiClient;
use shared_config::AppConfig;
use shared_models::MessageResponse;
use shared_utils::{format_date, Month};

use crate::calendar::{ClickPolicy, DayInfo, MonthGrid};
use crate::models::{BusyDaysResponse, MyScheduleResponse, MyShift};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyToggle {
    Marked,
    Cleared,
}

/// The signed-in member's own shifts and busy days.
pub struct PersonalCalendarService {
    client: RosterApiClient,
}

impl PersonalCalendarService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: RosterApiClient::new(config),
        }
    }

    pub async fn my_schedule(&self, month: Month, auth_token: &str) -> Result<Vec<MyShift>> {
        debug!("Fetching my shifts for {}", month);

        let path = format!("/my/schedule?month={}", urlencoding::encode(&month.to_string()));
        let response: MyScheduleResponse = self.client.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        Ok(response.days)
    }

    pub async fn busy_days(&self, month: Month, auth_token: &str) -> Result<Vec<NaiveDate>> {
        let path = format!("/my/busy?month={}", urlencoding::encode(&month.to_string()));
        let response: BusyDaysResponse = self.client.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        Ok(response.days)
    }

    pub async fn add_busy(&self, date: NaiveDate, auth_token: &str) -> Result<MessageResponse> {
        Ok(self.client.request(
            Method::POST,
            "/my/busy",
            Some(auth_token),
            Some(json!({ "date": format_date(date) })),
        ).await?)
    }

    pub async fn remove_busy(&self, date: NaiveDate, auth_token: &str) -> Result<MessageResponse> {
        let path = format!("/my/busy/{}", format_date(date));
        Ok(self.client.request(
            Method::DELETE,
            &path,
            Some(auth_token),
            None,
        ).await?)
    }

    pub async fn day_map(&self, month: Month, auth_token: &str) -> Result<BTreeMap<NaiveDate, DayInfo>> {
        let shifts = self.my_schedule(month, auth_token).await?;
        let busy = self.busy_days(month, auth_token).await?;
        Ok(merge_personal_days(&shifts, &busy))
    }

    /// Flips the busy flag of a day. Past days and days that already hold a
    /// shift are refused.
    pub async fn toggle_busy(&self, date: NaiveDate, today: NaiveDate, auth_token: &str) -> Result<BusyToggle> {
        let month = Month::of(date);
        let days = self.day_map(month, auth_token).await?;
        let grid = MonthGrid::build(month, &days, ClickPolicy::forced(true).not_before(today));

        let info = grid
            .click(date, |_, info| info.cloned().unwrap_or_default())
            .ok_or_else(|| anyhow!("{} is in the past and can no longer be changed", format_date(date)))?;

        if info.assigned {
            return Err(anyhow!("You already have a shift on {}", format_date(date)));
        }

        if info.busy {
            self.remove_busy(date, auth_token).await?;
            info!("Cleared busy mark on {}", date);
            Ok(BusyToggle::Cleared)
        } else {
            self.add_busy(date, auth_token).await?;
            info!("Marked {} as busy", date);
            Ok(BusyToggle::Marked)
        }
    }
}

/// Shifts first, then busy marks layered on top.
pub fn merge_personal_days(shifts: &[MyShift], busy: &[NaiveDate]) -> BTreeMap<NaiveDate, DayInfo> {
    let mut days: BTreeMap<NaiveDate, DayInfo> = shifts
        .iter()
        .map(|shift| (shift.date, DayInfo::from(shift)))
        .collect();

    for date in busy {
        days.entry(*date).or_default().busy = true;
    }

    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn busy_marks_layer_over_shifts() {
        let shifts = vec![MyShift {
            date: date(3),
            center_id: "c1".into(),
            center_name: Some("SMURD Cluj".into()),
        }];
        let busy = vec![date(3), date(4)];

        let days = merge_personal_days(&shifts, &busy);

        assert_eq!(days.len(), 2);
        assert!(days[&date(3)].assigned);
        assert!(days[&date(3)].busy);
        assert_eq!(days[&date(3)].center_name.as_deref(), Some("SMURD Cluj"));
        assert!(!days[&date(4)].assigned);
        assert!(days[&date(4)].busy);
    }
}
