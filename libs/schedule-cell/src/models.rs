use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of a center's month as the schedule endpoint reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub assigned: bool,
    #[serde(default)]
    pub medic_id: Option<String>,
    #[serde(default)]
    pub medic_first_name: Option<String>,
    #[serde(default)]
    pub medic_last_name: Option<String>,
    #[serde(default)]
    pub medic_email: Option<String>,
}

impl ScheduleDay {
    pub fn unassigned(date: NaiveDate) -> Self {
        Self {
            date,
            assigned: false,
            medic_id: None,
            medic_first_name: None,
            medic_last_name: None,
            medic_email: None,
        }
    }

    pub fn assigned_to(date: NaiveDate, medic_id: &str) -> Self {
        Self {
            assigned: true,
            medic_id: Some(medic_id.to_string()),
            ..Self::unassigned(date)
        }
    }

    /// The member holding the day, if it is really assigned.
    pub fn assignee(&self) -> Option<&str> {
        if self.assigned {
            self.medic_id.as_deref().filter(|id| !id.is_empty())
        } else {
            None
        }
    }

    pub fn medic_name(&self) -> Option<String> {
        let name = [self.medic_first_name.as_deref(), self.medic_last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if name.is_empty() {
            self.medic_email.clone()
        } else {
            Some(name)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleMonthResponse {
    #[serde(default)]
    pub center_id: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub days: Vec<ScheduleDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignShiftRequest {
    pub medic_id: String,
    pub date: NaiveDate,
}

/// A shift of the signed-in user, from `/my/schedule`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyShift {
    pub date: NaiveDate,
    pub center_id: String,
    #[serde(default)]
    pub center_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyScheduleResponse {
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub days: Vec<MyShift>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusyDaysResponse {
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub days: Vec<NaiveDate>,
}
