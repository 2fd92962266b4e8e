use chrono::NaiveDate;
use thiserror::Error;

use shared_models::AppError;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Failed to fetch {what} for center {center_id}: {source}")]
    FetchFailure {
        what: &'static str,
        center_id: String,
        #[source]
        source: AppError,
    },

    #[error("No eligible members to assign in center {0}")]
    NoEligibleMembers(String),

    #[error("Assignment of {member_id} on {date} rejected: {source}")]
    AssignmentRejected {
        member_id: String,
        date: NaiveDate,
        #[source]
        source: AppError,
    },
}
