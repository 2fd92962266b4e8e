pub mod calendar;
pub mod error;
pub mod models;
pub mod services;

pub use calendar::{ClickPolicy, DayInfo, MonthGrid};
pub use error::ScheduleError;
pub use models::*;
pub use services::*;
