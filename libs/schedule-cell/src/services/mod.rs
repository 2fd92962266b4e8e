pub mod auto_assign;
pub mod personal;
pub mod schedule;

pub use auto_assign::{
    AssignPass, AutoAssignSummary, AutoAssigner, CenterScheduleApi, ScheduleApi,
};
pub use personal::{BusyToggle, PersonalCalendarService};
pub use schedule::{ScheduleService, SetDayOutcome};
