pub mod center;
pub mod membership;
pub mod report;

pub use center::CenterService;
pub use membership::MembershipService;
pub use report::ReportService;
