pub mod messaging;
pub mod support;

pub use messaging::{dm_conversation_id, MessagingService};
pub use support::SupportService;
