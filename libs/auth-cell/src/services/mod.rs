pub mod account;
pub mod admin;
pub mod directory;

pub use account::AccountService;
pub use admin::AdminService;
pub use directory::DirectoryService;
