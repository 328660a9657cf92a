pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::routes;

pub const MSG_UPDATE_FAILED: &str = "record not found or invalid parameter";
pub const MSG_RECORD_NOT_FOUND: &str = "record not found";
