pub mod files;
pub mod health;
pub mod messages;

pub use files::{list_files, read_root, upload_file};
pub use health::{health_check, metrics_endpoint, readiness_check};
pub use messages::submit_message;
