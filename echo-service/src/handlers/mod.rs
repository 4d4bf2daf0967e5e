pub mod echo;
pub mod health;

pub use echo::{read_root, submit_message, upload_file};
pub use health::{health_check, metrics_endpoint, readiness_check};
