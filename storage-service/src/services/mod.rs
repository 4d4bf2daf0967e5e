pub mod database;
pub mod storage;

pub use database::MongoDb;
pub use storage::{MemoryStorage, MongoStorage, Storage};
