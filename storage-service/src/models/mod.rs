pub mod message;
pub mod stored_file;

pub use message::Message;
pub use stored_file::StoredFile;
