use serde::{Deserialize, Serialize};

/// Listing view of a blob in the file store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredFile {
    pub filename: String,
    pub length: u64,
}
