use crate::config::StorageConfig;
use crate::models::{Message, StoredFile};
use crate::services::MongoDb;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::gridfs::GridFsBucket;
use mongodb::options::GridFsUploadOptions;
use mongodb::Collection;
use service_core::error::AppError;
use service_core::extract::UploadedFile;
use tokio::sync::RwLock;

/// Facade over the blob store and the message collection.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Stores the file bytes verbatim. Same-name uploads create separate entries.
    async fn put_file(&self, file: UploadedFile) -> Result<(), AppError>;
    /// Every stored blob, in the backend's default iteration order.
    async fn list_files(&self) -> Result<Vec<StoredFile>, AppError>;
    async fn insert_message(&self, message: &Message) -> Result<(), AppError>;
    async fn health_check(&self) -> Result<(), AppError>;
}

pub struct MongoStorage {
    db: MongoDb,
    bucket: GridFsBucket,
    messages: Collection<Message>,
}

impl MongoStorage {
    pub fn new(db: MongoDb, config: &StorageConfig) -> Self {
        let bucket = db.gridfs_bucket(&config.gridfs_bucket);
        let messages = db.collection(&config.messages_collection);
        Self {
            db,
            bucket,
            messages,
        }
    }
}

#[async_trait]
impl Storage for MongoStorage {
    async fn put_file(&self, file: UploadedFile) -> Result<(), AppError> {
        let options = GridFsUploadOptions::builder()
            .metadata(doc! { "contentType": file.content_type.clone() })
            .build();

        let size = file.size();
        let source = futures::io::Cursor::new(file.data);
        let file_id = self
            .bucket
            .upload_from_futures_0_3_reader(&file.filename, source, options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to write {} to GridFS: {}", file.filename, e);
                AppError::from(e)
            })?;

        tracing::debug!(file_id = %file_id, filename = %file.filename, size = size, "Stored file in GridFS");
        Ok(())
    }

    async fn list_files(&self) -> Result<Vec<StoredFile>, AppError> {
        let mut cursor = self.bucket.find(doc! {}, None).await.map_err(AppError::from)?;

        let mut files = Vec::new();
        while let Some(entry) = cursor.try_next().await.map_err(AppError::from)? {
            files.push(StoredFile {
                filename: entry.filename.unwrap_or_default(),
                length: entry.length,
            });
        }
        Ok(files)
    }

    async fn insert_message(&self, message: &Message) -> Result<(), AppError> {
        self.messages
            .insert_one(message, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert message: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.db.health_check().await
    }
}

/// Process-local backend. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStorage {
    files: RwLock<Vec<UploadedFile>>,
    messages: RwLock<Vec<Message>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of stored messages in insertion order.
    pub async fn messages(&self) -> Vec<Message> {
        self.messages.read().await.clone()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put_file(&self, file: UploadedFile) -> Result<(), AppError> {
        self.files.write().await.push(file);
        Ok(())
    }

    async fn list_files(&self) -> Result<Vec<StoredFile>, AppError> {
        let files = self.files.read().await;
        Ok(files
            .iter()
            .map(|file| StoredFile {
                filename: file.filename.clone(),
                length: file.size() as u64,
            })
            .collect())
    }

    async fn insert_message(&self, message: &Message) -> Result<(), AppError> {
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
