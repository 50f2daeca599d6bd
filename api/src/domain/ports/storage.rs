//! File storage port
//!
//! Uploaded documents (technical sheets, invoice PDFs, payment supports) are
//! stored through this trait and referenced by the relative path it returns.

use async_trait::async_trait;

use crate::error::StorageError;

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store `bytes` as `dir/name` and return the relative path
    async fn put(&self, dir: &str, name: &str, bytes: &[u8]) -> Result<String, StorageError>;

    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Remove a stored file; missing files are not an error
    async fn delete(&self, path: &str) -> Result<(), StorageError>;
}
