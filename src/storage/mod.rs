mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Key/value holder for credentials. How and where values are persisted is up
/// to the backend; callers only see presence.
pub trait CredentialStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn del(&self, key: &str) -> Result<(), StorageError>;
}
