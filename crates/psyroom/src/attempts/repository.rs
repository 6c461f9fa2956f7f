use super::domain::{AttemptId, AttemptRecord};

/// Persistence sink for scored attempts.
pub trait AttemptRepository: Send + Sync {
    fn insert(&self, record: AttemptRecord) -> Result<AttemptRecord, RepositoryError>;
    fn fetch(&self, id: &AttemptId) -> Result<Option<AttemptRecord>, RepositoryError>;
    /// Most recent attempts first.
    fn recent(&self, limit: usize) -> Result<Vec<AttemptRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
