use crate::domain_model::{SubjectId, TokenRecord};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("store read error: {0}")]
    Read(String),
    #[error("store write error: {0}")]
    Write(String),
}

/// Durable mapping of subject identity to access-window expiry.
///
/// `grant` is composed as load-modify-save with no lock: two concurrent
/// grants for the same subject race, and the last save to complete wins.
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    /// Full current mapping. A store that does not exist yet is an empty
    /// mapping, not an error.
    async fn load(&self) -> Result<HashMap<SubjectId, TokenRecord>, TokenStoreError>;

    /// Replace the entire persisted mapping. Readers never observe a
    /// partially written mapping.
    async fn save(&self, tokens: &HashMap<SubjectId, TokenRecord>) -> Result<(), TokenStoreError>;

    /// Overwrite the subject's record with a fresh expiry and persist.
    /// Returns the new expiry instant.
    async fn grant(&self, subject: SubjectId) -> Result<DateTime<Utc>, TokenStoreError>;

    /// Whether the subject holds a record that has not yet expired. Expired
    /// records are left in place, not cleaned up.
    async fn is_valid(&self, subject: SubjectId) -> Result<bool, TokenStoreError>;
}
