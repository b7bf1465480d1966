use crate::domain_model::{SubjectId, TokenRecord};
use crate::domain_port::{TokenStore, TokenStoreError};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::path::PathBuf;

/// Token store backed by a single JSON file: an object mapping subject
/// identities to `{ "expires_at": <ISO-8601> }`, rewritten whole on every
/// grant. No schema versioning.
pub struct FileTokenStore {
    path: PathBuf,
    valid_for: Duration,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>, valid_hours: i64) -> Self {
        FileTokenStore {
            path: path.into(),
            valid_for: Duration::hours(valid_hours),
        }
    }
}

#[async_trait::async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<HashMap<SubjectId, TokenRecord>, TokenStoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            // A store that was never written is an empty mapping, not an
            // error.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(TokenStoreError::Read(e.to_string())),
        };
        serde_json::from_slice(&bytes).map_err(|e| TokenStoreError::Read(e.to_string()))
    }

    async fn save(&self, tokens: &HashMap<SubjectId, TokenRecord>) -> Result<(), TokenStoreError> {
        let bytes =
            serde_json::to_vec_pretty(tokens).map_err(|e| TokenStoreError::Write(e.to_string()))?;

        // Write a sibling file and rename it over the store, so a concurrent
        // load never observes a partially written mapping.
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, &bytes)
            .await
            .map_err(|e| TokenStoreError::Write(e.to_string()))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| TokenStoreError::Write(e.to_string()))?;
        Ok(())
    }

    async fn grant(&self, subject: SubjectId) -> Result<DateTime<Utc>, TokenStoreError> {
        let mut tokens = self.load().await?;
        let expires_at = Utc::now() + self.valid_for;
        tokens.insert(subject, TokenRecord { expires_at });
        self.save(&tokens).await?;
        Ok(expires_at)
    }

    async fn is_valid(&self, subject: SubjectId) -> Result<bool, TokenStoreError> {
        let tokens = self.load().await?;
        let now = Utc::now();
        Ok(tokens
            .get(&subject)
            .is_some_and(|record| record.is_live_at(now)))
    }
}
