use crate::domain_model::{SubjectId, TokenRecord};
use crate::domain_port::{TokenStore, TokenStoreError};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory token store backing the `"memory"` setting and the test
/// suites. Unlike the file store, `grant` here runs under one lock, so
/// concurrent grants do not race.
pub struct MemoryTokenStore {
    tokens: Mutex<HashMap<SubjectId, TokenRecord>>,
    valid_for: Duration,
}

impl MemoryTokenStore {
    pub fn new(valid_hours: i64) -> Self {
        MemoryTokenStore {
            tokens: Mutex::new(HashMap::new()),
            valid_for: Duration::hours(valid_hours),
        }
    }

    fn locked(&self) -> Result<std::sync::MutexGuard<'_, HashMap<SubjectId, TokenRecord>>, TokenStoreError> {
        self.tokens
            .lock()
            .map_err(|_| TokenStoreError::Read("token map poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<HashMap<SubjectId, TokenRecord>, TokenStoreError> {
        Ok(self.locked()?.clone())
    }

    async fn save(&self, tokens: &HashMap<SubjectId, TokenRecord>) -> Result<(), TokenStoreError> {
        *self.locked()? = tokens.clone();
        Ok(())
    }

    async fn grant(&self, subject: SubjectId) -> Result<DateTime<Utc>, TokenStoreError> {
        let expires_at = Utc::now() + self.valid_for;
        self.locked()?.insert(subject, TokenRecord { expires_at });
        Ok(expires_at)
    }

    async fn is_valid(&self, subject: SubjectId) -> Result<bool, TokenStoreError> {
        let now = Utc::now();
        Ok(self
            .locked()?
            .get(&subject)
            .is_some_and(|record| record.is_live_at(now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_empty_and_invalid() {
        let store = MemoryTokenStore::new(24);

        assert!(store.load().await.unwrap().is_empty());
        assert!(!store.is_valid(SubjectId(1)).await.unwrap());
    }

    #[tokio::test]
    async fn save_replaces_the_whole_mapping() {
        let store = MemoryTokenStore::new(24);
        store.grant(SubjectId(1)).await.unwrap();
        store.grant(SubjectId(2)).await.unwrap();

        let mut replacement = HashMap::new();
        replacement.insert(
            SubjectId(3),
            TokenRecord {
                expires_at: Utc::now() + Duration::hours(1),
            },
        );
        store.save(&replacement).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_key(&SubjectId(3)));
    }

    #[tokio::test]
    async fn expired_record_is_invalid_but_not_removed() {
        let store = MemoryTokenStore::new(0);
        store.grant(SubjectId(1)).await.unwrap();

        assert!(!store.is_valid(SubjectId(1)).await.unwrap());
        assert_eq!(store.load().await.unwrap().len(), 1);
    }
}
