use crate::domain_model::SubjectId;
use crate::domain_port::TokenStoreError;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Authorized,
    /// Covers both "never granted" and "expired". Callers cannot tell the
    /// two apart, which keeps the re-verification path uniform.
    Unauthorized,
}

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("store error: {0}")]
    Store(#[from] TokenStoreError),
}

/// Single authorization decision point consumed by the relay pipeline.
#[async_trait::async_trait]
pub trait AccessGate: Send + Sync {
    async fn authorize(&self, subject: SubjectId) -> Result<AccessDecision, AccessError>;

    /// Issue or refresh the subject's access window. Repeated calls reset
    /// the window rather than extending it.
    async fn grant_access(&self, subject: SubjectId) -> Result<DateTime<Utc>, AccessError>;
}
