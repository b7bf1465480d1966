use crate::application_port::{AccessDecision, AccessError, AccessGate};
use crate::domain_model::SubjectId;
use crate::domain_port::TokenStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub struct RealAccessGate {
    token_store: Arc<dyn TokenStore>,
}

impl RealAccessGate {
    pub fn new(token_store: Arc<dyn TokenStore>) -> Self {
        RealAccessGate { token_store }
    }
}

#[async_trait::async_trait]
impl AccessGate for RealAccessGate {
    async fn authorize(&self, subject: SubjectId) -> Result<AccessDecision, AccessError> {
        if self.token_store.is_valid(subject).await? {
            Ok(AccessDecision::Authorized)
        } else {
            Ok(AccessDecision::Unauthorized)
        }
    }

    async fn grant_access(&self, subject: SubjectId) -> Result<DateTime<Utc>, AccessError> {
        Ok(self.token_store.grant(subject).await?)
    }
}
