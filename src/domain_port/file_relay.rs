use crate::domain_model::{DirectLink, SubjectId};

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("delivery failed: {0}")]
    Send(String),
}

/// File-transmission collaborator: pushes the file behind a resolved direct
/// link into the subject's chat.
#[async_trait::async_trait]
pub trait FileRelay: Send + Sync {
    async fn deliver(&self, subject: SubjectId, link: &DirectLink) -> Result<(), DeliveryError>;
}
