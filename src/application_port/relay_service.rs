use crate::domain_model::{InboundMessage, SubjectId};
use chrono::{DateTime, Utc};

/// Terminal outcome of one inbound message. Every message produces exactly
/// one of these; the chat transport renders the matching notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Unauthorized,
    InvalidInput,
    ResolutionFailed,
    Delivered,
    DeliveryFailed,
    /// Downgrade for unexpected internal errors caught at the pipeline
    /// boundary. Renders as the same generic failure notice as the failed
    /// states above.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Granted { expires_at: DateTime<Utc> },
    Failed,
}

#[async_trait::async_trait]
pub trait RelayService: Send + Sync {
    /// Run gate, extractor, resolver and file relay for one message.
    async fn handle_message(&self, message: InboundMessage) -> RelayOutcome;

    /// Verification action: issue or refresh the sender's access window.
    async fn handle_verification(&self, subject: SubjectId) -> VerifyOutcome;

    /// Whether the subject currently holds a live access window.
    async fn has_access(&self, subject: SubjectId) -> bool;
}
