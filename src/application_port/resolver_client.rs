use crate::domain_model::{DirectLink, Reference};

/// Outcome of one metadata-service lookup. Upstream failures of any shape
/// (transport, status, body) normalize to `Failed` inside the client and
/// never cross this boundary as errors. A payload claiming success without
/// shipping a direct link is also `Failed`; the upstream contract is not
/// trusted that far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult {
    Resolved { direct_link: DirectLink },
    Failed,
}

impl ResolutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ResolutionResult::Resolved { .. })
    }
}

#[async_trait::async_trait]
pub trait ResolverClient: Send + Sync {
    async fn resolve(&self, reference: &Reference) -> ResolutionResult;
}
