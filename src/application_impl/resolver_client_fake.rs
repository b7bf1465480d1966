use crate::application_port::{ResolutionResult, ResolverClient};
use crate::domain_model::{DirectLink, Reference};

/// Minimal fake implementation for basic use only.
/// Resolves every reference to a canned link; a reference containing
/// "unresolvable" simulates an upstream failure.
#[derive(Debug)]
pub struct FakeResolverClient;

impl FakeResolverClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ResolverClient for FakeResolverClient {
    async fn resolve(&self, reference: &Reference) -> ResolutionResult {
        if reference.0.contains("unresolvable") {
            ResolutionResult::Failed
        } else {
            ResolutionResult::Resolved {
                direct_link: DirectLink("https://files.example.net/fake".to_string()),
            }
        }
    }
}
