use crate::application_port::{
    AccessDecision, AccessError, AccessGate, RelayOutcome, RelayService, ResolutionResult,
    ResolverClient, VerifyOutcome,
};
use crate::domain_model::{InboundMessage, LinkExtractor, SubjectId};
use crate::domain_port::FileRelay;
use crate::logger::*;
use std::sync::Arc;

/// Orchestrates one inbound message through gate, extractor, resolver and
/// file relay. Guarantees exactly one terminal outcome per message; nothing
/// escapes this boundary to crash a handling task.
pub struct RealRelayService {
    access_gate: Arc<dyn AccessGate>,
    link_extractor: LinkExtractor,
    resolver_client: Arc<dyn ResolverClient>,
    file_relay: Arc<dyn FileRelay>,
}

impl RealRelayService {
    pub fn new(
        access_gate: Arc<dyn AccessGate>,
        link_extractor: LinkExtractor,
        resolver_client: Arc<dyn ResolverClient>,
        file_relay: Arc<dyn FileRelay>,
    ) -> Self {
        Self {
            access_gate,
            link_extractor,
            resolver_client,
            file_relay,
        }
    }

    async fn process(&self, message: InboundMessage) -> Result<RelayOutcome, AccessError> {
        // Authorization comes first; an unauthorized sender never reaches
        // the extractor, let alone the resolver.
        match self.access_gate.authorize(message.sender).await? {
            AccessDecision::Authorized => {}
            AccessDecision::Unauthorized => return Ok(RelayOutcome::Unauthorized),
        }

        let Some(reference) = self.link_extractor.extract(&message.text) else {
            return Ok(RelayOutcome::InvalidInput);
        };

        let direct_link = match self.resolver_client.resolve(&reference).await {
            ResolutionResult::Resolved { direct_link } => direct_link,
            ResolutionResult::Failed => return Ok(RelayOutcome::ResolutionFailed),
        };

        match self.file_relay.deliver(message.sender, &direct_link).await {
            Ok(()) => Ok(RelayOutcome::Delivered),
            Err(e) => {
                warn!("delivery to {} failed: {}", message.sender, e);
                Ok(RelayOutcome::DeliveryFailed)
            }
        }
    }
}

#[async_trait::async_trait]
impl RelayService for RealRelayService {
    async fn handle_message(&self, message: InboundMessage) -> RelayOutcome {
        let sender = message.sender;
        match self.process(message).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("relay pipeline error for {}: {}", sender, e);
                RelayOutcome::Failed
            }
        }
    }

    async fn handle_verification(&self, subject: SubjectId) -> VerifyOutcome {
        match self.access_gate.grant_access(subject).await {
            Ok(expires_at) => {
                info!("access granted to {} until {}", subject, expires_at);
                VerifyOutcome::Granted { expires_at }
            }
            Err(e) => {
                error!("granting access to {}: {}", subject, e);
                VerifyOutcome::Failed
            }
        }
    }

    async fn has_access(&self, subject: SubjectId) -> bool {
        match self.access_gate.authorize(subject).await {
            Ok(decision) => decision == AccessDecision::Authorized,
            Err(e) => {
                warn!("authorization check for {}: {}", subject, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::RealAccessGate;
    use crate::domain_model::{DirectLink, Reference};
    use crate::domain_port::{DeliveryError, TokenStore};
    use crate::infra_memory::MemoryTokenStore;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubResolver {
        result: ResolutionResult,
        calls: AtomicUsize,
    }

    impl StubResolver {
        fn resolving(link: &str) -> Self {
            StubResolver {
                result: ResolutionResult::Resolved {
                    direct_link: DirectLink(link.to_string()),
                },
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            StubResolver {
                result: ResolutionResult::Failed,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl ResolverClient for StubResolver {
        async fn resolve(&self, _reference: &Reference) -> ResolutionResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    #[derive(Default)]
    struct RecordingRelay {
        deliveries: Mutex<Vec<(SubjectId, DirectLink)>>,
        fail: bool,
    }

    impl RecordingRelay {
        fn failing() -> Self {
            RecordingRelay {
                deliveries: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn delivery_count(&self) -> usize {
            self.deliveries.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl FileRelay for RecordingRelay {
        async fn deliver(
            &self,
            subject: SubjectId,
            link: &DirectLink,
        ) -> Result<(), DeliveryError> {
            if self.fail {
                return Err(DeliveryError::Send("wire dropped".to_string()));
            }
            self.deliveries
                .lock()
                .unwrap()
                .push((subject, link.clone()));
            Ok(())
        }
    }

    const REFERENCE_TEXT: &str = "https://terabox.com/s/abc";
    const SUBJECT: SubjectId = SubjectId(42);

    fn service(
        store: Arc<dyn TokenStore>,
        resolver: Arc<StubResolver>,
        relay: Arc<RecordingRelay>,
    ) -> RealRelayService {
        RealRelayService::new(
            Arc::new(RealAccessGate::new(store)),
            LinkExtractor::new(vec![
                "terabox.com".to_string(),
                "teraboxapp.com".to_string(),
            ]),
            resolver,
            relay,
        )
    }

    async fn granted_store() -> Arc<dyn TokenStore> {
        let store = Arc::new(MemoryTokenStore::new(24));
        store.grant(SUBJECT).await.unwrap();
        store
    }

    fn message(text: &str) -> InboundMessage {
        InboundMessage {
            sender: SUBJECT,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn unauthorized_sender_is_stopped_before_extraction() {
        let resolver = Arc::new(StubResolver::resolving("https://x"));
        let relay = Arc::new(RecordingRelay::default());
        let service = service(
            Arc::new(MemoryTokenStore::new(24)),
            resolver.clone(),
            relay.clone(),
        );

        // A perfectly valid reference still yields Unauthorized: the gate
        // runs first.
        let outcome = service.handle_message(message(REFERENCE_TEXT)).await;

        assert_eq!(outcome, RelayOutcome::Unauthorized);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
        assert_eq!(relay.delivery_count(), 0);
    }

    #[tokio::test]
    async fn authorized_sender_with_plain_text_gets_invalid_input() {
        let resolver = Arc::new(StubResolver::resolving("https://x"));
        let relay = Arc::new(RecordingRelay::default());
        let service = service(granted_store().await, resolver.clone(), relay);

        let outcome = service.handle_message(message("hello world")).await;

        assert_eq!(outcome, RelayOutcome::InvalidInput);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn upstream_failure_stops_short_of_delivery() {
        let resolver = Arc::new(StubResolver::failing());
        let relay = Arc::new(RecordingRelay::default());
        let service = service(granted_store().await, resolver, relay.clone());

        let outcome = service.handle_message(message(REFERENCE_TEXT)).await;

        assert_eq!(outcome, RelayOutcome::ResolutionFailed);
        assert_eq!(relay.delivery_count(), 0);
    }

    #[tokio::test]
    async fn resolved_reference_is_delivered() {
        let resolver = Arc::new(StubResolver::resolving("https://files.example.net/abc"));
        let relay = Arc::new(RecordingRelay::default());
        let service = service(granted_store().await, resolver, relay.clone());

        let outcome = service.handle_message(message(REFERENCE_TEXT)).await;

        assert_eq!(outcome, RelayOutcome::Delivered);
        let deliveries = relay.deliveries.lock().unwrap();
        assert_eq!(
            deliveries.as_slice(),
            &[(
                SUBJECT,
                DirectLink("https://files.example.net/abc".to_string())
            )]
        );
    }

    #[tokio::test]
    async fn delivery_error_downgrades_to_delivery_failed() {
        let resolver = Arc::new(StubResolver::resolving("https://x"));
        let relay = Arc::new(RecordingRelay::failing());
        let service = service(granted_store().await, resolver, relay);

        let outcome = service.handle_message(message(REFERENCE_TEXT)).await;

        assert_eq!(outcome, RelayOutcome::DeliveryFailed);
    }

    #[tokio::test]
    async fn verification_opens_the_window_for_later_messages() {
        let resolver = Arc::new(StubResolver::resolving("https://x"));
        let relay = Arc::new(RecordingRelay::default());
        let service = service(
            Arc::new(MemoryTokenStore::new(24)),
            resolver,
            relay,
        );

        assert!(!service.has_access(SUBJECT).await);
        let outcome = service.handle_verification(SUBJECT).await;
        assert!(matches!(outcome, VerifyOutcome::Granted { .. }));
        assert!(service.has_access(SUBJECT).await);

        let outcome = service.handle_message(message(REFERENCE_TEXT)).await;
        assert_eq!(outcome, RelayOutcome::Delivered);
    }
}
