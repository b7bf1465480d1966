use relaybox::application_impl::*;
use relaybox::application_port::*;
use relaybox::domain_model::*;
use relaybox::infra_memory::MemoryTokenStore;
use std::sync::Arc;

/// Runs the whole pipeline against the fake resolver and fake file relay,
/// no network or chat transport required.
#[tokio::main]
async fn main() {
    let store = Arc::new(MemoryTokenStore::new(24));
    let gate = Arc::new(RealAccessGate::new(store));
    let relay = Arc::new(FakeFileRelay::new());
    let service = RealRelayService::new(
        gate,
        LinkExtractor::new(vec!["terabox.com".to_string(), "teraboxapp.com".to_string()]),
        Arc::new(FakeResolverClient::new()),
        relay.clone(),
    );

    let subject = SubjectId(1);
    let reference = "https://terabox.com/s/abc".to_string();

    let outcome = service
        .handle_message(InboundMessage {
            sender: subject,
            text: reference.clone(),
        })
        .await;
    println!("before verification: {:?}", outcome);

    let outcome = service.handle_verification(subject).await;
    println!("verification: {:?}", outcome);

    let outcome = service
        .handle_message(InboundMessage {
            sender: subject,
            text: "hello world".to_string(),
        })
        .await;
    println!("plain text: {:?}", outcome);

    let outcome = service
        .handle_message(InboundMessage {
            sender: subject,
            text: reference,
        })
        .await;
    println!("reference: {:?}", outcome);
    println!("deliveries: {:?}", relay.deliveries());
}
