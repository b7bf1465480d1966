use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::LinkExtractor;
use crate::domain_port::*;
use crate::infra_file::*;
use crate::infra_http::*;
use crate::infra_memory::*;
use crate::logger::*;
use crate::server::{Poller, UpdateHandler};
use crate::settings::Settings;
use crate::telegram::ChatApi;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct Server {
    pub relay_service: Arc<dyn RelayService>,
    pub update_handler: Arc<UpdateHandler>,
    pub chat: Arc<ChatApi>,
    cancel: CancellationToken,
    poller_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let token_store: Arc<dyn TokenStore> = match settings.store.backend.as_str() {
            "file" => Arc::new(FileTokenStore::new(
                &settings.store.token_file,
                settings.store.valid_hours,
            )),
            "memory" => Arc::new(MemoryTokenStore::new(settings.store.valid_hours)),
            other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        };
        let access_gate: Arc<dyn AccessGate> = Arc::new(RealAccessGate::new(token_store));

        let chat = Arc::new(ChatApi::new(
            &settings.bot.api_base,
            &settings.bot.credential,
        ));

        let resolver_client: Arc<dyn ResolverClient> = match settings.resolver.backend.as_str() {
            "fake" => Arc::new(FakeResolverClient::new()),
            "real" => Arc::new(HttpResolverClient::new(&settings.resolver.endpoint)),
            other => return Err(anyhow::anyhow!("Unknown resolver backend: {}", other)),
        };

        let file_relay: Arc<dyn FileRelay> = chat.clone();

        let link_extractor = LinkExtractor::new(settings.link.markers.clone());

        let relay_service: Arc<dyn RelayService> = Arc::new(RealRelayService::new(
            access_gate,
            link_extractor,
            resolver_client,
            file_relay,
        ));

        let update_handler = Arc::new(UpdateHandler::new(
            relay_service.clone(),
            chat.clone(),
            settings.bot.token_url.clone(),
            settings.bot.guide_url.clone(),
        ));

        info!("relay wired up");

        Ok(Self {
            relay_service,
            update_handler,
            chat,
            cancel: CancellationToken::new(),
            poller_handle: Mutex::new(None),
        })
    }

    /// Start the long-poll update feed. Webhook mode skips this and feeds
    /// updates through the HTTP route instead.
    pub fn start_polling(&self) {
        let poller = Poller::new(
            self.chat.clone(),
            self.update_handler.clone(),
            self.cancel.clone(),
        );
        let handle = tokio::spawn(async move { poller.run().await });
        if let Ok(mut lock) = self.poller_handle.lock() {
            *lock = Some(handle);
        }
    }

    pub async fn shutdown(&self) {
        info!("relay shutting down...");

        self.cancel.cancel();

        let handle = match self.poller_handle.lock() {
            Ok(mut lock) => lock.take(),
            Err(_) => None,
        };
        if let Some(handle) = handle {
            let r = handle.await;
            info!("poller handle dropped: {:?}", r);
        }
    }
}
