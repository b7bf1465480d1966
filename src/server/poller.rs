use crate::logger::*;
use crate::server::UpdateHandler;
use crate::telegram::ChatApi;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const POLL_TIMEOUT_SECS: u64 = 30;
const RETRY_DELAY: Duration = Duration::from_secs(3);

/// Long-poll update source, used when no externally reachable callback
/// address is configured.
pub struct Poller {
    chat: Arc<ChatApi>,
    handler: Arc<UpdateHandler>,
    cancel: CancellationToken,
}

impl Poller {
    pub fn new(chat: Arc<ChatApi>, handler: Arc<UpdateHandler>, cancel: CancellationToken) -> Self {
        Poller {
            chat,
            handler,
            cancel,
        }
    }

    pub async fn run(&self) {
        let mut offset = 0i64;
        loop {
            let polled = tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("poller stopping");
                    return;
                }
                polled = self.chat.get_updates(offset, POLL_TIMEOUT_SECS) => polled,
            };

            let updates = match polled {
                Ok(updates) => updates,
                Err(e) => {
                    warn!("polling updates: {}", e);
                    tokio::time::sleep(RETRY_DELAY).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                let handler = self.handler.clone();
                // One fire-and-forget task per inbound update; tasks are not
                // ordered relative to one another.
                tokio::spawn(async move {
                    handler.handle_update(update).await;
                });
            }
        }
    }
}
