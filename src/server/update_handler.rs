use crate::application_port::{RelayOutcome, RelayService, VerifyOutcome};
use crate::domain_model::{InboundMessage, SubjectId};
use crate::logger::*;
use crate::telegram::{CallbackQuery, ChatApi, InlineKeyboardButton, InlineKeyboardMarkup, Message, Update};
use std::sync::Arc;

const VERIFY_CALLBACK: &str = "verify";

const ALREADY_VERIFIED: &str = "✅ You already have access! Send your Terabox link.";
const VERIFIED: &str =
    "✅ Verified! You now have access for 24 hours. Send a Terabox link to download.";
const UNAUTHORIZED: &str =
    "⚠️ Your access token is missing or expired.\nPlease click Verify below to get 24-hour access.";
const INVALID_INPUT: &str = "Please send a valid Terabox link.";
const GENERIC_FAILURE: &str = "Something went wrong 🙃";

/// Maps one transport update to pipeline calls, and each terminal outcome
/// to its one notice. Errors here are logged and dropped; they never unwind
/// into the update feed.
pub struct UpdateHandler {
    relay_service: Arc<dyn RelayService>,
    chat: Arc<ChatApi>,
    token_url: String,
    guide_url: String,
}

impl UpdateHandler {
    pub fn new(
        relay_service: Arc<dyn RelayService>,
        chat: Arc<ChatApi>,
        token_url: String,
        guide_url: String,
    ) -> Self {
        UpdateHandler {
            relay_service,
            chat,
            token_url,
            guide_url,
        }
    }

    pub async fn handle_update(&self, update: Update) {
        let result = if let Some(message) = update.message {
            self.handle_message(message).await
        } else if let Some(query) = update.callback_query {
            self.handle_callback(query).await
        } else {
            debug!("update {} carries nothing to handle", update.update_id);
            Ok(())
        };

        if let Err(e) = result {
            error!("handling update {}: {}", update.update_id, e);
        }
    }

    async fn handle_message(&self, message: Message) -> anyhow::Result<()> {
        let Some(from) = message.from.as_ref() else {
            // Channel posts and service messages have no sender to gate.
            return Ok(());
        };
        let subject = SubjectId(from.id);
        let chat_id = message.chat.id;
        let text = message.text.clone().unwrap_or_default();

        if text.starts_with("/start") {
            return self.handle_start(subject, chat_id, from.first_name.as_deref()).await;
        }

        let outcome = self
            .relay_service
            .handle_message(InboundMessage {
                sender: subject,
                text,
            })
            .await;
        self.render_outcome(chat_id, outcome).await
    }

    async fn handle_start(
        &self,
        subject: SubjectId,
        chat_id: i64,
        first_name: Option<&str>,
    ) -> anyhow::Result<()> {
        if self.relay_service.has_access(subject).await {
            return self.chat.send_message(chat_id, ALREADY_VERIFIED, None).await;
        }

        let greeting = format!(
            "Hi {},\n\nAccess token required to use this bot.\n\nGet access for 24 hours by clicking Verify.",
            first_name.unwrap_or("there"),
        );
        self.chat
            .send_message(chat_id, &greeting, Some(self.start_keyboard()))
            .await
    }

    async fn handle_callback(&self, query: CallbackQuery) -> anyhow::Result<()> {
        if query.data.as_deref() != Some(VERIFY_CALLBACK) {
            debug!("ignoring unknown callback: {:?}", query.data);
            return Ok(());
        }

        let subject = SubjectId(query.from.id);
        match self.relay_service.handle_verification(subject).await {
            VerifyOutcome::Granted { .. } => {
                self.chat.answer_callback_query(&query.id).await?;
                // Turn the prompt into the confirmation, or fall back to a
                // fresh message when the prompt is no longer addressable.
                match query.message {
                    Some(prompt) => {
                        self.chat
                            .edit_message_text(prompt.chat.id, prompt.message_id, VERIFIED)
                            .await
                    }
                    None => self.chat.send_message(query.from.id, VERIFIED, None).await,
                }
            }
            VerifyOutcome::Failed => {
                self.chat.answer_callback_query(&query.id).await?;
                self.chat
                    .send_message(query.from.id, GENERIC_FAILURE, None)
                    .await
            }
        }
    }

    async fn render_outcome(&self, chat_id: i64, outcome: RelayOutcome) -> anyhow::Result<()> {
        match outcome {
            RelayOutcome::Unauthorized => {
                self.chat
                    .send_message(chat_id, UNAUTHORIZED, Some(self.verify_keyboard()))
                    .await
            }
            RelayOutcome::InvalidInput => self.chat.send_message(chat_id, INVALID_INPUT, None).await,
            RelayOutcome::ResolutionFailed
            | RelayOutcome::DeliveryFailed
            | RelayOutcome::Failed => {
                self.chat.send_message(chat_id, GENERIC_FAILURE, None).await
            }
            // The delivered file is the response; the in-progress notice
            // already went out with it.
            RelayOutcome::Delivered => Ok(()),
        }
    }

    fn verify_keyboard(&self) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup {
            inline_keyboard: vec![
                vec![InlineKeyboardButton::callback(
                    "✅ I Have Token - Verify",
                    VERIFY_CALLBACK,
                )],
                vec![InlineKeyboardButton::url("🔗 Get Token", &self.token_url)],
            ],
        }
    }

    fn start_keyboard(&self) -> InlineKeyboardMarkup {
        let mut keyboard = self.verify_keyboard();
        keyboard
            .inline_keyboard
            .push(vec![InlineKeyboardButton::url(
                "📘 How to Use",
                &self.guide_url,
            )]);
        keyboard
    }
}
