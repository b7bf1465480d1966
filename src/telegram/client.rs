use crate::domain_model::{DirectLink, SubjectId};
use crate::domain_port::{DeliveryError, FileRelay};
use crate::telegram::types::*;
use anyhow::anyhow;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

/// Sent just before the transport is handed the direct link.
const DELIVERY_IN_PROGRESS: &str = "Sending Files. Please wait...";

/// Bot API reply envelope shared by every method.
#[derive(Debug, Deserialize)]
struct ApiReply<T> {
    ok: bool,
    description: Option<String>,
    result: Option<T>,
}

/// Thin client over the chat transport's HTTP API. One method per call the
/// relay makes; the rest of the API is out of scope.
pub struct ChatApi {
    http: reqwest::Client,
    base: String,
}

impl ChatApi {
    pub fn new(api_base: &str, credential: &str) -> Self {
        ChatApi {
            http: reqwest::Client::new(),
            base: format!("{}/bot{}", api_base.trim_end_matches('/'), credential),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> anyhow::Result<T> {
        let reply: ApiReply<T> = self
            .http
            .post(format!("{}/{}", self.base, method))
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if reply.ok {
            reply
                .result
                .ok_or_else(|| anyhow!("{} replied ok without a result", method))
        } else {
            Err(anyhow!(
                "{} rejected: {}",
                method,
                reply.description.unwrap_or_else(|| "no description".to_string())
            ))
        }
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> anyhow::Result<()> {
        let mut body = json!({ "chat_id": chat_id, "text": text });
        if let Some(keyboard) = keyboard {
            body["reply_markup"] = serde_json::to_value(keyboard)?;
        }
        let _: Message = self.call("sendMessage", body).await?;
        Ok(())
    }

    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> anyhow::Result<()> {
        let body = json!({ "chat_id": chat_id, "message_id": message_id, "text": text });
        let _: Message = self.call("editMessageText", body).await?;
        Ok(())
    }

    pub async fn answer_callback_query(&self, callback_query_id: &str) -> anyhow::Result<()> {
        let _: bool = self
            .call(
                "answerCallbackQuery",
                json!({ "callback_query_id": callback_query_id }),
            )
            .await?;
        Ok(())
    }

    /// Long poll for updates. `timeout_secs` rides the request; the server
    /// holds the connection open until something arrives or it elapses.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> anyhow::Result<Vec<Update>> {
        self.call(
            "getUpdates",
            json!({ "offset": offset, "timeout": timeout_secs }),
        )
        .await
    }

    pub async fn set_webhook(&self, url: &str) -> anyhow::Result<()> {
        let _: bool = self.call("setWebhook", json!({ "url": url })).await?;
        Ok(())
    }

    pub async fn delete_webhook(&self) -> anyhow::Result<()> {
        let _: bool = self.call("deleteWebhook", json!({})).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl FileRelay for ChatApi {
    /// Announce the transfer, then hand the direct link to the transport,
    /// which fetches the file and forwards it to the chat itself.
    async fn deliver(&self, subject: SubjectId, link: &DirectLink) -> Result<(), DeliveryError> {
        self.send_message(subject.0, DELIVERY_IN_PROGRESS, None)
            .await
            .map_err(|e| DeliveryError::Send(e.to_string()))?;

        let body = json!({ "chat_id": subject.0, "document": link.0 });
        let _: Message = self
            .call("sendDocument", body)
            .await
            .map_err(|e| DeliveryError::Send(e.to_string()))?;
        Ok(())
    }
}
