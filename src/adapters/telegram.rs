use crate::domain::ports::Notifier;
use crate::utils::error::{NotifierError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    description: Option<String>,
}

/// Posts messages to one chat through the Telegram Bot API.
pub struct TelegramNotifier {
    http: Client,
    endpoint: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
        })
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.endpoint, self.token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let response = self
            .http
            .post(self.send_message_url())
            .json(&SendMessageRequest {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        // Proxies in front of the Bot API may answer with non-JSON error pages.
        let reply = serde_json::from_str::<BotApiResponse>(&body).ok();
        if status.is_success() && reply.as_ref().is_some_and(|r| r.ok) {
            tracing::info!("📨 Telegram message delivered");
            return Ok(());
        }

        Err(NotifierError::TelegramError {
            description: reply
                .and_then(|r| r.description)
                .unwrap_or_else(|| format!("HTTP {}", status)),
        })
    }
}
