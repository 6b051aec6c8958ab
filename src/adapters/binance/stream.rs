use crate::adapters::binance::client::BinanceClient;
use crate::adapters::event_log::EventLog;
use crate::core::notifier::TradeNotifier;
use crate::domain::model::UserDataEvent;
use crate::domain::ports::{AccountSource, ExchangeStream, Notifier};
use crate::utils::error::Result;
use async_trait::async_trait;
use futures_util::StreamExt;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval_at, sleep, Instant};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Binance invalidates a listen key after 60 minutes without a keepalive.
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30 * 60);
const RECONNECT_DELAY: Duration = Duration::from_secs(1);
/// `interval_at` panics on a zero period.
const MIN_KEEPALIVE_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    Closed,
    ListenKeyExpired,
}

/// Futures user data stream feeding a [`TradeNotifier`].
pub struct BinanceWebSocket<N: Notifier> {
    client: BinanceClient,
    ws_endpoint: String,
    notifier: TradeNotifier<N>,
    event_log: Option<EventLog>,
    reconnect_delay: Duration,
    keepalive_interval: Duration,
    listen_key: Mutex<Option<String>>,
}

impl<N: Notifier + 'static> BinanceWebSocket<N> {
    pub fn new(
        client: BinanceClient,
        ws_endpoint: impl Into<String>,
        notifier: TradeNotifier<N>,
        event_log: Option<EventLog>,
    ) -> Self {
        Self {
            client,
            ws_endpoint: ws_endpoint.into().trim_end_matches('/').to_string(),
            notifier,
            event_log,
            reconnect_delay: RECONNECT_DELAY,
            keepalive_interval: KEEPALIVE_INTERVAL,
            listen_key: Mutex::new(None),
        }
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Intervals below one millisecond are raised to one millisecond.
    pub fn with_keepalive_interval(mut self, interval: Duration) -> Self {
        self.keepalive_interval = interval.max(MIN_KEEPALIVE_INTERVAL);
        self
    }

    pub fn notifier(&self) -> &TradeNotifier<N> {
        &self.notifier
    }

    pub fn stream_url(&self, listen_key: &str) -> String {
        format!("{}/ws/{}", self.ws_endpoint, listen_key)
    }

    async fn sync_initial_positions(&self) {
        tracing::info!("🔄 Loading open positions...");
        match self.client.open_positions().await {
            Ok(positions) => self.notifier.sync_positions(positions).await,
            Err(e) => tracing::error!("Position sync failed: {}", e),
        }
    }

    async fn renew_listen_key(&self) -> String {
        loop {
            match self.client.create_listen_key().await {
                Ok(key) => return key,
                Err(e) => {
                    tracing::error!("Failed to renew listen key: {}", e);
                    sleep(self.reconnect_delay).await;
                }
            }
        }
    }

    async fn run_session(&self, listen_key: &str) -> Result<SessionEnd> {
        let (mut socket, _) = connect_async(self.stream_url(listen_key).as_str()).await?;
        tracing::info!("🤖 Connected to Binance user data stream, watching fills...");

        let mut keepalive = interval_at(
            Instant::now() + self.keepalive_interval,
            self.keepalive_interval,
        );

        loop {
            tokio::select! {
                frame = socket.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        if self.handle_frame(&text).await == Some(SessionEnd::ListenKeyExpired) {
                            // Best effort; the key is gone either way.
                            let _ = socket.close(None).await;
                            return Ok(SessionEnd::ListenKeyExpired);
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        tracing::debug!("Server closed the stream: {:?}", frame);
                        return Ok(SessionEnd::Closed);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(SessionEnd::Closed),
                },
                _ = keepalive.tick() => {
                    if let Err(e) = self.client.keepalive_listen_key().await {
                        tracing::warn!("Listen key keepalive failed: {}", e);
                    }
                }
            }
        }
    }

    async fn handle_frame(&self, text: &str) -> Option<SessionEnd> {
        let raw: serde_json::Value = match serde_json::from_str(text) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Dropping undecodable frame: {}", e);
                return None;
            }
        };

        if let Some(log) = &self.event_log {
            if let Err(e) = log.append(&raw).await {
                tracing::warn!("Failed to write event log {}: {}", log.path().display(), e);
            }
        }

        match serde_json::from_value::<UserDataEvent>(raw) {
            Ok(UserDataEvent::ListenKeyExpired) => Some(SessionEnd::ListenKeyExpired),
            Ok(event) => {
                self.notifier.handle_event(event).await;
                None
            }
            Err(e) => {
                tracing::error!("Failed to process event: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl<N: Notifier + 'static> ExchangeStream for BinanceWebSocket<N> {
    async fn start(&self) -> Result<()> {
        self.sync_initial_positions().await;

        let mut listen_key = self.client.create_listen_key().await?;
        loop {
            *self.listen_key.lock().await = Some(listen_key.clone());

            match self.run_session(&listen_key).await {
                Ok(SessionEnd::ListenKeyExpired) => {
                    tracing::warn!("Listen key expired, reconnecting");
                }
                Ok(SessionEnd::Closed) => {
                    tracing::warn!("Stream closed, reconnecting in {:?}", self.reconnect_delay);
                    sleep(self.reconnect_delay).await;
                }
                Err(e) => {
                    tracing::error!("Socket error: {}", e);
                    sleep(self.reconnect_delay).await;
                }
            }

            listen_key = self.renew_listen_key().await;
        }
    }

    async fn stop(&self) {
        if self.listen_key.lock().await.take().is_none() {
            return;
        }
        match self.client.close_listen_key().await {
            Ok(()) => tracing::info!("Closed Binance user data stream"),
            Err(e) => tracing::warn!("Failed to close listen key: {}", e),
        }
    }
}
