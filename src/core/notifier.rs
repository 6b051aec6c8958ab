use crate::core::aggregator::summarize;
use crate::core::message::TradeReport;
use crate::core::positions::PositionBook;
use crate::domain::model::{OrderUpdate, Position, PositionSnapshot, UserDataEvent};
use crate::domain::ports::Notifier;
use crate::utils::format::price;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy)]
pub struct NotifierSettings {
    /// How long fills of one symbol are collected before a message goes out.
    pub flush_delay: Duration,
    pub multiplier: Decimal,
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            flush_delay: Duration::from_millis(500),
            multiplier: Decimal::ONE_HUNDRED,
        }
    }
}

#[derive(Default)]
struct State {
    positions: PositionBook,
    pending: HashMap<String, Vec<OrderUpdate>>,
    scheduled: HashSet<String>,
}

struct Shared<N: Notifier> {
    notifier: N,
    settings: NotifierSettings,
    state: Mutex<State>,
}

/// Turns account events into batched trade messages.
///
/// Cloning is cheap; clones share the same position book and buffers.
pub struct TradeNotifier<N: Notifier> {
    shared: Arc<Shared<N>>,
}

impl<N: Notifier> Clone for TradeNotifier<N> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<N: Notifier + 'static> TradeNotifier<N> {
    pub fn new(notifier: N, settings: NotifierSettings) -> Self {
        Self {
            shared: Arc::new(Shared {
                notifier,
                settings,
                state: Mutex::new(State::default()),
            }),
        }
    }

    pub async fn sync_positions(&self, positions: Vec<Position>) {
        for p in positions.iter().filter(|p| p.amount != Decimal::ZERO) {
            tracing::info!(
                "✅ Holding {} (amount: {}, entry: {})",
                p.symbol,
                p.amount,
                price(p.entry_price, &p.symbol)
            );
        }

        let mut state = self.shared.state.lock().await;
        state.positions.sync(positions);
        tracing::info!("🆗 Position sync complete ({} open)", state.positions.len());
    }

    pub async fn position(&self, symbol: &str) -> PositionSnapshot {
        self.shared.state.lock().await.positions.get(symbol)
    }

    pub async fn handle_event(&self, event: UserDataEvent) {
        match event {
            UserDataEvent::AccountUpdate { account } => {
                let mut state = self.shared.state.lock().await;
                state.positions.apply(&account);
                tracing::debug!("Applied account update for {} positions", account.positions.len());
            }
            UserDataEvent::OrderTradeUpdate { order } => self.buffer_fill(order).await,
            UserDataEvent::ListenKeyExpired | UserDataEvent::Other => {}
        }
    }

    async fn buffer_fill(&self, order: OrderUpdate) {
        if !order.is_trade_fill() {
            return;
        }

        let symbol = order.symbol.clone();
        let first_in_window = {
            let mut state = self.shared.state.lock().await;
            state.pending.entry(symbol.clone()).or_default().push(order);
            state.scheduled.insert(symbol.clone())
        };

        if first_in_window {
            let this = self.clone();
            let delay = self.shared.settings.flush_delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                this.flush(&symbol).await;
            });
        }
    }

    /// Sends the message for everything buffered on `symbol` and returns it.
    pub async fn flush(&self, symbol: &str) -> Option<String> {
        let (fills, position) = {
            let mut state = self.shared.state.lock().await;
            state.scheduled.remove(symbol);
            let fills = state.pending.remove(symbol).unwrap_or_default();
            (fills, state.positions.get(symbol))
        };

        let summary = summarize(symbol, &fills, self.shared.settings.multiplier)?;
        let message = TradeReport::classify(summary, position).to_string();

        tracing::info!("{}", message);
        match self.shared.notifier.send(&message).await {
            Ok(()) => tracing::debug!("Delivered {} fill(s) for {}", fills.len(), symbol),
            Err(e) => tracing::warn!("❌ Failed to deliver message for {}: {}", symbol, e),
        }

        Some(message)
    }
}
