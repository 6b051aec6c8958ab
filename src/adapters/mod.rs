// Adapters layer: concrete implementations for external systems (exchange, chat, files).

pub mod binance;
pub mod event_log;
pub mod telegram;
