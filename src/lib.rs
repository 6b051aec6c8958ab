pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::binance::{BinanceClient, BinanceWebSocket};
pub use adapters::event_log::EventLog;
pub use adapters::telegram::TelegramNotifier;
pub use config::CliConfig;
pub use core::notifier::{NotifierSettings, TradeNotifier};
pub use domain::ports::{AccountSource, ExchangeCredentials, ExchangeStream, Notifier};
pub use utils::error::{NotifierError, Result};
