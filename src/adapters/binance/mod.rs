pub mod client;
pub mod stream;

pub use client::{AccountInfo, AccountPosition, BinanceClient};
pub use stream::BinanceWebSocket;
