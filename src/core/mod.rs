pub mod aggregator;
pub mod message;
pub mod notifier;
pub mod positions;

pub use crate::domain::model::{OrderUpdate, Position, PositionSnapshot, UserDataEvent};
pub use crate::domain::ports::{AccountSource, ExchangeStream, Notifier};
pub use crate::utils::error::Result;
