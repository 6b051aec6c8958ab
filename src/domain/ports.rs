use crate::domain::model::Position;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Delivers a rendered trade message to its audience.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}

/// Reads the positions currently held on the account.
#[async_trait]
pub trait AccountSource: Send + Sync {
    async fn open_positions(&self) -> Result<Vec<Position>>;
}

/// API credentials for an exchange account.
#[derive(Clone)]
pub struct ExchangeCredentials {
    pub api_key: String,
    pub secret_key: String,
}

impl ExchangeCredentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }
}

impl std::fmt::Debug for ExchangeCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeCredentials")
            .field("api_key", &"***")
            .field("secret_key", &"***")
            .finish()
    }
}

/// A live account event stream of one exchange.
///
/// `start` runs until the stream fails permanently; callers race it against
/// their shutdown signal and then call `stop`.
#[async_trait]
pub trait ExchangeStream: Send + Sync {
    async fn start(&self) -> Result<()>;

    async fn stop(&self);
}
