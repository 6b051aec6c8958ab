use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocketError(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Exchange API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Telegram delivery failed: {description}")]
    TelegramError { description: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl NotifierError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            NotifierError::TelegramError { .. } => ErrorSeverity::Low,
            NotifierError::HttpError(_) | NotifierError::WebSocketError(_) => {
                ErrorSeverity::Medium
            }
            NotifierError::SerializationError(_) => ErrorSeverity::High,
            NotifierError::ApiError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            NotifierError::ApiError { .. } => ErrorSeverity::High,
            NotifierError::IoError(_)
            | NotifierError::ConfigError { .. }
            | NotifierError::MissingConfigError { .. }
            | NotifierError::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            NotifierError::HttpError(_) | NotifierError::WebSocketError(_) => {
                "Check network connectivity to the exchange and restart the notifier"
            }
            NotifierError::ApiError { status: 401, .. } | NotifierError::ApiError { status: 403, .. } => {
                "Check BINANCE_API_KEY / BINANCE_SECRET_KEY and the key's futures permission"
            }
            NotifierError::ApiError { .. } => {
                "The exchange rejected the request; check the endpoint and the system clock"
            }
            NotifierError::TelegramError { .. } => {
                "Check TELEGRAM_TOKEN and TELEGRAM_CHAT_ID, and that the bot can post to the chat"
            }
            NotifierError::SerializationError(_) => {
                "The exchange sent an unexpected payload; check the endpoint configuration"
            }
            NotifierError::IoError(_) => "Check file permissions for the event log path",
            NotifierError::ConfigError { .. }
            | NotifierError::MissingConfigError { .. }
            | NotifierError::InvalidConfigValueError { .. } => {
                "Fix the configuration (flags, environment variables or .env) and restart"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, NotifierError>;
