use crate::adapters::event_log::EventLog;
use crate::core::notifier::NotifierSettings;
use crate::domain::ports::ExchangeCredentials;
use crate::utils::error::{NotifierError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use clap::Parser;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Duration;

const HTTP_SCHEMES: &[&str] = &["http", "https"];
const WS_SCHEMES: &[&str] = &["ws", "wss"];

#[derive(Clone, Parser)]
#[command(name = "trade-notifier")]
#[command(about = "Forwards Binance futures fills to a Telegram chat")]
pub struct CliConfig {
    #[arg(long, env = "BINANCE_API_KEY", hide_env_values = true)]
    pub binance_api_key: String,

    #[arg(long, env = "BINANCE_SECRET_KEY", hide_env_values = true)]
    pub binance_secret_key: String,

    #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    pub telegram_token: String,

    #[arg(long, env = "TELEGRAM_CHAT_ID", allow_hyphen_values = true)]
    pub telegram_chat_id: String,

    #[arg(long, env = "BINANCE_REST_ENDPOINT", default_value = "https://fapi.binance.com")]
    pub binance_rest_endpoint: String,

    #[arg(long, env = "BINANCE_WS_ENDPOINT", default_value = "wss://fstream.binance.com")]
    pub binance_ws_endpoint: String,

    #[arg(long, env = "TELEGRAM_ENDPOINT", default_value = "https://api.telegram.org")]
    pub telegram_endpoint: String,

    #[arg(
        long,
        env = "NOTIFIER_FLUSH_DELAY_MS",
        default_value = "500",
        help = "Milliseconds to collect fills of a symbol before notifying"
    )]
    pub flush_delay_ms: u64,

    #[arg(
        long,
        env = "NOTIFIER_SIMULATION_MULTIPLIER",
        default_value = "100",
        help = "Factor applied to filled quantity, price and PnL in messages"
    )]
    pub simulation_multiplier: Decimal,

    #[arg(long, env = "BINANCE_RECV_WINDOW_MS", default_value = "5000")]
    pub recv_window_ms: u64,

    #[arg(long, env = "NOTIFIER_EVENT_LOG", default_value = "b.out")]
    pub event_log: PathBuf,

    #[arg(long, env = "NOTIFIER_NO_EVENT_LOG", help = "Do not record raw stream events")]
    pub no_event_log: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, env = "NOTIFIER_JSON_LOGS", help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    pub fn credentials(&self) -> ExchangeCredentials {
        ExchangeCredentials::new(&self.binance_api_key, &self.binance_secret_key)
    }

    pub fn notifier_settings(&self) -> NotifierSettings {
        NotifierSettings {
            flush_delay: Duration::from_millis(self.flush_delay_ms),
            multiplier: self.simulation_multiplier,
        }
    }

    pub fn event_log(&self) -> Option<EventLog> {
        (!self.no_event_log).then(|| EventLog::new(self.event_log.clone()))
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("binance_api_key", &self.binance_api_key)?;
        validate_non_empty_string("binance_secret_key", &self.binance_secret_key)?;
        validate_non_empty_string("telegram_token", &self.telegram_token)?;
        validate_non_empty_string("telegram_chat_id", &self.telegram_chat_id)?;

        validate_url("binance_rest_endpoint", &self.binance_rest_endpoint, HTTP_SCHEMES)?;
        validate_url("binance_ws_endpoint", &self.binance_ws_endpoint, WS_SCHEMES)?;
        validate_url("telegram_endpoint", &self.telegram_endpoint, HTTP_SCHEMES)?;

        validate_range("flush_delay_ms", self.flush_delay_ms, 0, 60_000)?;
        validate_range("recv_window_ms", self.recv_window_ms, 1, 60_000)?;

        if self.simulation_multiplier <= Decimal::ZERO {
            return Err(NotifierError::InvalidConfigValueError {
                field: "simulation_multiplier".to_string(),
                value: self.simulation_multiplier.to_string(),
                reason: "Value must be greater than 0".to_string(),
            });
        }

        if !self.no_event_log {
            let path = self.event_log.to_str().ok_or_else(|| NotifierError::ConfigError {
                message: "event_log path is not valid UTF-8".to_string(),
            })?;
            validate_path("event_log", path)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("binance_api_key", &"***")
            .field("binance_secret_key", &"***")
            .field("telegram_token", &"***")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("binance_rest_endpoint", &self.binance_rest_endpoint)
            .field("binance_ws_endpoint", &self.binance_ws_endpoint)
            .field("telegram_endpoint", &self.telegram_endpoint)
            .field("flush_delay_ms", &self.flush_delay_ms)
            .field("simulation_multiplier", &self.simulation_multiplier)
            .field("recv_window_ms", &self.recv_window_ms)
            .field("event_log", &self.event_log)
            .field("no_event_log", &self.no_event_log)
            .field("verbose", &self.verbose)
            .field("json_logs", &self.json_logs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> CliConfig {
        let mut args = vec![
            "trade-notifier",
            "--binance-api-key",
            "api-key",
            "--binance-secret-key",
            "secret-key",
            "--telegram-token",
            "123456:ABC-DEF",
            "--telegram-chat-id",
            "-100200300",
        ];
        args.extend_from_slice(extra);
        CliConfig::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);

        assert_eq!(config.binance_rest_endpoint, "https://fapi.binance.com");
        assert_eq!(config.binance_ws_endpoint, "wss://fstream.binance.com");
        assert_eq!(config.flush_delay_ms, 500);
        assert_eq!(config.simulation_multiplier, Decimal::ONE_HUNDRED);
        assert!(config.event_log().is_some());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_settings_follow_flags() {
        let config = parse(&["--flush-delay-ms", "250", "--simulation-multiplier", "1"]);
        let settings = config.notifier_settings();

        assert_eq!(settings.flush_delay, Duration::from_millis(250));
        assert_eq!(settings.multiplier, Decimal::ONE);
    }

    #[test]
    fn test_event_log_can_be_disabled() {
        let config = parse(&["--no-event-log"]);
        assert!(config.event_log().is_none());
    }

    #[test]
    fn test_rejects_http_websocket_endpoint() {
        let config = parse(&["--binance-ws-endpoint", "https://fstream.binance.com"]);
        assert!(matches!(
            config.validate(),
            Err(NotifierError::InvalidConfigValueError { ref field, .. }) if field == "binance_ws_endpoint"
        ));
    }

    #[test]
    fn test_rejects_non_positive_multiplier() {
        let config = parse(&["--simulation-multiplier", "0"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!("{:?}", parse(&[]));
        assert!(!rendered.contains("secret-key"));
        assert!(!rendered.contains("123456:ABC-DEF"));
        assert!(rendered.contains("-100200300"));
    }
}
