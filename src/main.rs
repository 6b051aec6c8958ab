use clap::Parser;
use trade_notifier::utils::error::ErrorSeverity;
use trade_notifier::utils::{logger, validation::Validate};
use trade_notifier::{
    BinanceClient, BinanceWebSocket, CliConfig, ExchangeStream, NotifierError, TelegramNotifier,
    TradeNotifier,
};

fn exit_code(e: &NotifierError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(stage: &str, e: NotifierError) -> ! {
    tracing::error!(
        "❌ {} failed: {} (Severity: {:?})",
        stage,
        e,
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e);
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(&e).max(1));
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() {
    // A missing .env is fine; variables may come from the container.
    dotenv::dotenv().ok();

    let config = CliConfig::parse();

    logger::init_logger(config.verbose, config.json_logs);

    tracing::info!("Starting trade-notifier");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        fail("Configuration validation", e);
    }

    let telegram = match TelegramNotifier::new(
        &config.telegram_endpoint,
        &config.telegram_token,
        &config.telegram_chat_id,
    ) {
        Ok(telegram) => telegram,
        Err(e) => fail("Telegram client setup", e),
    };
    tracing::info!("🤖 Telegram bot initialized");

    let client = match BinanceClient::new(
        &config.binance_rest_endpoint,
        config.credentials(),
        config.recv_window_ms,
    ) {
        Ok(client) => client,
        Err(e) => fail("Binance client setup", e),
    };

    let notifier = TradeNotifier::new(telegram, config.notifier_settings());
    let stream = BinanceWebSocket::new(
        client,
        &config.binance_ws_endpoint,
        notifier,
        config.event_log(),
    );

    tokio::select! {
        result = stream.start() => {
            if let Err(e) = result {
                stream.stop().await;
                fail("User data stream", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
        }
    }

    stream.stop().await;
    tracing::info!("trade-notifier stopped");
}
