use httpmock::prelude::*;
use serde_json::json;
use trade_notifier::{Notifier, NotifierError, TelegramNotifier};

#[tokio::test]
async fn test_send_posts_chat_and_text() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/bot123456:ABC-DEF/sendMessage")
                .json_body(json!({
                    "chat_id": "-100200300",
                    "text": "🟢[진입] BTCUSDT 롱 / 평단: 65,000.0000 / 수량: 1.0000"
                }));
            then.status(200)
                .json_body(json!({"ok": true, "result": {"message_id": 42}}));
        })
        .await;

    let telegram = TelegramNotifier::new(server.base_url(), "123456:ABC-DEF", "-100200300").unwrap();
    telegram
        .send("🟢[진입] BTCUSDT 롱 / 평단: 65,000.0000 / 수량: 1.0000")
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_rejected_message_surfaces_description() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/bot123456:ABC-DEF/sendMessage");
            then.status(400).json_body(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            }));
        })
        .await;

    let telegram = TelegramNotifier::new(server.base_url(), "123456:ABC-DEF", "1").unwrap();

    match telegram.send("hello").await {
        Err(NotifierError::TelegramError { description }) => {
            assert_eq!(description, "Bad Request: chat not found");
        }
        other => panic!("expected Telegram error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_not_ok_without_description() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/botT/sendMessage");
            then.status(200).json_body(json!({"ok": false}));
        })
        .await;

    let telegram = TelegramNotifier::new(format!("{}/", server.base_url()), "T", "1").unwrap();

    match telegram.send("hello").await {
        Err(NotifierError::TelegramError { description }) => assert_eq!(description, "HTTP 200 OK"),
        other => panic!("expected Telegram error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_html_gateway_error_is_telegram_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/bot123456:ABC-DEF/sendMessage");
            then.status(502)
                .header("content-type", "text/html")
                .body("<html><body>502 Bad Gateway</body></html>");
        })
        .await;

    let telegram = TelegramNotifier::new(server.base_url(), "123456:ABC-DEF", "-100200300").unwrap();
    match telegram.send("hello").await {
        Err(NotifierError::TelegramError { description }) => {
            assert_eq!(description, "HTTP 502 Bad Gateway");
        }
        other => panic!("expected Telegram error, got {:?}", other),
    }
}
