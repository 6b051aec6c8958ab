use crate::domain::model::Position;
use crate::domain::ports::{AccountSource, ExchangeCredentials};
use crate::utils::error::{NotifierError, Result};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::{Client, Method, Response};
use rust_decimal::Decimal;
use serde::Deserialize;
use sha2::Sha256;
use std::time::Duration;

const API_KEY_HEADER: &str = "X-MBX-APIKEY";
const LISTEN_KEY_PATH: &str = "/fapi/v1/listenKey";
const ACCOUNT_PATH: &str = "/fapi/v2/account";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

type HmacSha256 = Hmac<Sha256>;

/// Hex HMAC-SHA256 of `payload`, as required on signed endpoints.
pub fn sign(secret: &str, payload: &str) -> Result<String> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| NotifierError::ConfigError {
            message: format!("Unusable secret key: {}", e),
        })?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListenKeyResponse {
    listen_key: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPosition {
    pub symbol: String,
    pub position_amt: Decimal,
    pub entry_price: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    #[serde(default)]
    pub positions: Vec<AccountPosition>,
}

impl From<AccountPosition> for Position {
    fn from(p: AccountPosition) -> Self {
        Position {
            symbol: p.symbol,
            amount: p.position_amt,
            entry_price: p.entry_price,
        }
    }
}

/// REST client for the USDⓈ-M futures API.
pub struct BinanceClient {
    http: Client,
    base_url: String,
    credentials: ExchangeCredentials,
    recv_window_ms: u64,
}

impl BinanceClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: ExchangeCredentials,
        recv_window_ms: u64,
    ) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            recv_window_ms,
        })
    }

    pub fn credentials(&self) -> &ExchangeCredentials {
        &self.credentials
    }

    pub async fn create_listen_key(&self) -> Result<String> {
        let response = self.keyed_request(Method::POST, LISTEN_KEY_PATH).await?;
        let body: ListenKeyResponse = response.json().await?;
        tracing::debug!("Obtained listen key");
        Ok(body.listen_key)
    }

    pub async fn keepalive_listen_key(&self) -> Result<()> {
        self.keyed_request(Method::PUT, LISTEN_KEY_PATH).await?;
        tracing::debug!("Listen key kept alive");
        Ok(())
    }

    pub async fn close_listen_key(&self) -> Result<()> {
        self.keyed_request(Method::DELETE, LISTEN_KEY_PATH).await?;
        Ok(())
    }

    pub async fn futures_account(&self) -> Result<AccountInfo> {
        let query = format!(
            "recvWindow={}&timestamp={}",
            self.recv_window_ms,
            chrono::Utc::now().timestamp_millis()
        );
        let signature = sign(&self.credentials.secret_key, &query)?;
        let url = format!(
            "{}{}?{}&signature={}",
            self.base_url, ACCOUNT_PATH, query, signature
        );

        tracing::debug!("Requesting futures account from {}{}", self.base_url, ACCOUNT_PATH);
        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.credentials.api_key)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn keyed_request(&self, method: Method, path: &str) -> Result<Response> {
        let response = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header(API_KEY_HEADER, &self.credentials.api_key)
            .send()
            .await?;
        check_status(response).await
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(err) => format!("{} (code {})", err.msg, err.code),
        Err(_) if body.is_empty() => status.to_string(),
        Err(_) => body,
    };
    Err(NotifierError::ApiError {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl AccountSource for BinanceClient {
    async fn open_positions(&self) -> Result<Vec<Position>> {
        let account = self.futures_account().await?;
        Ok(account.positions.into_iter().map(Position::from).collect())
    }
}
