use std::time::Duration;

use potplay_core::PushRecord;
use potplay_logging::potplay_warn;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use url::Url;

/// Local companion service that opens pushed paths in the media player.
pub const DEFAULT_PUSH_URL: &str = "http://127.0.0.1:8080/push";

#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PUSH_URL.to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// What the companion answered. Any status counts as delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid relay endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("could not encode push record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("relay timed out: {0}")]
    Timeout(String),
    #[error("relay transport failure: {0}")]
    Transport(String),
    #[error("relay task ended without a result: {0}")]
    Aborted(String),
}

#[async_trait::async_trait]
pub trait Relay: Send + Sync {
    /// Delivers one record. No retries.
    async fn send(&self, record: &PushRecord) -> Result<RelayResponse, RelayError>;
}

/// Posts records as JSON to the companion's push endpoint.
#[derive(Debug, Clone)]
pub struct HttpRelay {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpRelay {
    pub fn new(settings: RelaySettings) -> Result<Self, RelayError> {
        let endpoint =
            Url::parse(&settings.endpoint).map_err(|err| RelayError::InvalidEndpoint {
                endpoint: settings.endpoint.clone(),
                reason: err.to_string(),
            })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(RelayError::InvalidEndpoint {
                endpoint: settings.endpoint,
                reason: format!("unsupported scheme {}", endpoint.scheme()),
            });
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| RelayError::Transport(err.to_string()))?;

        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Relay for HttpRelay {
    async fn send(&self, record: &PushRecord) -> Result<RelayResponse, RelayError> {
        let body = serde_json::to_vec(record)?;
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            potplay_warn!("Companion answered {} for {}", status, record.path);
        }

        Ok(RelayResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> RelayError {
    if err.is_timeout() {
        return RelayError::Timeout(err.to_string());
    }
    RelayError::Transport(err.to_string())
}
