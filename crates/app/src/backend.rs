//! HTTP client for the storefront backend API.

use reqwest::{Client, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

/// Default backend address used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Configuration for connecting to the storefront backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Backend base address, e.g. `"http://localhost:8000"`.
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Thin JSON client shared by every backend-facing service.
///
/// No request timeout is configured: a hung request stays pending until the
/// transport itself gives up.
#[derive(Debug, Clone)]
pub struct BackendClient {
    config: BackendConfig,
    http: Client,
}

impl BackendClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Create a client that sends requests through an existing `reqwest`
    /// client, e.g. one with custom proxy settings.
    #[must_use]
    pub fn with_http_client(config: BackendConfig, http: Client) -> Self {
        Self { config, http }
    }

    /// Build an absolute URL for `path` against the configured base address.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// `GET` a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] on a 404, [`BackendError::Http`] on
    /// transport or decoding failure and [`BackendError::UnexpectedResponse`]
    /// on any other non-2xx status.
    pub async fn get_json<T>(&self, path: &str) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);

        debug!(%url, "GET");

        let response = self.http.get(&url).send().await?;
        let response = ensure_success(response, "GET", &url).await?;

        Ok(response.json().await?)
    }

    /// `POST` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`BackendClient::get_json`].
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);

        debug!(%url, "POST");

        let response = self.http.post(&url).json(body).send().await?;
        let response = ensure_success(response, "POST", &url).await?;

        Ok(response.json().await?)
    }
}

async fn ensure_success(
    response: Response,
    method: &str,
    url: &str,
) -> Result<Response, BackendError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(BackendError::NotFound);
    }

    let text = response.text().await.unwrap_or_default();

    Err(BackendError::UnexpectedResponse(format!(
        "{method} {url} failed with status {status}: {text}"
    )))
}

/// Errors that can occur when communicating with the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// An HTTP transport or serialization error occurred.
    #[error("http request failed")]
    Http(#[from] reqwest::Error),

    /// The requested resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// The backend returned a non-2xx response.
    #[error("unexpected response from backend: {0}")]
    UnexpectedResponse(String),
}
