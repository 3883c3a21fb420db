//! REST page fetcher over reqwest.

use super::PageFetcher;
use crate::config::BackendConfig;
use crate::error::{ApiError, FetchError};
use crate::filter::PageQuery;
use crate::page::{Page, PageEnvelope};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::time::Duration;
use tracing::{debug, warn};

/// Fetches pages with `GET {base_url}/{resource}?page=..&limit=..`
///
/// The bearer credential is handed in at construction; nothing is read from
/// process-wide state.
pub struct HttpPageFetcher<T> {
    client: reqwest::Client,
    endpoint: String,
    credential: Option<String>,
    _item: PhantomData<fn() -> T>,
}

impl<T> HttpPageFetcher<T> {
    pub fn new(
        backend: &BackendConfig,
        resource: &str,
        credential: Option<String>,
    ) -> Result<Self, ApiError> {
        backend.validate().map_err(ApiError::ConfigError)?;
        let resource = resource.trim().trim_matches('/');
        if resource.is_empty() {
            return Err(ApiError::ConfigError(
                "Resource path cannot be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(backend.timeout_ms))
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/{}", backend.base_url.trim_end_matches('/'), resource),
            credential: credential.filter(|c| !c.is_empty()),
            _item: PhantomData,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl<T> PageFetcher<T> for HttpPageFetcher<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, query: &PageQuery) -> Result<Page<T>, FetchError> {
        let mut request = self.client.get(&self.endpoint).query(&query.to_params());
        if let Some(token) = &self.credential {
            request = request.bearer_auth(token);
        }

        debug!(endpoint = %self.endpoint, page = query.page, "Requesting page");
        let response = request.send().await.map_err(|e| {
            warn!(endpoint = %self.endpoint, error = %e, "Page request failed");
            FetchError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), &body));
        }

        let envelope: PageEnvelope<T> = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(envelope.into_page(query.page))
    }
}

/// Map a non-2xx response to a fetch error.
///
/// 401 and 403 mean the session is gone; everything else is a server error carrying
/// the body's `message` field when there is one.
pub fn classify_status(status: u16, body: &str) -> FetchError {
    let message = extract_message(body).unwrap_or_else(|| format!("HTTP {}", status));
    match status {
        401 | 403 => FetchError::Auth(message),
        _ => FetchError::Server { status, message },
    }
}

fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value
            .get("message")
            .or_else(|| value.get("error"))
            .and_then(|m| m.as_str())
            .map(str::to_string),
        Err(_) => Some(body.to_string()),
    }
}
