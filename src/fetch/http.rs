//! HTTP fetch service.
//!
//! Downloads pages and images with the shared `reqwest` client and reports
//! failures as typed [`FetchError`] values.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::config::MAX_RESPONSE_BODY_SIZE;
use crate::error_handling::FetchError;

/// A successful (2xx) HTTP response with its full body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// `Content-Type` header, if the server sent one
    pub content_type: Option<String>,
    /// Raw response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Retrieves a URL and returns its body or a distinguishable error.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// Fetches `url` with a GET request.
    ///
    /// # Errors
    ///
    /// Non-2xx statuses are reported as `FetchError::Status`; transport
    /// failures are categorized by kind.
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// `reqwest`-backed fetcher enforcing a body size limit.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Arc<reqwest::Client>,
    max_body_size: usize,
}

impl PageFetcher {
    /// Fetcher with the default body size limit.
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self::with_limit(client, MAX_RESPONSE_BODY_SIZE)
    }

    /// Fetcher that rejects bodies larger than `max_body_size` bytes.
    pub fn with_limit(client: Arc<reqwest::Client>, max_body_size: usize) -> Self {
        PageFetcher {
            client,
            max_body_size,
        }
    }
}

#[async_trait]
impl HttpFetch for PageFetcher {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "{url}: unsupported scheme {}",
                parsed.scheme()
            )));
        }

        let mut response = self.client.get(parsed).send().await?;
        let status = response.status();
        debug!("GET {url} -> {status}");
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        if let Some(length) = response.content_length() {
            let length = usize::try_from(length).unwrap_or(usize::MAX);
            if length > self.max_body_size {
                return Err(FetchError::TooLarge {
                    size: length,
                    limit: self.max_body_size,
                });
            }
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        // Content-Length may be absent or wrong, so the limit is enforced while reading
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_body_size {
                return Err(FetchError::TooLarge {
                    size: body.len() + chunk.len(),
                    limit: self.max_body_size,
                });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(HttpResponse {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}
