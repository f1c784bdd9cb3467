use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use loader_logging::{loader_debug, loader_warn};
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::decode::decode_html;
use crate::{FailureKind, FetchError, FetchOutput, PageBody};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 50 * 1024 * 1024,
        }
    }
}

/// Hooks called around every request, for transport-level tracing.
pub trait HttpObserver: Send + Sync {
    fn on_request(&self, method: &str, url: &str, content_type: Option<&str>);
    fn on_response(&self, method: &str, url: &str, status: u16, content_type: Option<&str>);
}

/// Observer that writes each request and response at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl HttpObserver for LoggingObserver {
    fn on_request(&self, method: &str, url: &str, content_type: Option<&str>) {
        loader_debug!(
            "Request {} {} with {}",
            method,
            url,
            content_type.unwrap_or("no content-type")
        );
    }

    fn on_response(&self, method: &str, url: &str, status: u16, content_type: Option<&str>) {
        loader_debug!(
            "Response {} {} from {} with {}",
            status,
            method,
            url,
            content_type.unwrap_or("no content-type")
        );
    }
}

#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// Binary GET; non-2xx responses are errors.
    async fn get(&self, url: &Url) -> Result<FetchOutput, FetchError>;

    /// Text GET, decoded per the response charset. The raw bytes are kept.
    async fn get_text(&self, url: &Url) -> Result<PageBody, FetchError> {
        let output = self.get(url).await?;
        let decoded = decode_html(&output.bytes, output.content_type.as_deref());
        if decoded.had_errors {
            loader_warn!(
                "Page {} contained bytes invalid for {}; replaced",
                url,
                decoded.encoding.name()
            );
        }
        Ok(PageBody {
            bytes: output.bytes,
            decoded,
        })
    }
}

pub struct ReqwestClient {
    client: reqwest::Client,
    settings: FetchSettings,
    observer: Arc<dyn HttpObserver>,
}

impl ReqwestClient {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        Self::with_observer(settings, Arc::new(LoggingObserver))
    }

    pub fn with_observer(
        settings: FetchSettings,
        observer: Arc<dyn HttpObserver>,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            settings,
            observer,
        })
    }

    fn too_large(&self, actual: u64) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &Url) -> Result<FetchOutput, FetchError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::new(
                FailureKind::InvalidUrl,
                format!("unsupported scheme {}", url.scheme()),
            ));
        }

        self.observer.on_request("GET", url.as_str(), None);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        self.observer
            .on_response("GET", &final_url, status.as_u16(), content_type.as_deref());

        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(FetchOutput {
            bytes,
            content_type,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
