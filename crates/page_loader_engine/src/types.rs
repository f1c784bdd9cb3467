use std::fmt;
use std::path::PathBuf;

use crate::decode::DecodedHtml;
use crate::persist::PersistError;
use crate::rewrite::RewriteError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Page body as received, with its decoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBody {
    pub bytes: Vec<u8>,
    pub decoded: DecodedHtml,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Failures that abort the whole run.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid page url {url}: {message}")]
    InvalidPageUrl { url: String, message: String },
    #[error("failed to fetch page")]
    PageFetch(#[source] FetchError),
    #[error("failed to write page html")]
    WriteHtml(#[source] PersistError),
    #[error("failed to create resources directory")]
    ResourcesDir(#[source] PersistError),
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
}

/// Failure of a single resource; never stops sibling downloads.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("malformed resource url: {0}")]
    MalformedUrl(#[from] url::ParseError),
    #[error("download failed: {0}")]
    Fetch(#[source] FetchError),
    #[error("write failed: {0}")]
    Write(#[source] PersistError),
    #[error("download task failed: {0}")]
    TaskFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedResource {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Result of one download, tagged with the reference it came from.
#[derive(Debug)]
pub struct DownloadOutcome {
    /// Reference as it appeared in the markup.
    pub link: String,
    /// Absolute URL, or the raw reference when it could not be resolved.
    pub url: String,
    pub result: Result<DownloadedResource, ResourceError>,
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregate of every download attempt, in the order the links were found.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub outcomes: Vec<DownloadOutcome>,
}

impl FetchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ResourceError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|err| (o.url.as_str(), err)))
    }

    pub fn is_complete(&self) -> bool {
        self.failed() == 0
    }
}

impl fmt::Display for FetchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} failed",
            self.succeeded(),
            self.failed()
        )
    }
}

#[derive(Debug)]
pub struct LoadSummary {
    pub html_path: PathBuf,
    pub resources_dir: PathBuf,
    pub report: FetchReport,
}
