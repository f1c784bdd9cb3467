//! Page loader engine: markup rewriting, HTTP transport and the download pipeline.
mod config;
mod decode;
mod fetch;
mod loader;
mod persist;
mod resources;
mod rewrite;
mod types;

pub use config::LoaderConfig;
pub use decode::{decode_html, encode_html, DecodedHtml};
pub use fetch::{FetchSettings, HttpClient, HttpObserver, LoggingObserver, ReqwestClient};
pub use loader::PageLoader;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use resources::ResourceFetcher;
pub use rewrite::{rewrite, RewriteError, RewriteOutput, ASSET_ATTRIBUTES};
pub use types::{
    DownloadOutcome, DownloadedResource, FailureKind, FetchError, FetchOutput, FetchReport,
    LoadError, LoadSummary, PageBody, ResourceError,
};
