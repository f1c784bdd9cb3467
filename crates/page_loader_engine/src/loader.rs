use std::sync::Arc;

use loader_logging::loader_info;
use page_loader_core::PageNames;
use url::Url;

use crate::config::LoaderConfig;
use crate::decode::encode_html;
use crate::fetch::{HttpClient, ReqwestClient};
use crate::persist::{ensure_output_dir, AtomicFileWriter};
use crate::resources::ResourceFetcher;
use crate::rewrite::rewrite;
use crate::{LoadError, LoadSummary};

/// Mirrors one page: fetch, save, rewrite, save again, download resources.
pub struct PageLoader {
    client: Arc<dyn HttpClient>,
    config: LoaderConfig,
}

impl PageLoader {
    pub fn new(config: LoaderConfig) -> Result<Self, LoadError> {
        let client = ReqwestClient::new(config.fetch.clone()).map_err(LoadError::PageFetch)?;
        Ok(Self::with_client(Arc::new(client), config))
    }

    pub fn with_client(client: Arc<dyn HttpClient>, config: LoaderConfig) -> Self {
        Self { client, config }
    }

    /// Any error returned here is fatal. Per-resource failures are in
    /// [`LoadSummary::report`].
    pub async fn load(&self, page_url: &str) -> Result<LoadSummary, LoadError> {
        let url = Url::parse(page_url).map_err(|err| LoadError::InvalidPageUrl {
            url: page_url.to_string(),
            message: err.to_string(),
        })?;
        let names = PageNames::for_page(url.as_str());
        let output_dir = self.config.output_dir.as_path();

        loader_info!("Loading {} into {}", url, output_dir.display());
        let page = self.client.get_text(&url).await.map_err(LoadError::PageFetch)?;

        ensure_output_dir(output_dir).map_err(LoadError::WriteHtml)?;
        let writer = AtomicFileWriter::new(output_dir.to_path_buf());
        let html_filename = names.html_filename();
        writer
            .write(&html_filename, &page.bytes)
            .map_err(LoadError::WriteHtml)?;

        let rewritten = rewrite(&page.decoded.html, &url)?;
        let html_path = writer
            .write(
                &html_filename,
                &encode_html(&rewritten.html, page.decoded.encoding),
            )
            .map_err(LoadError::WriteHtml)?;
        loader_info!("Saved page to {}", html_path.display());

        let report = ResourceFetcher::new(Arc::clone(&self.client))
            .fetch_all(&rewritten.local_links, &url, output_dir)
            .await?;

        Ok(LoadSummary {
            html_path,
            resources_dir: output_dir.join(&names.resources_dir),
            report,
        })
    }
}
