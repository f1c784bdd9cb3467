use std::path::Path;
use std::sync::Arc;

use futures_util::future::join_all;
use loader_logging::{loader_debug, loader_info, loader_warn};
use page_loader_core::PageNames;
use tokio::task::JoinHandle;
use url::Url;

use crate::fetch::HttpClient;
use crate::persist::{ensure_output_dir, AtomicFileWriter};
use crate::{DownloadOutcome, DownloadedResource, FetchReport, LoadError, ResourceError};

enum Pending {
    Started(JoinHandle<Result<DownloadedResource, ResourceError>>),
    Skipped(ResourceError),
}

/// Downloads a page's local resources into `<output_dir>/<name>_files/`.
pub struct ResourceFetcher {
    client: Arc<dyn HttpClient>,
}

impl ResourceFetcher {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }

    /// Fetch every link concurrently; one download per entry, duplicates included.
    ///
    /// Only a failure to create the resources directory is returned as an
    /// error, and in that case no download is started. Every other failure is
    /// recorded against its link in the report.
    pub async fn fetch_all(
        &self,
        links: &[String],
        page_url: &Url,
        output_dir: &Path,
    ) -> Result<FetchReport, LoadError> {
        let names = PageNames::for_page(page_url.as_str());
        let resolved: Vec<(String, Result<Url, ResourceError>)> = links
            .iter()
            .map(|link| (link.clone(), page_url.join(link.trim()).map_err(ResourceError::from)))
            .collect();

        let writer = AtomicFileWriter::new(output_dir.join(&names.resources_dir));
        ensure_output_dir(writer.dir()).map_err(LoadError::ResourcesDir)?;
        loader_info!(
            "Downloading {} resources into {}",
            resolved.len(),
            writer.dir().display()
        );

        // Spawn everything before awaiting anything.
        let pending: Vec<(String, String, Pending)> = resolved
            .into_iter()
            .map(|(link, url)| match url {
                Ok(url) => {
                    let filename = names.resource_filename(url.as_str());
                    let label = url.to_string();
                    let task = tokio::spawn(download_one(
                        Arc::clone(&self.client),
                        url,
                        writer.clone(),
                        filename,
                    ));
                    (link, label, Pending::Started(task))
                }
                Err(err) => (link.clone(), link, Pending::Skipped(err)),
            })
            .collect();

        let outcomes = join_all(pending.into_iter().map(|(link, url, pending)| async move {
            let result = match pending {
                Pending::Started(task) => task
                    .await
                    .unwrap_or_else(|err| Err(ResourceError::TaskFailed(err.to_string()))),
                Pending::Skipped(err) => Err(err),
            };
            if let Err(err) = &result {
                loader_warn!("Resource {} failed: {}", url, err);
            }
            DownloadOutcome { link, url, result }
        }))
        .await;

        let report = FetchReport { outcomes };
        loader_info!("Resources finished: {}", report);
        Ok(report)
    }
}

async fn download_one(
    client: Arc<dyn HttpClient>,
    url: Url,
    writer: AtomicFileWriter,
    filename: String,
) -> Result<DownloadedResource, ResourceError> {
    loader_debug!("Downloading {}", url);
    let output = client.get(&url).await.map_err(ResourceError::Fetch)?;
    let bytes = output.bytes.len() as u64;
    let path = tokio::task::spawn_blocking(move || writer.write(&filename, &output.bytes))
        .await
        .map_err(|err| ResourceError::TaskFailed(err.to_string()))?
        .map_err(ResourceError::Write)?;
    loader_info!("Saved {} ({} bytes) to {}", url, bytes, path.display());
    Ok(DownloadedResource { path, bytes })
}
