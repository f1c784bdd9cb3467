use loader_logging::{loader_debug, loader_trace};
use lol_html::{element, rewrite_str, RewriteStrSettings};
use page_loader_core::{is_same_origin, PageNames};
use url::Url;

/// `(tag, attribute)` pairs whose values reference page assets.
pub const ASSET_ATTRIBUTES: [(&str, &str); 3] = [("script", "src"), ("img", "src"), ("link", "href")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutput {
    /// Original attribute values of the local references, grouped by
    /// [`ASSET_ATTRIBUTES`] order, document order within a group. Duplicates kept.
    pub local_links: Vec<String>,
    pub html: String,
}

#[derive(Debug, thiserror::Error)]
#[error("failed to rewrite page markup: {0}")]
pub struct RewriteError(#[from] lol_html::errors::RewritingError);

/// Point every same-origin asset reference at its local copy.
///
/// References on other origins, empty values and unparseable values are left
/// as they are. Path-relative references are resolved against `page_url`
/// before naming so the rewritten path matches the file the fetcher writes.
pub fn rewrite(html: &str, page_url: &Url) -> Result<RewriteOutput, RewriteError> {
    loader_debug!("Parsing {} for local links", page_url);
    let page_names = PageNames::for_page(page_url.as_str());
    let names = &page_names;
    let mut found: Vec<Vec<String>> = vec![Vec::new(); ASSET_ATTRIBUTES.len()];

    let element_content_handlers = ASSET_ATTRIBUTES
        .iter()
        .zip(found.iter_mut())
        .map(|(&(tag, attr), links)| {
            element!(format!("{tag}[{attr}]"), move |el| {
                let Some(value) = el.get_attribute(attr) else {
                    return Ok(());
                };
                if value.trim().is_empty() || !is_same_origin(&value, page_url) {
                    return Ok(());
                }
                let resolved = page_url.join(value.trim())?;
                let local = names.local_reference(resolved.as_str());
                loader_trace!("<{}> {} -> {}", tag, value, local);
                el.set_attribute(attr, &local)?;
                links.push(value);
                Ok(())
            })
        })
        .collect::<Vec<_>>();

    let html = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers,
            ..RewriteStrSettings::new()
        },
    )?;

    let local_links: Vec<String> = found.into_iter().flatten().collect();
    loader_debug!("Found {} local links", local_links.len());
    Ok(RewriteOutput { local_links, html })
}
