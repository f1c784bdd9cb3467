use url::Url;

/// Character that replaces anything outside `[A-Za-z0-9]` in derived names.
pub const SEPARATOR: char = '-';

/// Name used for a resource whose URL has an empty path.
pub const FALLBACK_FILENAME: &str = "index.html";

const RESOURCES_DIR_SUFFIX: &str = "_files";

// Only the path of a resource URL is used, so relative references can be
// resolved against any fixed origin.
const PLACEHOLDER_BASE: &str = "https://example.com";

/// Filesystem-safe name for a URL: `https://ex.com/p` becomes `ex-com-p`.
///
/// The scheme prefix is dropped, a trailing run of non-alphanumeric
/// characters is removed, and every remaining non-alphanumeric character is
/// replaced by [`SEPARATOR`].
pub fn derive_from_url(url: &str) -> String {
    strip_scheme(url)
        .trim_end_matches(|c: char| !is_name_char(c))
        .chars()
        .map(|c| if is_name_char(c) { c } else { SEPARATOR })
        .collect()
}

/// Directory holding the page's local resources, relative to the output dir.
pub fn resources_dir_for(page_url: &str) -> String {
    format!("{}{RESOURCES_DIR_SUFFIX}", derive_from_url(page_url))
}

/// Local filename for a resource, prefixed with the page's derived name.
///
/// Accepts absolute and relative references. Two URLs whose paths join to the
/// same string map to the same filename; query strings and fragments are
/// ignored.
pub fn filename_for(resource_url: &str, page_base_name: &str) -> String {
    let joined = path_of(resource_url)
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if joined.is_empty() {
        return FALLBACK_FILENAME.to_string();
    }
    let sanitized: String = joined
        .chars()
        .map(|c| if is_name_char(c) { c } else { SEPARATOR })
        .collect();
    format!("{page_base_name}{SEPARATOR}{sanitized}")
}

/// Names derived once from the page URL and reused for every reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNames {
    pub base_name: String,
    pub resources_dir: String,
}

impl PageNames {
    pub fn for_page(page_url: &str) -> Self {
        Self {
            base_name: derive_from_url(page_url),
            resources_dir: resources_dir_for(page_url),
        }
    }

    /// `<base_name>.html`
    pub fn html_filename(&self) -> String {
        format!("{}.html", self.base_name)
    }

    pub fn resource_filename(&self, resource_url: &str) -> String {
        filename_for(resource_url, &self.base_name)
    }

    /// Path written into the rewritten markup: `<resources_dir>/<filename>`.
    pub fn local_reference(&self, resource_url: &str) -> String {
        format!("{}/{}", self.resources_dir, self.resource_filename(resource_url))
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

fn strip_scheme(url: &str) -> &str {
    match url.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        _ => url,
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    matches!(chars.next(), Some(first) if first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn path_of(resource_url: &str) -> String {
    let parsed = Url::parse(resource_url).or_else(|_| {
        Url::parse(PLACEHOLDER_BASE).and_then(|base| base.join(resource_url))
    });
    match parsed {
        Ok(url) => url.path().to_string(),
        // Unparseable even as a relative reference; use the text before any query.
        Err(_) => resource_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}
