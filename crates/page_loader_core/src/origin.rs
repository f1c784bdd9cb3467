use url::Url;

/// True when `candidate` resolves to the same scheme, host and port as `page_url`.
///
/// Relative references resolve against the page and are therefore always
/// local. References that cannot be parsed are treated as not local.
pub fn is_same_origin(candidate: &str, page_url: &Url) -> bool {
    let page_origin = page_url.origin();
    if !page_origin.is_tuple() {
        return false;
    }
    match page_url.join(candidate.trim()) {
        Ok(resolved) => resolved.origin() == page_origin,
        Err(_) => false,
    }
}
