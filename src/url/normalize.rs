use crate::UrlError;
use url::Url;

/// Normalizes a URL so that equivalent links share one visited-tracker key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything but HTTP(S)
/// 3. Require a host (the `url` crate lowercases it)
/// 4. Empty path becomes /
/// 5. Remove fragment (everything after #)
/// 6. Remove empty query string (trailing ?)
///
/// Query parameters are kept verbatim and in order: the query carries the
/// route or stop identifier, so two links differing only in query are
/// different pages.
///
/// # Examples
///
/// ```
/// use transit_mapper::url::normalize_url;
///
/// let url = normalize_url("https://BUSTIME.example.com/m/?q=BX1#top").unwrap();
/// assert_eq!(url.as_str(), "https://bustime.example.com/m/?q=BX1");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    if url.path().is_empty() {
        url.set_path("/");
    }

    url.set_fragment(None);

    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}
