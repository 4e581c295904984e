use crate::UrlError;
use url::Url;

/// Canonicalizes a raw address into the form used for identity comparisons
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; reject if malformed or relative
/// 2. Reject schemes other than HTTP and HTTPS
/// 3. Remove fragment (everything after #)
///
/// The operation is idempotent: canonicalizing a canonical address returns it
/// unchanged.
///
/// # Arguments
///
/// * `raw` - The address to canonicalize
///
/// # Returns
///
/// * `Ok(Url)` - Canonical address
/// * `Err(UrlError)` - The address is not a usable absolute URL
///
/// # Examples
///
/// ```
/// use article_harvester::url::canonicalize;
///
/// let url = canonicalize("https://en.wikipedia.org/wiki/Rust#History").unwrap();
/// assert_eq!(url.as_str(), "https://en.wikipedia.org/wiki/Rust");
/// ```
pub fn canonicalize(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::InvalidAddress {
        address: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
    }

    Ok(canonical_form(url))
}

/// Strips the fragment from an already parsed URL
pub fn canonical_form(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}
