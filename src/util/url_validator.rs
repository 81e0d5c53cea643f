use thiserror::Error;
use url::Url;

/// Reasons an icon URL is not rendered.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    #[error("Empty URL")]
    Empty,
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("URL has no host")]
    MissingHost,
}

/// Validate a URL taken from catalog data before it is shown or fetched.
///
/// Only absolute `http`/`https` URLs with a host pass. Schemes such as
/// `javascript:`, `data:` and `file:` are rejected.
///
/// ```
/// use appshelf::util::validate_url;
///
/// assert!(validate_url("https://cdn.example.com/icon.png").is_ok());
/// assert!(validate_url("javascript:alert(1)").is_err());
/// assert!(validate_url("").is_err());
/// ```
pub fn validate_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let trimmed = url_str.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let url = Url::parse(trimmed)?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}
