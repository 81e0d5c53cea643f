use super::parser::{parse_catalog, ParseResult};
use super::CatalogSource;
use crate::catalog::AppRecord;
use futures::StreamExt;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::redirect::Policy;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on a single load, from request start to parsed document.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_CATALOG_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Why a catalog load failed.
///
/// Each variant maps to one user-facing message via [`LoadError::user_message`];
/// the `Display` impl carries the technical detail for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Server answered with a non-2xx status
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Body was not a valid catalog document
    #[error("Malformed catalog: {0}")]
    Malformed(String),
    /// DNS, connection, TLS or file I/O failure
    #[error("Network error: {0}")]
    Network(String),
    /// The load did not complete within the configured window
    #[error("Load timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    /// Body exceeded the 10MB limit
    #[error("Response too large")]
    ResponseTooLarge,
}

impl LoadError {
    /// Message suitable for the error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::HttpStatus(code) => {
                format!("Failed to load apps: server returned HTTP {code}. Press r to retry.")
            }
            Self::Malformed(_) => {
                "Failed to load apps: the catalog data is malformed. Press r to retry.".to_string()
            }
            Self::Network(_) => {
                "Failed to load apps: check your network connection and press r to retry."
                    .to_string()
            }
            Self::Timeout(d) => format!(
                "Failed to load apps: no response after {}s. Press r to retry.",
                d.as_secs()
            ),
            Self::ResponseTooLarge => {
                "Failed to load apps: the catalog is larger than 10MB. Press r to retry."
                    .to_string()
            }
        }
    }
}

/// A decoded catalog plus the number of entries the parser dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedCatalog {
    pub apps: Vec<AppRecord>,
    pub skipped: usize,
}

/// Build the HTTP client used for catalog loads.
pub fn build_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .redirect(create_redirect_policy())
        .user_agent(concat!("appshelf/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(30))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
}

/// Create a redirect policy with loop detection and limited hops.
///
/// - Limits redirects to 3 hops maximum
/// - Detects redirect loops (same URL appearing twice in chain)
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// Load and decode the catalog from `source`.
///
/// The whole operation (connect, headers, body, parse) is bounded by
/// `timeout`. HTTP requests ask intermediaries not to serve a cached copy.
///
/// # Errors
///
/// - [`LoadError::Timeout`] - `timeout` elapsed
/// - [`LoadError::HttpStatus`] - non-2xx response
/// - [`LoadError::Network`] - transport or file I/O failure
/// - [`LoadError::ResponseTooLarge`] - body over 10MB
/// - [`LoadError::Malformed`] - body is not a catalog document
pub async fn load(
    client: &reqwest::Client,
    source: &CatalogSource,
    timeout: Duration,
) -> Result<LoadedCatalog, LoadError> {
    tracing::debug!(source = %source, timeout_secs = timeout.as_secs(), "Loading catalog");

    let bytes = tokio::time::timeout(timeout, read_source(client, source))
        .await
        .map_err(|_| LoadError::Timeout(timeout))??;

    let ParseResult { apps, skipped } =
        parse_catalog(&bytes).map_err(|e| LoadError::Malformed(e.to_string()))?;

    if skipped > 0 {
        tracing::warn!(source = %source, skipped, "Undecodable catalog entries skipped");
    }

    Ok(LoadedCatalog { apps, skipped })
}

async fn read_source(
    client: &reqwest::Client,
    source: &CatalogSource,
) -> Result<Vec<u8>, LoadError> {
    match source {
        CatalogSource::Http(url) => {
            let response = client
                .get(url.clone())
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache")
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::HttpStatus(status.as_u16()));
            }

            read_limited_bytes(response, MAX_CATALOG_SIZE).await
        }
        CatalogSource::File(path) => read_limited_file(path, MAX_CATALOG_SIZE).await,
    }
}

fn map_reqwest_error(e: reqwest::Error) -> LoadError {
    match e.status() {
        Some(status) => LoadError::HttpStatus(status.as_u16()),
        None => LoadError::Network(e.to_string()),
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, LoadError> {
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(LoadError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(LoadError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

async fn read_limited_file(path: &Path, limit: usize) -> Result<Vec<u8>, LoadError> {
    let io_err = |e: std::io::Error| LoadError::Network(format!("{}: {e}", path.display()));

    let metadata = tokio::fs::metadata(path).await.map_err(io_err)?;
    if metadata.len() > limit as u64 {
        return Err(LoadError::ResponseTooLarge);
    }
    tokio::fs::read(path).await.map_err(io_err)
}
