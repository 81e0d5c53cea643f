//! Catalog data source: where the document lives and how it is fetched.
//!
//! - [`CatalogSource`] - an http(s) URL or a local file path
//! - [`fetcher`] - one-shot load with timeout, size cap and no-cache headers
//! - [`parser`] - tolerant decoding of the `{"apps": [...]}` document

mod fetcher;
mod parser;

pub use fetcher::{build_http_client, load, LoadError, LoadedCatalog, DEFAULT_LOAD_TIMEOUT};
pub use parser::{parse_catalog, ParseError, ParseResult};

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Default location of the catalog document.
pub const DEFAULT_SOURCE: &str = "./data/apps.json";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Unsupported URL scheme '{0}' (expected http, https or file)")]
    UnsupportedScheme(String),
    #[error("Invalid file URL: {0}")]
    InvalidFileUrl(String),
    #[error("Catalog source must not be empty")]
    Empty,
}

/// Where the catalog document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Http(Url),
    File(PathBuf),
}

impl CatalogSource {
    /// Interpret a user-supplied location.
    ///
    /// `http://` and `https://` become [`CatalogSource::Http`], `file://`
    /// URLs and anything that does not parse as an absolute URL become
    /// [`CatalogSource::File`].
    pub fn parse(raw: &str) -> Result<Self, SourceError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SourceError::Empty);
        }

        match Url::parse(raw) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(Self::Http(url)),
                "file" => url
                    .to_file_path()
                    .map(Self::File)
                    .map_err(|_| SourceError::InvalidFileUrl(raw.to_string())),
                // Single-letter schemes are Windows drive letters (C:\...).
                s if s.len() == 1 => Ok(Self::File(PathBuf::from(raw))),
                other => Err(SourceError::UnsupportedScheme(other.to_string())),
            },
            Err(_) => Ok(Self::File(PathBuf::from(raw))),
        }
    }
}

impl Default for CatalogSource {
    fn default() -> Self {
        Self::File(PathBuf::from(DEFAULT_SOURCE))
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
