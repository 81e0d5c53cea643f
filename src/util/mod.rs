//! Utility functions shared by the loader and the renderers.
//!
//! - **Text**: Unicode-aware width, truncation and control-character stripping
//! - **URLs**: validation of URLs that come from catalog data
//!
//! ```
//! use appshelf::util::{display_width, truncate_to_width};
//!
//! assert_eq!(display_width("Hello 世界"), 10);
//! assert_eq!(truncate_to_width("A rather long app name", 10), "A rathe...");
//! ```

mod text;
mod url_validator;

pub use text::{display_width, sanitize_inline, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_url, UrlValidationError};

/// Maximum accepted search term length, in characters.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
