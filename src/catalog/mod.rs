//! Catalog model, filter engine, and view state.
//!
//! - [`types`] - `AppRecord`, `Category` and its label table
//! - [`filter`] - pure search/category filtering
//! - [`view`] - `CatalogView`, the state container behind the UI
//! - [`writer`] - write-back seam for local edits

mod filter;
mod types;
mod view;
mod writer;

pub use filter::{filter, matches_category, matches_term, normalize_term};
pub use types::{
    filter_label, AppDraft, AppRecord, CatalogDocument, Category, CategoryParseError,
    CATEGORY_FILTERS, UNKNOWN_APP, UNKNOWN_COMPANY,
};
pub use view::{CatalogView, LoadStatus, LOCAL_TIME_FORMAT};
pub use writer::{CatalogWriter, ReadOnlyWriter, WriteError};
