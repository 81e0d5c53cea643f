//! appshelf: a terminal browser for JSON app catalogs.
//!
//! The catalog is fetched once (and again on demand) from an http(s) URL or
//! a local file, filtered in memory by a search term and a category, and
//! rendered through the [`render::DisplaySurface`] trait.

pub mod app;
pub mod catalog;
pub mod config;
pub mod debounce;
pub mod keybindings;
pub mod render;
pub mod source;
pub mod theme;
pub mod ui;
pub mod util;
