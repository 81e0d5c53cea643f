//! Turns catalog view state into display commands.
//!
//! Rendering is split in two: [`render_catalog`] decides *what* to show from
//! a [`CatalogView`], and a [`DisplaySurface`] decides *how*. The terminal
//! UI, the `--print` mode and the tests each provide their own surface.
//!
//! Text taken from catalog data is never interpreted as markup or escape
//! sequences. [`Card::from_record`] strips control characters up front, so
//! surfaces can write card fields verbatim.

mod plain;
mod recording;

pub use plain::PlainSurface;
pub use recording::{RecordingSurface, SurfaceCommand};

use crate::catalog::{AppRecord, CatalogView, Category, LoadStatus};
use crate::util::{sanitize_inline, validate_url};
use url::Url;

/// Image shown for records without a usable icon URL.
pub const PLACEHOLDER_ICON_URL: &str = "https://via.placeholder.com/60?text=App";

/// Icon to display for a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconRef {
    Remote(Url),
    /// Icon URL was empty or unusable; surfaces show a placeholder.
    Placeholder,
}

impl IconRef {
    pub fn resolve(raw: &str) -> Self {
        match validate_url(raw) {
            Ok(url) => Self::Remote(url),
            Err(e) => {
                if !raw.trim().is_empty() {
                    tracing::trace!(url = raw, error = %e, "Icon URL rejected, using placeholder");
                }
                Self::Placeholder
            }
        }
    }

    /// URL to load, falling back to [`PLACEHOLDER_ICON_URL`].
    pub fn url(&self) -> &str {
        match self {
            Self::Remote(url) => url.as_str(),
            Self::Placeholder => PLACEHOLDER_ICON_URL,
        }
    }
}

/// One display-ready card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: i64,
    pub name: String,
    pub company: String,
    pub app_id: Option<String>,
    pub category: Category,
    pub category_label: &'static str,
    pub icon: IconRef,
    /// Date portion of the update time, if any.
    pub updated: Option<String>,
}

impl Card {
    pub fn from_record(app: &AppRecord) -> Self {
        Self {
            id: app.id,
            name: sanitize_inline(&app.name).into_owned(),
            company: sanitize_inline(&app.company).into_owned(),
            app_id: app
                .app_id
                .as_deref()
                .map(|id| sanitize_inline(id).into_owned()),
            category: app.category,
            category_label: app.category.label(),
            icon: IconRef::resolve(&app.icon_url),
            updated: app
                .update_time
                .as_deref()
                .and_then(trim_update_time)
                .map(|d| sanitize_inline(d).into_owned()),
        }
    }
}

/// Date part of an update timestamp: the text before the first space or `T`.
///
/// ```
/// use appshelf::render::trim_update_time;
///
/// assert_eq!(trim_update_time("2024-05-01 10:00:00"), Some("2024-05-01"));
/// assert_eq!(trim_update_time("2024-05-01T10:00:00Z"), Some("2024-05-01"));
/// assert_eq!(trim_update_time("   "), None);
/// ```
pub fn trim_update_time(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    let date = raw
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()
        .unwrap_or(raw);
    (!date.is_empty()).then_some(date)
}

/// Why the list area is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The catalog itself has no records.
    NoData,
    /// Records exist but none match the current search/category.
    NoMatches,
}

impl EmptyReason {
    pub fn message(self) -> &'static str {
        match self {
            Self::NoData => "No apps available.",
            Self::NoMatches => "No apps match the current search or category.",
        }
    }
}

/// Abstract output target for catalog rendering.
pub trait DisplaySurface {
    fn show_loading(&mut self);
    fn show_error(&mut self, message: &str);
    fn show_empty(&mut self, reason: EmptyReason);
    fn show_list(&mut self, cards: &[Card]);
    /// `filtered` is `Some` only when filtering hides part of the catalog.
    fn update_counts(&mut self, total: usize, filtered: Option<usize>);
}

/// Render `view` onto `surface`.
///
/// Counts are always published. Then, by load status:
/// - `Idle` - nothing further
/// - `Loading` - loading indicator
/// - `Error` - error message, followed by the retained list when the
///   previous catalog still has visible records
/// - `Loaded` - the visible cards in order, or an empty state
pub fn render_catalog<S: DisplaySurface + ?Sized>(view: &CatalogView, surface: &mut S) {
    surface.update_counts(view.total_count(), view.filtered_count());

    match view.load_status() {
        LoadStatus::Idle => {}
        LoadStatus::Loading => surface.show_loading(),
        LoadStatus::Error => {
            surface.show_error(view.error_message().unwrap_or("Failed to load apps."));
            if view.visible_count() > 0 {
                surface.show_list(&cards_for(view.visible_apps()));
            }
        }
        LoadStatus::Loaded => {
            if view.visible_count() > 0 {
                surface.show_list(&cards_for(view.visible_apps()));
            } else if view.total_count() == 0 {
                surface.show_empty(EmptyReason::NoData);
            } else {
                surface.show_empty(EmptyReason::NoMatches);
            }
        }
    }
}

pub fn cards_for(apps: &[AppRecord]) -> Vec<Card> {
    apps.iter().map(Card::from_record).collect()
}
