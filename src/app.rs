use crate::catalog::{
    filter_label, AppDraft, AppRecord, CatalogView, CatalogWriter, Category, LoadStatus,
    ReadOnlyWriter, WriteError, CATEGORY_FILTERS,
};
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::keybindings::KeybindingRegistry;
use crate::source::{build_http_client, CatalogSource, LoadError, LoadedCatalog};
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use anyhow::{Context as _, Result};
use ratatui::style::Style;
use std::borrow::Cow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How long a status bar message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Number of frames in the loading spinner animation.
pub const SPINNER_FRAMES: usize = 10;

// ============================================================================
// Events
// ============================================================================

/// Messages sent from background tasks to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A catalog load settled.
    ///
    /// `generation` identifies the load that produced this result; results
    /// from superseded loads are discarded.
    CatalogLoaded {
        generation: u64,
        result: Result<LoadedCatalog, LoadError>,
    },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// App State
// ============================================================================

pub struct App {
    pub http_client: reqwest::Client,
    pub source: CatalogSource,
    pub load_timeout: Duration,

    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,
    pub keybindings: KeybindingRegistry,

    pub view: CatalogView,
    writer: Box<dyn CatalogWriter>,

    /// Index into `view.visible_apps()`.
    pub selected: usize,

    pub search_mode: bool,
    /// Text in the search box; may run ahead of the applied term while debounced.
    pub search_input: String,
    pub search_debounce: Debouncer<String>,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,
    pub spinner_frame: usize,

    pub show_help: bool,
    pub help_scroll_offset: u16,
    pub show_details: bool,

    pub load_generation: u64,
    pub load_handle: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(source: CatalogSource, config: &Config) -> Result<Self> {
        let http_client = build_http_client().context("Failed to build HTTP client")?;

        let theme_variant = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme, using dark");
            ThemeVariant::Dark
        });

        let mut keybindings = KeybindingRegistry::new();
        for warning in keybindings.apply_overrides(&config.keybindings) {
            tracing::warn!("{}", warning);
        }

        Ok(Self {
            http_client,
            source,
            load_timeout: config.load_timeout(),
            theme_variant,
            theme: StyleMap::for_variant(theme_variant),
            keybindings,
            view: CatalogView::new(),
            writer: Box::new(ReadOnlyWriter),
            selected: 0,
            search_mode: false,
            search_input: String::new(),
            search_debounce: Debouncer::new(config.search_debounce()),
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
            show_help: false,
            help_scroll_offset: 0,
            show_details: false,
            load_generation: 0,
            load_handle: None,
        })
    }

    /// Replace the write-back target for local edits.
    pub fn with_writer(mut self, writer: Box<dyn CatalogWriter>) -> Self {
        self.writer = writer;
        self
    }

    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    // ------------------------------------------------------------------
    // Status bar
    // ------------------------------------------------------------------

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear the status message once it is older than 3 seconds.
    /// Returns true if a message was actually cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        match &self.status_message {
            Some((_, at)) if at.elapsed() >= STATUS_TTL => {
                self.status_message = None;
                true
            }
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn selected_app(&self) -> Option<&AppRecord> {
        self.view.visible_apps().get(self.selected)
    }

    pub fn nav_down(&mut self) {
        if self.selected + 1 < self.view.visible_count() {
            self.selected += 1;
        }
    }

    pub fn nav_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn nav_top(&mut self) {
        self.selected = 0;
    }

    pub fn nav_bottom(&mut self) {
        self.selected = self.view.visible_count().saturating_sub(1);
    }

    /// Keep `selected` inside the visible list after it changes.
    pub fn clamp_selection(&mut self) {
        let len = self.view.visible_count();
        if len == 0 {
            self.selected = 0;
            self.show_details = false;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    // ------------------------------------------------------------------
    // Search (debounced)
    // ------------------------------------------------------------------

    pub fn enter_search(&mut self) {
        self.search_mode = true;
        self.show_details = false;
    }

    pub fn search_push_char(&mut self, c: char) {
        if self.search_input.chars().count() >= MAX_SEARCH_QUERY_LENGTH {
            self.set_status(format!(
                "Search query too long (max {} chars)",
                MAX_SEARCH_QUERY_LENGTH
            ));
            return;
        }
        self.search_input.push(c);
        self.on_search_edit();
    }

    pub fn search_backspace(&mut self) {
        if self.search_input.pop().is_some() {
            self.on_search_edit();
        }
    }

    /// Schedule the current search box text; restarts the debounce window.
    pub fn on_search_edit(&mut self) {
        self.search_debounce.push(self.search_input.clone());
    }

    /// Apply the pending search term if its quiet window has elapsed.
    /// Returns true when a filter pass ran.
    pub fn poll_search_debounce(&mut self) -> bool {
        match self.search_debounce.poll() {
            Some(term) => {
                self.apply_search(term);
                true
            }
            None => false,
        }
    }

    /// Apply the search box text now and leave search mode.
    pub fn commit_search(&mut self) {
        self.search_debounce.cancel();
        self.apply_search(self.search_input.clone());
        self.search_mode = false;
    }

    /// Clear the search box, apply the empty term now and leave search mode.
    pub fn clear_search(&mut self) {
        self.search_debounce.cancel();
        self.search_input.clear();
        self.search_mode = false;
        if !self.view.search_term().is_empty() {
            self.apply_search(String::new());
        }
    }

    fn apply_search(&mut self, term: String) {
        tracing::debug!(term = %term, "Applying search");
        self.view.set_search_term(term);
        self.selected = 0;
        self.clamp_selection();
    }

    // ------------------------------------------------------------------
    // Category filter (immediate)
    // ------------------------------------------------------------------

    /// Apply a category filter now, folding in any pending search term so a
    /// single filter pass reflects both inputs.
    pub fn set_category(&mut self, category: Option<Category>) {
        match self.search_debounce.flush() {
            Some(term) => self.view.set_filters(term, category),
            None => self.view.set_category(category),
        }
        self.selected = 0;
        self.clamp_selection();
        self.set_status(format!("Category: {}", filter_label(category)));
    }

    /// Step through All → Game → Short Video → News → General → Unknown.
    pub fn cycle_category(&mut self, forward: bool) {
        let len = CATEGORY_FILTERS.len();
        let current = CATEGORY_FILTERS
            .iter()
            .position(|c| *c == self.view.category_filter())
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.set_category(CATEGORY_FILTERS[next]);
    }

    pub fn select_category_index(&mut self, index: usize) {
        if let Some(category) = CATEGORY_FILTERS.get(index) {
            self.set_category(*category);
        }
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Move the view to `Loading` and return the generation for the new
    /// load, or `None` when a load is already in flight.
    pub fn begin_refresh(&mut self) -> Option<u64> {
        if !self.view.begin_load() {
            self.set_status("Refresh already in progress");
            return None;
        }
        self.load_generation = self.load_generation.wrapping_add(1);
        self.spinner_frame = 0;
        self.set_status("Loading apps...");
        Some(self.load_generation)
    }

    /// Settle a load. Results from superseded generations are dropped.
    pub fn apply_load_result(
        &mut self,
        generation: u64,
        result: Result<LoadedCatalog, LoadError>,
    ) {
        if generation != self.load_generation {
            tracing::debug!(
                generation,
                current = self.load_generation,
                "Discarding stale load result"
            );
            return;
        }
        self.load_handle = None;

        let message: Cow<'static, str> = match &result {
            Ok(loaded) if loaded.skipped > 0 => format!(
                "Loaded {} apps ({} invalid entries skipped)",
                loaded.apps.len(),
                loaded.skipped
            )
            .into(),
            Ok(loaded) => format!("Loaded {} apps", loaded.apps.len()).into(),
            Err(e) => e.user_message().into(),
        };

        self.view.finish_load(result);
        self.clamp_selection();
        self.set_status(message);
    }

    /// A background task died; a pending load is settled as failed.
    pub fn apply_task_panic(&mut self, task: &'static str, error: &str) {
        tracing::error!(task, error = %error, "Background task panicked");
        if self.view.load_status() == LoadStatus::Loading {
            self.load_handle = None;
            self.view
                .fail_load("Failed to load apps: the loader stopped unexpectedly. Press r to retry.");
        }
        self.set_status(format!("Internal error in {task}"));
    }

    pub fn tick_spinner(&mut self) -> bool {
        if self.view.load_status() == LoadStatus::Loading {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES;
            return true;
        }
        false
    }

    // ------------------------------------------------------------------
    // Local edits
    // ------------------------------------------------------------------

    /// Add a record locally and offer the catalog to the writer.
    pub fn add_app(&mut self, draft: AppDraft) -> i64 {
        let id = self.view.add_app(draft);
        self.save_after_edit(format!("Added app #{id}"));
        id
    }

    /// Remove the selected record locally. Returns its id.
    pub fn delete_selected(&mut self) -> Option<i64> {
        let Some(app) = self.selected_app() else {
            self.set_status("No app selected");
            return None;
        };
        let (id, name) = (app.id, app.name.clone());

        self.view.delete_app(id);
        self.clamp_selection();
        self.save_after_edit(format!("Removed {name}"));
        Some(id)
    }

    pub fn clear_all(&mut self) {
        self.view.clear_all();
        self.clamp_selection();
        self.save_after_edit("Cleared all apps".to_string());
    }

    fn save_after_edit(&mut self, done: String) {
        match self.writer.save(self.view.all_apps()) {
            Ok(()) => self.set_status(done),
            Err(WriteError::ReadOnly) => {
                self.set_status(format!("{done} (local only until next refresh)"))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save catalog");
                self.set_status(format!("{done}, but saving failed: {e}"));
            }
        }
    }

    // ------------------------------------------------------------------
    // Popups and theme
    // ------------------------------------------------------------------

    pub fn open_details(&mut self) {
        if self.selected_app().is_some() {
            self.show_details = true;
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        self.help_scroll_offset = 0;
    }

    /// Close the top-most popup. Returns false if nothing was open.
    pub fn close_popup(&mut self) -> bool {
        if self.show_help {
            self.show_help = false;
            true
        } else if self.show_details {
            self.show_details = false;
            true
        } else {
            false
        }
    }

    pub fn cycle_theme(&mut self) {
        self.theme_variant = self.theme_variant.next();
        self.theme = StyleMap::for_variant(self.theme_variant);
        self.set_status(format!("Theme: {}", self.theme_variant.name()));
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
            tracing::debug!("Aborted catalog load task on App drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time::{self, Duration};

    fn record(id: i64, name: &str, company: &str, category: Category) -> AppRecord {
        AppRecord {
            id,
            app_id: None,
            name: name.to_string(),
            company: company.to_string(),
            category,
            icon_url: String::new(),
            update_time: None,
            insert_time: None,
        }
    }

    fn test_app() -> App {
        App::new(CatalogSource::default(), &Config::default()).unwrap()
    }

    fn loaded_app() -> App {
        let mut app = test_app();
        let generation = app.begin_refresh().unwrap();
        app.apply_load_result(
            generation,
            Ok(LoadedCatalog {
                apps: vec![
                    record(1, "Alpha", "Acme", Category::Game),
                    record(2, "Beta", "Zenith", Category::News),
                    record(3, "Alpine", "Peak", Category::News),
                ],
                skipped: 0,
            }),
        );
        app
    }

    fn visible_ids(app: &App) -> Vec<i64> {
        app.view.visible_apps().iter().map(|a| a.id).collect()
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.search_push_char(c);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn keystroke_burst_runs_one_filter_pass() {
        let mut app = loaded_app();
        let before = app.view.filter_passes();

        app.enter_search();
        app.search_push_char('a');
        time::advance(Duration::from_millis(50)).await;
        app.search_push_char('l');
        time::advance(Duration::from_millis(50)).await;
        app.search_push_char('p');

        assert!(!app.poll_search_debounce());
        time::advance(Duration::from_millis(299)).await;
        assert!(!app.poll_search_debounce());
        time::advance(Duration::from_millis(1)).await;
        assert!(app.poll_search_debounce());

        assert_eq!(app.view.filter_passes(), before + 1);
        assert_eq!(app.view.search_term(), "alp");
        assert_eq!(visible_ids(&app), vec![1, 3]);
        assert!(!app.poll_search_debounce());
    }

    #[tokio::test(start_paused = true)]
    async fn commit_search_applies_immediately() {
        let mut app = loaded_app();
        app.enter_search();
        type_str(&mut app, "zen");
        app.commit_search();

        assert_eq!(visible_ids(&app), vec![2]);
        assert!(!app.search_mode);
        assert!(!app.search_debounce.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_search_restores_full_list() {
        let mut app = loaded_app();
        app.enter_search();
        type_str(&mut app, "beta");
        app.commit_search();
        app.enter_search();
        app.clear_search();

        assert_eq!(app.view.search_term(), "");
        assert_eq!(visible_ids(&app), vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn category_change_folds_pending_term() {
        let mut app = loaded_app();
        let before = app.view.filter_passes();

        app.enter_search();
        type_str(&mut app, "al");
        app.set_category(Some(Category::News));

        assert_eq!(app.view.filter_passes(), before + 1);
        assert_eq!(visible_ids(&app), vec![3]);
        assert!(!app.search_debounce.is_pending());
    }

    #[test]
    fn cycle_category_wraps_both_ways() {
        let mut app = loaded_app();
        app.cycle_category(true);
        assert_eq!(app.view.category_filter(), Some(Category::Game));
        app.cycle_category(false);
        app.cycle_category(false);
        assert_eq!(app.view.category_filter(), Some(Category::Unknown));
        app.select_category_index(0);
        assert_eq!(app.view.category_filter(), None);
        app.select_category_index(42);
        assert_eq!(app.view.category_filter(), None);
    }

    #[test]
    fn refresh_while_loading_is_dropped() {
        let mut app = loaded_app();
        let generation = app.begin_refresh();
        assert!(generation.is_some());
        assert_eq!(app.begin_refresh(), None);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Refresh already in progress");
    }

    #[test]
    fn failed_refresh_keeps_catalog_and_reports_status() {
        let mut app = loaded_app();
        let generation = app.begin_refresh().unwrap();
        app.apply_load_result(generation, Err(LoadError::HttpStatus(500)));

        assert_eq!(app.view.load_status(), LoadStatus::Error);
        assert_eq!(visible_ids(&app), vec![1, 2, 3]);
        assert!(app.view.error_message().unwrap().contains("500"));
    }

    #[test]
    fn stale_generation_is_ignored() {
        let mut app = loaded_app();
        let generation = app.begin_refresh().unwrap();
        app.apply_load_result(generation - 1, Ok(LoadedCatalog { apps: vec![], skipped: 0 }));
        assert_eq!(app.view.load_status(), LoadStatus::Loading);
        assert_eq!(app.view.total_count(), 3);
    }

    #[test]
    fn panic_during_load_becomes_error() {
        let mut app = loaded_app();
        app.begin_refresh().unwrap();
        app.apply_task_panic("catalog_load", "boom");
        assert_eq!(app.view.load_status(), LoadStatus::Error);
        assert_eq!(app.view.total_count(), 3);
        assert!(app.begin_refresh().is_some());
    }

    #[test]
    fn navigation_is_clamped() {
        let mut app = loaded_app();
        app.nav_up();
        assert_eq!(app.selected, 0);
        app.nav_bottom();
        assert_eq!(app.selected, 2);
        app.nav_down();
        assert_eq!(app.selected, 2);
        app.set_category(Some(Category::Game));
        assert_eq!(app.selected, 0);
        assert_eq!(app.selected_app().unwrap().name, "Alpha");
    }

    struct CountingWriter(Arc<AtomicUsize>);

    impl CatalogWriter for CountingWriter {
        fn save(&self, _apps: &[AppRecord]) -> Result<(), WriteError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn edits_go_through_writer() {
        let saves = Arc::new(AtomicUsize::new(0));
        let mut app = loaded_app().with_writer(Box::new(CountingWriter(saves.clone())));

        app.nav_bottom();
        assert_eq!(app.delete_selected(), Some(3));
        let id = app.add_app(AppDraft {
            name: "Gamma".into(),
            ..Default::default()
        });
        assert_eq!(id, 3);
        assert_eq!(saves.load(Ordering::SeqCst), 2);
        assert_eq!(app.selected, 1);
    }

    struct FailingWriter;

    impl CatalogWriter for FailingWriter {
        fn save(&self, _apps: &[AppRecord]) -> Result<(), WriteError> {
            Err(std::io::Error::other("disk full").into())
        }
    }

    #[test]
    fn failed_save_keeps_edit_and_reports_error() {
        let mut app = loaded_app().with_writer(Box::new(FailingWriter));
        assert_eq!(app.delete_selected(), Some(1));
        assert_eq!(visible_ids(&app), vec![2, 3]);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("saving failed"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn read_only_delete_stays_local() {
        let mut app = loaded_app();
        assert_eq!(app.delete_selected(), Some(1));
        assert_eq!(visible_ids(&app), vec![2, 3]);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("local only"));
    }

    #[test]
    fn details_require_a_selection() {
        let mut app = test_app();
        app.open_details();
        assert!(!app.show_details);

        let mut app = loaded_app();
        app.open_details();
        assert!(app.show_details);
        assert!(app.close_popup());
        assert!(!app.close_popup());
    }

    #[test]
    fn theme_cycles() {
        let mut app = test_app();
        assert_eq!(app.theme_variant, ThemeVariant::Dark);
        app.cycle_theme();
        assert_eq!(app.theme_variant, ThemeVariant::Light);
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let mut app = test_app();
        time::pause();
        app.set_status("Test message");

        time::advance(Duration::from_secs(2)).await;
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(1)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }
}
