//! View state: the loaded catalog, the derived visible subset, and the
//! load lifecycle.
//!
//! `CatalogView` is the single owner of catalog state. Every mutation goes
//! through a method here, and every method that can change the inputs of the
//! filter ends by recomputing `visible_apps` from scratch.

use super::filter::filter;
use super::types::{AppDraft, AppRecord, Category};
use crate::source::{LoadError, LoadedCatalog};
use chrono::{DateTime, Local};
use std::sync::Arc;

/// Timestamp format used for locally stamped insert/update times.
pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lifecycle of the most recent load attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Catalog state plus the filter inputs and their derived result.
///
/// Catalogs are held behind `Arc` and replaced wholesale; nothing here
/// mutates a catalog in place. A failed load leaves `all_apps` exactly as it
/// was (stale data is kept and shown under the error banner).
#[derive(Debug, Default)]
pub struct CatalogView {
    all_apps: Arc<Vec<AppRecord>>,
    visible_apps: Arc<Vec<AppRecord>>,
    search_term: String,
    category_filter: Option<Category>,
    load_status: LoadStatus,
    error_message: Option<String>,
    last_loaded_at: Option<DateTime<Local>>,
    skipped_on_load: usize,
    /// Number of times the filter has been evaluated.
    filter_passes: u64,
}

impl CatalogView {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn all_apps(&self) -> &[AppRecord] {
        &self.all_apps
    }

    pub fn visible_apps(&self) -> &[AppRecord] {
        &self.visible_apps
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn category_filter(&self) -> Option<Category> {
        self.category_filter
    }

    pub fn load_status(&self) -> LoadStatus {
        self.load_status
    }

    /// Human-readable reason for the last failed load, if the current status is `Error`.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn last_loaded_at(&self) -> Option<DateTime<Local>> {
        self.last_loaded_at
    }

    /// Records dropped by the parser during the last successful load.
    pub fn skipped_on_load(&self) -> usize {
        self.skipped_on_load
    }

    pub fn filter_passes(&self) -> u64 {
        self.filter_passes
    }

    pub fn total_count(&self) -> usize {
        self.all_apps.len()
    }

    pub fn visible_count(&self) -> usize {
        self.visible_apps.len()
    }

    /// Visible count, but only when filtering actually hides something.
    pub fn filtered_count(&self) -> Option<usize> {
        (self.visible_apps.len() != self.all_apps.len()).then_some(self.visible_apps.len())
    }

    pub fn get_by_id(&self, id: i64) -> Option<&AppRecord> {
        self.all_apps.iter().find(|a| a.id == id)
    }

    pub fn get_by_app_id(&self, app_id: &str) -> Option<&AppRecord> {
        self.all_apps
            .iter()
            .find(|a| a.app_id.as_deref() == Some(app_id))
    }

    // ------------------------------------------------------------------
    // Load lifecycle
    // ------------------------------------------------------------------

    /// Transition to `Loading`.
    ///
    /// Returns `false` (and changes nothing) when a load is already in
    /// flight; duplicate refresh requests are dropped, not queued.
    pub fn begin_load(&mut self) -> bool {
        if self.load_status == LoadStatus::Loading {
            tracing::debug!("Load already in flight, dropping refresh request");
            return false;
        }
        self.load_status = LoadStatus::Loading;
        true
    }

    /// Settle the in-flight load.
    pub fn finish_load(&mut self, result: Result<LoadedCatalog, LoadError>) {
        match result {
            Ok(loaded) => {
                tracing::info!(
                    count = loaded.apps.len(),
                    skipped = loaded.skipped,
                    "Catalog loaded"
                );
                self.all_apps = Arc::new(loaded.apps);
                self.skipped_on_load = loaded.skipped;
                self.load_status = LoadStatus::Loaded;
                self.error_message = None;
                self.last_loaded_at = Some(Local::now());
                self.refilter();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Catalog load failed");
                self.fail_load(e.user_message());
            }
        }
    }

    /// Settle the in-flight load as failed with a ready-made message.
    ///
    /// The previous catalog and the visible subset are left untouched.
    pub fn fail_load(&mut self, message: impl Into<String>) {
        tracing::debug!(retained = self.all_apps.len(), "Keeping previous catalog");
        self.load_status = LoadStatus::Error;
        self.error_message = Some(message.into());
    }

    // ------------------------------------------------------------------
    // Filter inputs
    // ------------------------------------------------------------------

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.refilter();
    }

    pub fn set_category(&mut self, category: Option<Category>) {
        self.category_filter = category;
        self.refilter();
    }

    /// Update both filter inputs with a single recompute.
    pub fn set_filters(&mut self, term: impl Into<String>, category: Option<Category>) {
        self.search_term = term.into();
        self.category_filter = category;
        self.refilter();
    }

    /// Recompute `visible_apps` from `all_apps` and the current inputs.
    pub fn refilter(&mut self) {
        self.visible_apps = Arc::new(filter(
            &self.all_apps,
            &self.search_term,
            self.category_filter,
        ));
        self.filter_passes = self.filter_passes.wrapping_add(1);
        tracing::debug!(
            term = %self.search_term,
            category = ?self.category_filter,
            visible = self.visible_apps.len(),
            total = self.all_apps.len(),
            "Filter applied"
        );
    }

    // ------------------------------------------------------------------
    // Local edits (in-memory only; see catalog::writer)
    // ------------------------------------------------------------------

    /// Append a record built from `draft` and return its assigned id.
    pub fn add_app(&mut self, draft: AppDraft) -> i64 {
        let id = self
            .all_apps
            .iter()
            .map(|a| a.id)
            .max()
            .map_or(1, |max| max.saturating_add(1));
        let now = Local::now().format(LOCAL_TIME_FORMAT).to_string();

        let mut apps = self.all_apps.as_ref().clone();
        apps.push(AppRecord {
            id,
            app_id: draft.app_id,
            name: draft.name,
            company: draft.company,
            category: draft.category,
            icon_url: draft.icon_url,
            update_time: Some(now.clone()),
            insert_time: Some(now),
        });
        self.all_apps = Arc::new(apps);
        self.refilter();
        id
    }

    /// Remove every record with `id`. Returns how many were removed.
    pub fn delete_app(&mut self, id: i64) -> usize {
        let before = self.all_apps.len();
        let apps: Vec<AppRecord> = self
            .all_apps
            .iter()
            .filter(|a| a.id != id)
            .cloned()
            .collect();
        let removed = before - apps.len();
        if removed > 0 {
            self.all_apps = Arc::new(apps);
            self.refilter();
        }
        removed
    }

    pub fn clear_all(&mut self) {
        self.all_apps = Arc::new(Vec::new());
        self.refilter();
        tracing::info!("All apps cleared");
    }
}
