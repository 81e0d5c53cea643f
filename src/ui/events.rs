//! Application event handling.
//!
//! Background tasks report back through `AppEvent`; this module folds
//! those reports into the app state.

use crate::app::{App, AppEvent};

pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::CatalogLoaded { generation, result } => {
            if let Err(e) = &result {
                tracing::warn!(generation, error = %e, "Catalog load failed");
            }
            app.apply_load_result(generation, result);
        }
        AppEvent::TaskPanicked { task, error } => {
            app.apply_task_panic(task, &error);
        }
    }
    app.needs_redraw = true;
}
