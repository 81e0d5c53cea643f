//! Shared helpers for background task management.

use crate::app::{App, AppEvent};
use crate::source;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Run a future, converting a panic into `Err(message)`.
///
/// Spawned tasks use this so a panic reaches the UI as
/// `AppEvent::TaskPanicked` instead of silently dropping the task.
///
/// # Example
///
/// ```ignore
/// tokio::spawn(async move {
///     match catch_task_panic(async { do_work().await }).await {
///         Ok(result) => handle_result(result),
///         Err(panic_msg) => {
///             let _ = tx.send(AppEvent::TaskPanicked { task: "work", error: panic_msg }).await;
///         }
///     }
/// });
/// ```
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Start a catalog load in the background.
///
/// Does nothing (beyond a status message) when a load is already in flight.
/// The result comes back as `AppEvent::CatalogLoaded` tagged with the
/// generation returned by [`App::begin_refresh`].
pub(super) fn spawn_catalog_load(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(generation) = app.begin_refresh() else {
        tracing::debug!("Catalog load already in flight, ignoring refresh");
        return;
    };

    if let Some(handle) = app.load_handle.take() {
        handle.abort();
        tracing::debug!("Aborted previous catalog load task");
    }

    let client = app.http_client.clone();
    let catalog_source = app.source.clone();
    let timeout = app.load_timeout;
    let tx = event_tx.clone();

    tracing::info!(source = %catalog_source, generation, "Spawning catalog load");

    app.load_handle = Some(tokio::spawn(async move {
        let outcome =
            catch_task_panic(source::load(&client, &catalog_source, timeout)).await;

        let event = match outcome {
            Ok(result) => AppEvent::CatalogLoaded { generation, result },
            Err(panic_msg) => {
                tracing::error!(task = "catalog_load", error = %panic_msg, "Background task panicked");
                AppEvent::TaskPanicked {
                    task: "catalog_load",
                    error: panic_msg,
                }
            }
        };

        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, event = "CatalogLoaded", "Channel send failed (receiver dropped)");
        }
    }));
}
