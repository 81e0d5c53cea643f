//! Input handling for the TUI.
//!
//! Keys are resolved through the keybinding registry using the context of
//! whatever currently has focus: the help overlay, the details popup, the
//! search box, or the card list.

use crate::app::{App, AppEvent};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::spawn_catalog_load;
use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Help overlay captures all keys while visible
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    let context = if app.search_mode {
        KbContext::Search
    } else if app.show_details {
        KbContext::Details
    } else {
        KbContext::Global
    };

    let action = app.keybindings.action_for_key(code, modifiers, context);

    if context == KbContext::Search && action.is_none() {
        handle_search_typing(app, code, modifiers);
        return Ok(Action::Continue);
    }

    match action {
        Some(action) => Ok(dispatch(app, action, event_tx)),
        None => Ok(Action::Continue),
    }
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Editing keys in the search box that have no binding.
fn handle_search_typing(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Backspace => app.search_backspace(),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_push_char(c);
        }
        _ => {}
    }
}

fn dispatch(app: &mut App, action: KbAction, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    match action {
        KbAction::Quit => return Action::Quit,
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::NavTop => app.nav_top(),
        KbAction::NavBottom => app.nav_bottom(),
        KbAction::Back => {
            // Priority: close a popup first, then drop an applied search
            if !app.close_popup() && !app.view.search_term().is_empty() {
                app.clear_search();
            }
        }
        KbAction::ShowDetails => app.open_details(),
        KbAction::Refresh => spawn_catalog_load(app, event_tx),
        KbAction::EnterSearch => app.enter_search(),
        KbAction::ExitSearch => app.clear_search(),
        KbAction::CommitSearch => app.commit_search(),
        KbAction::NextCategory => app.cycle_category(true),
        KbAction::PrevCategory => app.cycle_category(false),
        KbAction::SelectCategory(n) => app.select_category_index(usize::from(n)),
        KbAction::DeleteApp => {
            if let Some(id) = app.delete_selected() {
                tracing::info!(id, "Removed app from local catalog");
            }
        }
        KbAction::CycleTheme => app.cycle_theme(),
        KbAction::ShowHelp => app.toggle_help(),
    }
    Action::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AppRecord, Category};
    use crate::config::Config;
    use crate::source::{CatalogSource, LoadedCatalog};

    fn record(id: i64, name: &str, category: Category) -> AppRecord {
        AppRecord {
            id,
            app_id: None,
            name: name.to_string(),
            company: "Acme".to_string(),
            category,
            icon_url: String::new(),
            update_time: None,
            insert_time: None,
        }
    }

    fn loaded_app() -> App {
        let mut app = App::new(CatalogSource::default(), &Config::default()).unwrap();
        let generation = app.begin_refresh().unwrap();
        app.apply_load_result(
            generation,
            Ok(LoadedCatalog {
                apps: vec![
                    record(1, "Alpha", Category::Game),
                    record(2, "Beta", Category::News),
                ],
                skipped: 0,
            }),
        );
        app
    }

    fn press(app: &mut App, code: KeyCode, tx: &mpsc::Sender<AppEvent>) -> Action {
        handle_input(app, code, KeyModifiers::NONE, tx).unwrap()
    }

    #[tokio::test]
    async fn q_quits_from_list() {
        let (tx, _rx) = mpsc::channel(4);
        let mut app = loaded_app();
        assert!(matches!(press(&mut app, KeyCode::Char('q'), &tx), Action::Quit));
    }

    #[tokio::test]
    async fn search_mode_types_bound_letters() {
        let (tx, _rx) = mpsc::channel(4);
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'), &tx);
        assert!(app.search_mode);

        // 'q' and 'j' are list bindings but must land in the query here
        for c in ['q', 'j'] {
            assert!(matches!(press(&mut app, KeyCode::Char(c), &tx), Action::Continue));
        }
        assert_eq!(app.search_input, "qj");

        press(&mut app, KeyCode::Backspace, &tx);
        assert_eq!(app.search_input, "q");
    }

    #[tokio::test]
    async fn enter_commits_and_esc_clears_search() {
        let (tx, _rx) = mpsc::channel(4);
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'), &tx);
        press(&mut app, KeyCode::Char('b'), &tx);
        press(&mut app, KeyCode::Enter, &tx);
        assert!(!app.search_mode);
        assert_eq!(app.view.visible_count(), 1);

        press(&mut app, KeyCode::Esc, &tx);
        assert_eq!(app.view.search_term(), "");
        assert_eq!(app.view.visible_count(), 2);
    }

    #[tokio::test]
    async fn digit_selects_category() {
        let (tx, _rx) = mpsc::channel(4);
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('1'), &tx);
        assert_eq!(app.view.category_filter(), Some(Category::Game));
        press(&mut app, KeyCode::Char('0'), &tx);
        assert_eq!(app.view.category_filter(), None);
    }

    #[tokio::test]
    async fn refresh_spawns_one_load() {
        let (tx, _rx) = mpsc::channel(4);
        let mut app = loaded_app();
        let before = app.load_generation;

        press(&mut app, KeyCode::Char('r'), &tx);
        assert_eq!(app.load_generation, before + 1);
        assert!(app.load_handle.is_some());

        // Second press while loading is dropped
        press(&mut app, KeyCode::Char('r'), &tx);
        assert_eq!(app.load_generation, before + 1);
    }

    #[tokio::test]
    async fn help_overlay_captures_keys() {
        let (tx, _rx) = mpsc::channel(4);
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('?'), &tx);
        assert!(app.show_help);

        press(&mut app, KeyCode::Char('j'), &tx);
        assert_eq!(app.help_scroll_offset, 1);
        assert_eq!(app.selected, 0);

        press(&mut app, KeyCode::Esc, &tx);
        assert!(!app.show_help);
    }

    #[tokio::test]
    async fn details_popup_closes_on_q_without_quitting() {
        let (tx, _rx) = mpsc::channel(4);
        let mut app = loaded_app();
        press(&mut app, KeyCode::Enter, &tx);
        assert!(app.show_details);
        assert!(matches!(press(&mut app, KeyCode::Char('q'), &tx), Action::Continue));
        assert!(!app.show_details);
    }
}
