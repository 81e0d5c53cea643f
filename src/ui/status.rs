use crate::app::App;
use crate::catalog::LoadStatus;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(&**msg)
    } else if app.search_mode {
        Cow::Borrowed("Type to search | ESC clear | ENTER apply | Tab category")
    } else if app.show_details {
        Cow::Borrowed("[Esc/Enter]close [q]close")
    } else if app.view.load_status() == LoadStatus::Error {
        Cow::Borrowed("[r]etry [/]search [c]ategory [?]help [q]uit")
    } else {
        match app.view.last_loaded_at() {
            Some(at) => Cow::Owned(format!(
                "[/]search [c]ategory [Enter]details [r]eload [?]help [q]uit | loaded {}",
                at.format("%H:%M:%S")
            )),
            None => Cow::Borrowed("[/]search [c]ategory [Enter]details [r]eload [?]help [q]uit"),
        }
    };

    f.render_widget(Paragraph::new(text).style(app.style("status_bar")), area);
}
