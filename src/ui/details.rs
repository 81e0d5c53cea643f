//! Details popup for the selected app.

use crate::app::App;
use crate::render::{Card, IconRef};
use crate::util::sanitize_inline;
use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::help::centered_rect;

pub(super) fn render(f: &mut Frame, app: &App) {
    let Some(record) = app.selected_app() else {
        return;
    };

    let popup = centered_rect(70, 60, f.area());
    if popup.width < 20 || popup.height < 6 {
        return;
    }

    let card = Card::from_record(record);
    let label = app.style("popup_label");
    let field = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("{name:<10}"), label), Span::raw(value)])
    };

    let icon = match &card.icon {
        IconRef::Remote(url) => url.to_string(),
        IconRef::Placeholder => "(placeholder)".to_string(),
    };
    let time = |t: &Option<String>| {
        t.as_deref()
            .map(|s| sanitize_inline(s).into_owned())
            .unwrap_or_else(|| "-".to_string())
    };

    let lines = vec![
        field("Name", card.name.clone()),
        field("Company", card.company.clone()),
        field("Category", card.category_label.to_string()),
        field("ID", card.id.to_string()),
        field("App ID", card.app_id.clone().unwrap_or_else(|| "-".to_string())),
        field("Icon", icon),
        field("Added", time(&record.insert_time)),
        field("Updated", time(&record.update_time)),
    ];

    f.render_widget(Clear, popup);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(" App details (Esc to close) "),
        );
    f.render_widget(paragraph, popup);
}
