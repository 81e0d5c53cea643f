//! Frame layout and overlay dispatch.

use crate::app::App;
use crate::catalog::{filter_label, CATEGORY_FILTERS};
use crate::render::render_catalog;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::catalog::TerminalSurface;
use super::{details, help, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(3), // search box
            Constraint::Length(1), // category tabs
            Constraint::Min(0),    // cards
            Constraint::Length(1), // status bar
        ])
        .split(area);

    render_search(f, app, chunks[1]);
    render_categories(f, app, chunks[2]);

    let mut surface = TerminalSurface::new(f, app, chunks[0], chunks[3]);
    render_catalog(&app.view, &mut surface);

    status::render(f, app, chunks[4]);

    if app.show_details {
        details::render(f, app);
    }
    if app.show_help {
        help::render(f, app);
    }
}

fn render_search(f: &mut Frame, app: &App, area: Rect) {
    let (border, title) = if app.search_mode {
        (app.style("search_active"), " Search (Enter to apply) ")
    } else {
        (app.style("panel_border"), " Search (/) ")
    };

    let mut spans = vec![Span::styled(app.search_input.as_str(), app.style("search_input"))];
    if app.search_mode {
        spans.push(Span::styled("_", app.style("search_active")));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title),
    );
    f.render_widget(paragraph, area);
}

fn render_categories(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = CATEGORY_FILTERS
        .iter()
        .enumerate()
        .map(|(i, c)| Line::from(format!("{i}:{}", filter_label(*c))))
        .collect();

    let selected = CATEGORY_FILTERS
        .iter()
        .position(|c| *c == app.view.category_filter())
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.style("tab_normal"))
        .highlight_style(app.style("tab_selected"));
    f.render_widget(tabs, area);
}
