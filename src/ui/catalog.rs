//! Terminal implementation of [`DisplaySurface`].
//!
//! Draws the header counts and the card list area of one frame. An error
//! banner claims the top of the list area and any retained list is drawn
//! below it.

use crate::app::App;
use crate::render::{Card, DisplaySurface, EmptyReason, IconRef};
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

const SPINNER: [&str; crate::app::SPINNER_FRAMES] =
    ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Height of the error banner, borders included.
const ERROR_BANNER_HEIGHT: u16 = 4;

pub(super) struct TerminalSurface<'a, 'f> {
    frame: &'a mut Frame<'f>,
    app: &'a App,
    header: Rect,
    body: Rect,
}

impl<'a, 'f> TerminalSurface<'a, 'f> {
    pub(super) fn new(frame: &'a mut Frame<'f>, app: &'a App, header: Rect, body: Rect) -> Self {
        Self {
            frame,
            app,
            header,
            body,
        }
    }

    fn list_block(&self, title: String) -> Block<'static> {
        let border = if self.app.search_mode {
            self.app.style("panel_border")
        } else {
            self.app.style("panel_border_focused")
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title)
    }

    fn render_message(&mut self, text: String, role: &str) {
        let paragraph = Paragraph::new(text)
            .style(self.app.style(role))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(self.list_block(" Apps ".to_string()));
        self.frame.render_widget(paragraph, self.body);
    }

    fn card_item(&self, card: &Card, width: usize) -> ListItem<'static> {
        let (marker, marker_style) = match card.icon {
            IconRef::Remote(_) => ("▣ ", self.app.style("card_category")),
            IconRef::Placeholder => ("□ ", self.app.style("card_placeholder_icon")),
        };

        let label = format!("  [{}]", card.category_label);
        let name_width = width.saturating_sub(2 + label.chars().count());
        let name = truncate_to_width(&card.name, name_width).into_owned();

        let first = Line::from(vec![
            Span::styled(marker, marker_style),
            Span::styled(name, self.app.style("card_name")),
            Span::styled(label, self.app.style("card_category")),
        ]);

        let mut detail = vec![Span::styled(
            truncate_to_width(&card.company, width.saturating_sub(16)).into_owned(),
            self.app.style("card_company"),
        )];
        if let Some(date) = &card.updated {
            detail.push(Span::styled(
                format!("  Updated {date}"),
                self.app.style("card_date"),
            ));
        }
        let mut second = vec![Span::raw("  ")];
        second.extend(detail);

        ListItem::new(vec![first, Line::from(second)])
    }
}

impl DisplaySurface for TerminalSurface<'_, '_> {
    fn show_loading(&mut self) {
        let frame = SPINNER[self.app.spinner_frame % SPINNER.len()];
        self.render_message(format!("{frame} Loading apps..."), "loading");
    }

    fn show_error(&mut self, message: &str) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(ERROR_BANNER_HEIGHT), Constraint::Min(0)])
            .split(self.body);

        let banner = Paragraph::new(message.to_string())
            .style(self.app.style("error_banner"))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Error "));
        self.frame.render_widget(banner, chunks[0]);
        self.body = chunks[1];
    }

    fn show_empty(&mut self, reason: EmptyReason) {
        if self.body.height == 0 {
            return;
        }
        self.render_message(reason.message().to_string(), "empty");
    }

    fn show_list(&mut self, cards: &[Card]) {
        if self.body.height < 3 {
            return;
        }
        let width = self.body.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = cards.iter().map(|c| self.card_item(c, width)).collect();

        let title = format!(" Apps ({}) ", cards.len());
        let list = List::new(items)
            .block(self.list_block(title))
            .highlight_style(self.app.style("card_selected"));

        let mut state = ListState::default().with_selected(Some(self.app.selected));
        self.frame.render_stateful_widget(list, self.body, &mut state);
    }

    fn update_counts(&mut self, total: usize, filtered: Option<usize>) {
        let counts = match filtered {
            Some(shown) => format!("{shown} of {total} apps"),
            None => format!("{total} apps"),
        };
        let header = Line::from(vec![
            Span::styled(" AppShelf ", self.app.style("header_title")),
            Span::styled(counts, self.app.style("header_counts")),
        ]);
        self.frame.render_widget(Paragraph::new(header), self.header);
    }
}
