//! Collection list rendering
//!
//! Renders the items of the current collection as a selectable list, or a
//! single status row while loading, on failure, or when nothing matches.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::text::sanitize;
use crate::listing::{ListStatus, ListView, NO_ITEMS};

/// Renders the list screen into `area`
pub fn render(frame: &mut Frame, area: Rect, view: &ListView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", view.endpoint().title()),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));

    match view.status() {
        ListStatus::Loading => {
            let text = Paragraph::new(format!("Loading {}...", view.endpoint()))
                .style(Style::default().fg(Color::Cyan))
                .block(block);
            frame.render_widget(text, area);
        }
        ListStatus::Failed(message) => {
            let text = Paragraph::new(format!("Error loading data: {}", sanitize(message)))
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(text, area);
        }
        ListStatus::Ready if view.visible_len() == 0 => {
            let text = Paragraph::new(NO_ITEMS)
                .style(Style::default().fg(Color::Gray))
                .block(block);
            frame.render_widget(text, area);
        }
        ListStatus::Ready => {
            let items: Vec<ListItem> = view
                .rows()
                .into_iter()
                .map(|row| {
                    let mut lines = vec![Line::from(Span::styled(
                        sanitize(&row.summary).into_owned(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ))];
                    if let Some(subtitle) = row.subtitle {
                        lines.push(Line::from(Span::styled(
                            format!("  {}", sanitize(&subtitle)),
                            Style::default().fg(Color::DarkGray),
                        )));
                    }
                    ListItem::new(lines)
                })
                .collect();

            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().fg(Color::Yellow))
                .highlight_symbol("\u{25B8} "); // ▸

            let mut state = ListState::default().with_selected(Some(view.selected_index()));
            frame.render_stateful_widget(list, area, &mut state);
        }
    }
}
