//! UI rendering module for Holocron
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod detail_modal;
pub mod help_overlay;
pub mod item_list;
pub mod text;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, DetailState};
use crate::swapi::Endpoint;

/// Renders the whole screen for the current application state
pub fn draw(frame: &mut Frame, app: &App) {
    let show_search = app.search.is_active() || !app.search.query().is_empty();

    let mut constraints = vec![Constraint::Length(1)];
    if show_search {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(3));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    render_tabs(frame, chunks[0], app.list.endpoint());
    let mut next = 1;
    if show_search {
        render_search_bar(frame, chunks[next], app);
        next += 1;
    }
    item_list::render(frame, chunks[next], &app.list);
    render_footer(frame, chunks[next + 1], app);

    if app.detail != DetailState::Closed {
        detail_modal::render(frame, &app.detail);
    }
    if app.show_help {
        help_overlay::render(frame);
    }
}

/// Collection tabs with the current one highlighted
fn render_tabs(frame: &mut Frame, area: Rect, current: Endpoint) {
    let mut spans = Vec::new();
    for (i, endpoint) in Endpoint::ALL.iter().enumerate() {
        let style = if *endpoint == current {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(
            format!(" {} {} ", i + 1, endpoint.title()),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_search_bar(frame: &mut Frame, area: Rect, app: &App) {
    let border_color = if app.search.is_active() {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let cursor = if app.search.is_active() { "_" } else { "" };

    let block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let line = Line::from(vec![
        Span::styled("/", Style::default().fg(Color::Yellow)),
        Span::raw(text::sanitize(app.search.query()).into_owned()),
        Span::styled(cursor, Style::default().fg(Color::Yellow)),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let counts = format!(
        " {}/{} ",
        app.list.visible_len(),
        app.list.total()
    );
    let line = Line::from(vec![
        Span::styled(counts, Style::default().fg(Color::Cyan)),
        Span::styled(
            "↑↓ move  Enter details  / search  Tab switch  r reload  ? help  q quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Helper function to create a centered rect of at most `width` x `height`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::StartupConfig;
    use crate::swapi::testing::FakeFetch;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_centered_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered_rect(100, 100, area);
        assert_eq!(rect.width, 40);
        assert_eq!(rect.height, 10);

        let small = centered_rect(20, 4, area);
        assert_eq!((small.x, small.y, small.width, small.height), (10, 3, 20, 4));
    }

    #[tokio::test]
    async fn test_draw_shows_tabs_and_loading_state() {
        let app = App::with_fetch(
            &StartupConfig::default(),
            Arc::new(FakeFetch::new()),
            None,
        );
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();

        terminal.draw(|frame| draw(frame, &app)).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("People"));
        assert!(content.contains("Vehicles"));
        assert!(content.contains("Loading people..."));
        assert!(!content.contains("Search"), "Search bar hidden when unused");
    }

    #[tokio::test]
    async fn test_draw_shows_search_bar_with_query() {
        let config = StartupConfig {
            query: "luke".to_string(),
            ..StartupConfig::default()
        };
        let app = App::with_fetch(&config, Arc::new(FakeFetch::new()), None);
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();

        terminal.draw(|frame| draw(frame, &app)).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("Search"));
        assert!(content.contains("/luke"));
    }
}
