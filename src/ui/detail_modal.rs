//! Detail modal rendering
//!
//! Draws the detail view for one item as a centered overlay on top of the list.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;
use super::text::sanitize;
use crate::app::DetailState;
use crate::detail::DetailView;

/// The modal takes 80% of the screen in each direction
fn modal_area(area: Rect) -> Rect {
    centered_rect(
        area.width.saturating_mul(4) / 5,
        area.height.saturating_mul(4) / 5,
        area,
    )
}

fn frame_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            format!(" {} ", sanitize(title)),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(" Esc close  j/k scroll ").alignment(Alignment::Right))
}

/// Largest useful scroll offset for `view` on a screen of size `area`
///
/// Long values wrap over several rows, so this counts wrapped rows rather
/// than fields. Scrolling stops once the last row sits at the bottom of the
/// modal.
pub fn max_scroll(view: &DetailView, area: Rect) -> u16 {
    let inner = frame_block(&view.title).inner(modal_area(area));
    let rows = Paragraph::new(detail_lines(view))
        .wrap(Wrap { trim: false })
        .line_count(inner.width);
    let hidden = rows.saturating_sub(usize::from(inner.height));
    u16::try_from(hidden).unwrap_or(u16::MAX)
}

/// Renders the modal for `state`; nothing is drawn when it is closed
pub fn render(frame: &mut Frame, state: &DetailState) {
    let area = frame.area();
    let modal_area = modal_area(area);

    let (title, lines, scroll) = match state {
        DetailState::Closed => return,
        DetailState::Loading { title } => (
            title.as_str(),
            vec![Line::from(Span::styled(
                "Loading details...",
                Style::default().fg(Color::Cyan),
            ))],
            0,
        ),
        DetailState::Open { view, scroll } => (
            view.title.as_str(),
            detail_lines(view),
            (*scroll).min(max_scroll(view, area)),
        ),
    };

    frame.render_widget(Clear, modal_area);

    let paragraph = Paragraph::new(lines)
        .block(frame_block(title))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(paragraph, modal_area);
}

/// Body lines: artwork link first, then one line per field
fn detail_lines(view: &DetailView) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(view.fields.len() + 2);

    if let Some(illustration) = view.illustration {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}: ", illustration.caption()),
                Style::default().fg(Color::Magenta),
            ),
            Span::styled(
                illustration.url(),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        lines.push(Line::from(""));
    }

    for field in &view.fields {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}: ", sanitize(&field.label)),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(sanitize(&field.value).into_owned()),
        ]));
    }

    lines
}
