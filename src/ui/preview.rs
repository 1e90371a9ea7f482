//! Poster canvas rendering

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use crate::state::{AppState, FocusedWidget};

/// Render the poster canvas
pub fn render_canvas(frame: &mut Frame, area: Rect, state: &AppState) {
    let is_focused = state.focus == FocusedWidget::Preview;

    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let title = match state.photo.as_ref().map(|p| p.dimensions()) {
        Some((w, h)) => format!(" Poster {}x{} ", w, h),
        None => " Poster ".to_string(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(ref content) = state.preview_content {
        render_poster_content(frame, inner, content, state.preview_scroll);
    } else {
        render_placeholder(frame, inner, state);
    }
}

/// Render the half-block poster with scrolling
fn render_poster_content(frame: &mut Frame, area: Rect, content: &str, scroll: usize) {
    let lines: Vec<Line> = content
        .lines()
        .skip(scroll)
        .take(area.height as usize)
        .map(|line| {
            // Re-interpret the worker's ANSI output as styled spans
            let spans: Vec<Span> = crate::input::parse_ansi_to_spans(line)
                .into_iter()
                .map(|(text, fg, bg)| {
                    let mut style = Style::default();
                    if let Some(fg) = fg {
                        style = style.fg(fg);
                    }
                    if let Some(bg) = bg {
                        style = style.bg(bg);
                    }
                    Span::styled(text, style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let total_lines = content.lines().count();
    let visible_lines = area.height as usize;

    let widget = Paragraph::new(lines);
    frame.render_widget(widget, area);

    // Render scrollbar if content is scrollable
    if total_lines > visible_lines {
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));

        let mut scrollbar_state = ScrollbarState::default()
            .content_length(total_lines)
            .position(scroll)
            .viewport_content_length(visible_lines);

        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y,
            width: 1,
            height: area.height,
        };

        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}

/// Render the upload placeholder when no photo is loaded
fn render_placeholder(frame: &mut Frame, area: Rect, state: &AppState) {
    let message = if state.is_decoding {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "Decoding photo...",
                Style::default().fg(Color::Yellow),
            )),
        ]
    } else if state.is_rendering {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "Rendering...",
                Style::default().fg(Color::Yellow),
            )),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "Add your favourite picture here",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press [L] to load a photo",
                Style::default().fg(Color::Green),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Supported formats: PNG, JPEG, GIF, WebP",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    };

    let widget = Paragraph::new(message)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(ratatui::layout::Alignment::Center);

    frame.render_widget(widget, area);
}
