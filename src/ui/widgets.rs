//! Style panel rows and the modal prompt

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::state::{AppState, STYLE_SETTINGS};

/// Render the caption style settings
pub fn render_style_settings(frame: &mut Frame, area: Rect, state: &AppState, is_focused: bool) {
    let mut lines = Vec::new();

    for (idx, label) in STYLE_SETTINGS.iter().enumerate() {
        let is_selected = idx == state.selected_setting && is_focused;

        // The caption row shows a cursor while editing
        if idx == 0 && state.editing_caption {
            lines.push(caption_editing_line(state, is_selected));
            continue;
        }

        let hint = match idx {
            0 => Some("[Enter]"),
            1 | 2 => Some("[Enter]"),
            3 | 4 => Some("[Space]"),
            5 | 6 => Some("[←/→]"),
            _ => None,
        };

        lines.push(create_setting_line(
            label,
            &state.setting_value(idx),
            is_selected,
            hint,
        ));
    }

    // Action buttons
    lines.push(Line::from(""));
    lines.push(create_action_line("[L]", "Load Photo"));
    lines.push(create_action_line("[E]", "Export PNG"));
    lines.push(create_action_line("[C]", "Copy Caption"));

    if is_focused {
        lines.push(Line::from(Span::styled(
            "Tip: Tab switches focus between Style and Preview",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let widget = Paragraph::new(lines);
    frame.render_widget(widget, area);
}

/// Caption row while text entry is active
fn caption_editing_line(state: &AppState, is_selected: bool) -> Line<'static> {
    let display = format!("{}▌", state.style.caption);

    Line::from(vec![
        Span::styled(
            if is_selected { "▸ " } else { "  " },
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            "Caption: ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(display, Style::default().fg(Color::Green)),
    ])
}

/// Render the modal prompt for load paths and color entry
pub fn render_prompt(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(ref prompt) = state.prompt else {
        return;
    };

    let width = (area.width as f32 * 0.6).clamp(30.0, 60.0) as u16;
    let height = 5;
    let overlay = centered_rect(width, height, area);

    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", prompt.kind.title()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let mut lines = vec![Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{}▌", prompt.input),
            Style::default().fg(Color::Green),
        ),
    ])];

    if let Some(ref err) = prompt.error {
        lines.push(Line::from(Span::styled(
            format!(" {}", err),
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            " Enter to confirm, Esc to cancel",
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Create a setting line with label, value, and optional hint
fn create_setting_line(
    label: &str,
    value: &str,
    is_selected: bool,
    hint: Option<&str>,
) -> Line<'static> {
    let indicator = if is_selected { "▸" } else { " " };
    let indicator_style = Style::default().fg(Color::Cyan);

    let label_style = if is_selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let value_style = if is_selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut spans = vec![
        Span::styled(format!("{} ", indicator), indicator_style),
        Span::styled(format!("{}: ", label), label_style),
        Span::styled(value.to_string(), value_style),
    ];

    if let Some(hint_text) = hint {
        spans.push(Span::styled(
            format!(" {}", hint_text),
            Style::default().fg(Color::DarkGray),
        ));
    }

    Line::from(spans)
}

/// Create an action line (button-like)
fn create_action_line(key: &str, label: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled("  ", Style::default()),
        Span::styled(key.to_string(), Style::default().fg(Color::Green)),
        Span::styled(format!(" {}", label), Style::default().fg(Color::White)),
    ])
}

/// Create a centered rectangle
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal_padding = area.width.saturating_sub(width) / 2;
    let vertical_padding = area.height.saturating_sub(height) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(vertical_padding),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(horizontal_padding),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1])[1]
}
