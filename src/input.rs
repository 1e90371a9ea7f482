//! Input handling
//!
//! Maps keyboard events to state transitions with context-sensitive bindings.

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use crate::state::{AppState, FocusedWidget, PromptKind};
use crate::style::StyleEdit;
use crate::textutil::pop_grapheme;

/// Handle an input event
pub fn handle_event(event: Event, state: &mut AppState) -> Result<()> {
    match event {
        Event::Key(key_event) => handle_key_event(key_event, state),
        Event::Resize(_, _) => Ok(()), // Already handled in main loop
        Event::Mouse(_) => Ok(()),
        _ => Ok(()),
    }
}

/// Handle a key event
fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Result<()> {
    // Handle help overlay
    if state.show_help {
        return handle_help_input(key, state);
    }

    // Handle modal prompt (load path / color entry)
    if state.prompt.is_some() {
        return handle_prompt_input(key, state);
    }

    // Handle live caption editing
    if state.editing_caption {
        return handle_caption_input(key, state);
    }

    // Global shortcuts
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.should_quit = true;
            return Ok(());
        }
        KeyCode::Char('?') => {
            state.show_help = true;
            return Ok(());
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                state.focus = state.focus.prev();
            } else {
                state.focus = state.focus.next();
            }
            return Ok(());
        }
        KeyCode::Char('l') | KeyCode::Char('L') => {
            state.start_prompt(PromptKind::LoadPath);
            return Ok(());
        }
        KeyCode::Char('e') | KeyCode::Char('E') => {
            state.request_export();
            return Ok(());
        }
        KeyCode::Char('b') | KeyCode::Char('B') => {
            state.apply_style_edit(StyleEdit::ToggleBold);
            return Ok(());
        }
        KeyCode::Char('i') | KeyCode::Char('I') => {
            state.apply_style_edit(StyleEdit::ToggleItalic);
            return Ok(());
        }
        KeyCode::Char('f') => {
            let next = state.style.font.next();
            state.apply_style_edit(StyleEdit::SetFont(next));
            return Ok(());
        }
        KeyCode::Char('F') => {
            let prev = state.style.font.prev();
            state.apply_style_edit(StyleEdit::SetFont(prev));
            return Ok(());
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let size = state.style.next_font_size();
            state.apply_style_edit(StyleEdit::SetFontSize(size));
            return Ok(());
        }
        KeyCode::Char('-') | KeyCode::Char('_') => {
            let size = state.style.prev_font_size();
            state.apply_style_edit(StyleEdit::SetFontSize(size));
            return Ok(());
        }
        KeyCode::Char('c') | KeyCode::Char('C') => {
            copy_to_clipboard(state)?;
            return Ok(());
        }
        _ => {}
    }

    // Context-sensitive handling
    match state.focus {
        FocusedWidget::StylePanel => handle_style_panel_input(key, state),
        FocusedWidget::Preview => handle_preview_input(key, state),
    }
}

/// Handle input when help overlay is shown
fn handle_help_input(key: KeyEvent, state: &mut AppState) -> Result<()> {
    match key.code {
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Enter => {
            state.show_help = false;
        }
        _ => {}
    }
    Ok(())
}

/// Caption edits re-render the preview on every keystroke.
fn handle_caption_input(key: KeyEvent, state: &mut AppState) -> Result<()> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            state.editing_caption = false;
            state.set_status("Caption set", false);
        }
        KeyCode::Backspace => {
            let mut caption = state.style.caption.clone();
            pop_grapheme(&mut caption);
            state.apply_style_edit(StyleEdit::SetCaption(caption));
        }
        KeyCode::Char(c) => {
            let mut caption = state.style.caption.clone();
            caption.push(c);
            state.apply_style_edit(StyleEdit::SetCaption(caption));
        }
        _ => {}
    }
    Ok(())
}

/// Handle input for the modal prompt
fn handle_prompt_input(key: KeyEvent, state: &mut AppState) -> Result<()> {
    match key.code {
        KeyCode::Esc => {
            state.cancel_prompt();
        }
        KeyCode::Enter => {
            state.submit_prompt();
        }
        KeyCode::Backspace => {
            if let Some(prompt) = state.prompt.as_mut() {
                prompt.input.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(prompt) = state.prompt.as_mut() {
                prompt.input.push(c);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Handle input for the style panel
fn handle_style_panel_input(key: KeyEvent, state: &mut AppState) -> Result<()> {
    match key.code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') => state.prev_setting(),
        KeyCode::Down | KeyCode::Char('j') => state.next_setting(),

        // Activate the selected row
        KeyCode::Enter | KeyCode::Char(' ') => activate_setting(state),

        // Cycle values in place
        KeyCode::Left | KeyCode::Char('h') => cycle_setting(state, false),
        KeyCode::Right => cycle_setting(state, true),

        _ => {}
    }
    Ok(())
}

/// Handle input for preview widget
fn handle_preview_input(key: KeyEvent, state: &mut AppState) -> Result<()> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => state.scroll_up(1),
        KeyCode::Down | KeyCode::Char('j') => state.scroll_down(1),
        KeyCode::PageUp => state.scroll_up(10),
        KeyCode::PageDown => state.scroll_down(10),
        KeyCode::Home => state.preview_scroll = 0,
        KeyCode::End => {
            if let Some(ref content) = state.preview_content {
                let line_count = content.lines().count();
                state.preview_scroll = line_count.saturating_sub(1);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Enter/space on a style panel row
fn activate_setting(state: &mut AppState) {
    match state.selected_setting {
        0 => {
            state.editing_caption = true;
            state.set_status("Editing caption: type and press Enter (Esc to stop)", false);
        }
        1 => state.start_prompt(PromptKind::FooterColor),
        2 => state.start_prompt(PromptKind::TextColor),
        3 => state.apply_style_edit(StyleEdit::ToggleBold),
        4 => state.apply_style_edit(StyleEdit::ToggleItalic),
        5 => {
            let size = state.style.next_font_size();
            state.apply_style_edit(StyleEdit::SetFontSize(size));
        }
        6 => {
            let next = state.style.font.next();
            state.apply_style_edit(StyleEdit::SetFont(next));
        }
        _ => {}
    }
}

/// Left/right on a style panel row
fn cycle_setting(state: &mut AppState, forward: bool) {
    match state.selected_setting {
        3 => state.apply_style_edit(StyleEdit::ToggleBold),
        4 => state.apply_style_edit(StyleEdit::ToggleItalic),
        5 => {
            let size = if forward {
                state.style.next_font_size()
            } else {
                state.style.prev_font_size()
            };
            state.apply_style_edit(StyleEdit::SetFontSize(size));
        }
        6 => {
            let family = if forward {
                state.style.font.next()
            } else {
                state.style.font.prev()
            };
            state.apply_style_edit(StyleEdit::SetFont(family));
        }
        _ => {}
    }
}

/// Copy the caption text to the clipboard
fn copy_to_clipboard(state: &mut AppState) -> Result<()> {
    if state.style.caption.is_empty() {
        state.set_status("Nothing to copy - caption is empty", false);
        return Ok(());
    }

    match arboard::Clipboard::new() {
        Ok(mut clipboard) => match clipboard.set_text(&state.style.caption) {
            Ok(_) => {
                state.set_status("Caption copied to clipboard", false);
            }
            Err(e) => {
                state.set_status(&format!("Copy failed: {}", e), true);
            }
        },
        Err(e) => {
            state.set_status(&format!("Clipboard unavailable: {}", e), true);
        }
    }
    Ok(())
}

/// Parse ANSI color codes into Ratatui Span components
/// Returns a Vec of (text, Option<fg_color>, Option<bg_color>)
pub(crate) fn parse_ansi_to_spans(
    text: &str,
) -> Vec<(
    String,
    Option<ratatui::style::Color>,
    Option<ratatui::style::Color>,
)> {
    let mut result = Vec::new();
    let mut current_text = String::new();
    let mut current_fg: Option<ratatui::style::Color> = None;
    let mut current_bg: Option<ratatui::style::Color> = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Push any accumulated text
            if !current_text.is_empty() {
                result.push((std::mem::take(&mut current_text), current_fg, current_bg));
            }

            // Parse escape sequence
            if chars.peek() == Some(&'[') {
                chars.next(); // consume '['
                let mut params = String::new();

                // Collect parameter bytes
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphabetic() {
                        chars.next();
                        if next == 'm' {
                            // SGR sequence - parse color codes
                            parse_sgr_params(&params, &mut current_fg, &mut current_bg);
                        }
                        break;
                    }
                    params.push(chars.next().unwrap());
                }
            } else {
                // Skip other escape sequences
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next == '\x07' || next.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
        } else {
            current_text.push(c);
        }
    }

    // Push remaining text
    if !current_text.is_empty() {
        result.push((current_text, current_fg, current_bg));
    }

    result
}

/// Parse SGR (Select Graphic Rendition) parameters
fn parse_sgr_params(
    params: &str,
    fg: &mut Option<ratatui::style::Color>,
    bg: &mut Option<ratatui::style::Color>,
) {
    let parts: Vec<&str> = params.split(';').collect();
    let mut i = 0;

    while i < parts.len() {
        match parts[i] {
            "0" => {
                // Reset
                *fg = None;
                *bg = None;
            }
            "38" => {
                // Foreground color
                if i + 1 < parts.len() {
                    if parts[i + 1] == "2" && i + 4 < parts.len() {
                        // True color: 38;2;R;G;B
                        if let (Ok(r), Ok(g), Ok(b)) = (
                            parts[i + 2].parse::<u8>(),
                            parts[i + 3].parse::<u8>(),
                            parts[i + 4].parse::<u8>(),
                        ) {
                            *fg = Some(ratatui::style::Color::Rgb(r, g, b));
                        }
                        i += 4;
                    } else if parts[i + 1] == "5" && i + 2 < parts.len() {
                        // 256 color: 38;5;N
                        if let Ok(n) = parts[i + 2].parse::<u8>() {
                            *fg = Some(ratatui::style::Color::Indexed(n));
                        }
                        i += 2;
                    }
                }
            }
            "48" => {
                // Background color
                if i + 1 < parts.len() {
                    if parts[i + 1] == "2" && i + 4 < parts.len() {
                        // True color: 48;2;R;G;B
                        if let (Ok(r), Ok(g), Ok(b)) = (
                            parts[i + 2].parse::<u8>(),
                            parts[i + 3].parse::<u8>(),
                            parts[i + 4].parse::<u8>(),
                        ) {
                            *bg = Some(ratatui::style::Color::Rgb(r, g, b));
                        }
                        i += 4;
                    } else if parts[i + 1] == "5" && i + 2 < parts.len() {
                        // 256 color: 48;5;N
                        if let Ok(n) = parts[i + 2].parse::<u8>() {
                            *bg = Some(ratatui::style::Color::Indexed(n));
                        }
                        i += 2;
                    }
                }
            }
            // Basic foreground colors (30-37)
            "30" => *fg = Some(ratatui::style::Color::Black),
            "31" => *fg = Some(ratatui::style::Color::Red),
            "32" => *fg = Some(ratatui::style::Color::Green),
            "33" => *fg = Some(ratatui::style::Color::Yellow),
            "34" => *fg = Some(ratatui::style::Color::Blue),
            "35" => *fg = Some(ratatui::style::Color::Magenta),
            "36" => *fg = Some(ratatui::style::Color::Cyan),
            "37" => *fg = Some(ratatui::style::Color::White),
            // Basic background colors (40-47)
            "40" => *bg = Some(ratatui::style::Color::Black),
            "41" => *bg = Some(ratatui::style::Color::Red),
            "42" => *bg = Some(ratatui::style::Color::Green),
            "43" => *bg = Some(ratatui::style::Color::Yellow),
            "44" => *bg = Some(ratatui::style::Color::Blue),
            "45" => *bg = Some(ratatui::style::Color::Magenta),
            "46" => *bg = Some(ratatui::style::Color::Cyan),
            "47" => *bg = Some(ratatui::style::Color::White),
            _ => {}
        }
        i += 1;
    }
}

/// Strip ANSI escape codes from text
pub(crate) fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip CSI-like escape sequences (ESC [ ... letter)
            if chars.peek() == Some(&'[') {
                chars.next(); // consume '['
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                // OSC and friends, skip until BEL or an alphabetic terminator
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next == '\x07' || next.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::terminal_capabilities::TerminalCapabilities;
    use crossbeam_channel::unbounded;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    fn test_state() -> AppState {
        let (tx, _rx) = unbounded();
        AppState::new(Config::default(), TerminalCapabilities::default(), tx)
    }

    #[test]
    fn test_strip_ansi_codes() {
        let input = "\x1b[38;2;255;0;0mRed\x1b[0m";
        let output = strip_ansi_codes(input);
        assert_eq!(output, "Red");
    }

    #[test]
    fn test_strip_ansi_preserves_text() {
        let input = "Hello, World!";
        let output = strip_ansi_codes(input);
        assert_eq!(output, "Hello, World!");
    }

    #[test]
    fn test_caption_editing_grapheme_backspace() {
        let mut state = test_state();
        state.editing_caption = true;
        state.style.caption = "caf\u{00e9}\u{200d}x".to_string();

        handle_key_event(key(KeyCode::Backspace), &mut state).unwrap();
        // One grapheme removed per backspace, never a partial scalar
        assert!(state.style.caption.is_char_boundary(state.style.caption.len()));
    }

    #[test]
    fn test_bold_shortcut_outside_editing() {
        let mut state = test_state();
        handle_key_event(key(KeyCode::Char('b')), &mut state).unwrap();
        assert!(state.style.bold);
    }

    #[test]
    fn test_typing_b_while_editing_caption_inserts_char() {
        let mut state = test_state();
        state.editing_caption = true;
        handle_key_event(key(KeyCode::Char('b')), &mut state).unwrap();
        assert!(!state.style.bold);
        assert_eq!(state.style.caption, "b");
    }

    #[test]
    fn test_quit_key() {
        let mut state = test_state();
        handle_key_event(key(KeyCode::Char('q')), &mut state).unwrap();
        assert!(state.should_quit);
    }

    #[test]
    fn test_help_toggle() {
        let mut state = test_state();
        handle_key_event(key(KeyCode::Char('?')), &mut state).unwrap();
        assert!(state.show_help);
        handle_key_event(key(KeyCode::Esc), &mut state).unwrap();
        assert!(!state.show_help);
    }
}
