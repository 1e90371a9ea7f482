//! Terminal capability detection
//!
//! Detects the color depth and size of the hosting terminal so the live
//! preview degrades gracefully on less capable emulators.

use crossterm::terminal;
use serde::{Deserialize, Serialize};
use std::env;

/// Level of color support in the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorSupport {
    /// No color support
    NoColor,
    /// 16 basic colors
    Color16,
    /// 256 color palette
    Color256,
    /// Full 24-bit RGB (TrueColor)
    #[default]
    TrueColor,
}

impl ColorSupport {
    pub fn name(&self) -> &'static str {
        match self {
            ColorSupport::NoColor => "None",
            ColorSupport::Color16 => "16 Colors",
            ColorSupport::Color256 => "256 Colors",
            ColorSupport::TrueColor => "True Color",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ColorSupport::NoColor => ColorSupport::Color16,
            ColorSupport::Color16 => ColorSupport::Color256,
            ColorSupport::Color256 => ColorSupport::TrueColor,
            ColorSupport::TrueColor => ColorSupport::NoColor,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ColorSupport::NoColor => ColorSupport::TrueColor,
            ColorSupport::Color16 => ColorSupport::NoColor,
            ColorSupport::Color256 => ColorSupport::Color16,
            ColorSupport::TrueColor => ColorSupport::Color256,
        }
    }
}

/// Terminal capabilities relevant to the preview canvas
#[derive(Debug, Clone)]
pub struct TerminalCapabilities {
    pub color_support: ColorSupport,
    pub size: (u16, u16),
}

impl Default for TerminalCapabilities {
    fn default() -> Self {
        Self {
            color_support: ColorSupport::TrueColor,
            size: (80, 24),
        }
    }
}

/// Detect terminal capabilities
pub fn detect_capabilities() -> TerminalCapabilities {
    TerminalCapabilities {
        color_support: detect_color_support(),
        size: terminal::size().unwrap_or((80, 24)),
    }
}

/// Detect the level of color support
fn detect_color_support() -> ColorSupport {
    // NO_COLOR is the standard opt-out and wins over everything else
    if env::var("NO_COLOR").is_ok() {
        return ColorSupport::NoColor;
    }

    if let Ok(colorterm) = env::var("COLORTERM") {
        let colorterm = colorterm.to_lowercase();
        if colorterm.contains("truecolor") || colorterm.contains("24bit") {
            return ColorSupport::TrueColor;
        }
    }

    if let Ok(term) = env::var("TERM") {
        let term = term.to_lowercase();

        if term.contains("kitty")
            || term.contains("alacritty")
            || term.contains("iterm")
            || term.contains("vte")
            || term.contains("256color")
        {
            // Many 256color terminals also support TrueColor
            if env::var("COLORTERM").is_ok() {
                return ColorSupport::TrueColor;
            }
            return ColorSupport::Color256;
        }

        if term.contains("xterm") {
            if term.contains("256") {
                return ColorSupport::Color256;
            }
            return ColorSupport::Color16;
        }

        if term.contains("screen") || term.contains("tmux") {
            return ColorSupport::Color256;
        }

        if term.contains("linux") || term.contains("console") {
            return ColorSupport::Color16;
        }
    }

    // Windows Terminal
    if env::var("WT_SESSION").is_ok() {
        return ColorSupport::TrueColor;
    }

    // Most modern terminals handle at least 256 colors
    ColorSupport::Color256
}
