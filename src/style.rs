//! Caption styling state
//!
//! `StyleState` is a value type replaced wholesale on every edit; all writes
//! go through the `StyleEdit` reducer so no callback can observe a sibling
//! field mid-update.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// Default footer fill: translucent white, rgba(255, 255, 255, 0.3).
pub const DEFAULT_FOOTER_COLOR: Rgba = Rgba::new(255, 255, 255, 77);

/// Default caption text color: opaque black.
pub const DEFAULT_TEXT_COLOR: Rgba = Rgba::opaque(0, 0, 0);

/// Default caption font size in layout pixels.
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Font sizes offered by the size picker.
pub const FONT_SIZE_PRESETS: [f32; 4] = [18.0, 22.0, 32.0, 38.0];

/// Enumerated caption font families.
///
/// Each variant maps to a widely installed free font; resolution to an actual
/// font file happens in the `fonts` module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    DejaVuSans,
    DejaVuSerif,
    DejaVuSansMono,
    LiberationSans,
    LiberationSerif,
    LiberationMono,
    NotoSans,
    NotoSerif,
    FreeSans,
}

impl FontFamily {
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::DejaVuSans => "DejaVu Sans",
            FontFamily::DejaVuSerif => "DejaVu Serif",
            FontFamily::DejaVuSansMono => "DejaVu Sans Mono",
            FontFamily::LiberationSans => "Liberation Sans",
            FontFamily::LiberationSerif => "Liberation Serif",
            FontFamily::LiberationMono => "Liberation Mono",
            FontFamily::NotoSans => "Noto Sans",
            FontFamily::NotoSerif => "Noto Serif",
            FontFamily::FreeSans => "FreeSans",
        }
    }

    pub fn all() -> &'static [FontFamily] {
        &ALL_FAMILIES[..]
    }

    pub fn next(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|f| f == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|f| f == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

// Module-level static array used by `FontFamily::all()` to ensure a &'static slice
static ALL_FAMILIES: [FontFamily; 9] = [
    FontFamily::DejaVuSans,
    FontFamily::DejaVuSerif,
    FontFamily::DejaVuSansMono,
    FontFamily::LiberationSans,
    FontFamily::LiberationSerif,
    FontFamily::LiberationMono,
    FontFamily::NotoSans,
    FontFamily::NotoSerif,
    FontFamily::FreeSans,
];

/// Full set of caption styling parameters plus the caption text itself.
///
/// Every field has a default, so downstream derivation never needs a
/// null-check beyond the photo's presence.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleState {
    pub caption: String,
    pub footer_color: Rgba,
    pub text_color: Rgba,
    pub bold: bool,
    pub italic: bool,
    pub font_size_px: f32,
    pub font: FontFamily,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            caption: String::new(),
            footer_color: DEFAULT_FOOTER_COLOR,
            text_color: DEFAULT_TEXT_COLOR,
            bold: false,
            italic: false,
            font_size_px: DEFAULT_FONT_SIZE,
            font: FontFamily::default(),
        }
    }
}

/// A single tagged style edit. One variant touches exactly one field.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleEdit {
    SetCaption(String),
    SetFooterColor(Rgba),
    SetTextColor(Rgba),
    ToggleBold,
    ToggleItalic,
    SetFontSize(f32),
    SetFont(FontFamily),
}

impl StyleState {
    /// Apply one edit, producing a brand-new state. The untouched fields are
    /// carried over verbatim; no edit reads another field's value.
    pub fn apply(&self, edit: StyleEdit) -> StyleState {
        let mut next = self.clone();
        match edit {
            StyleEdit::SetCaption(text) => next.caption = text,
            StyleEdit::SetFooterColor(color) => next.footer_color = color,
            StyleEdit::SetTextColor(color) => next.text_color = color,
            StyleEdit::ToggleBold => next.bold = !self.bold,
            StyleEdit::ToggleItalic => next.italic = !self.italic,
            StyleEdit::SetFontSize(px) => next.font_size_px = px.max(1.0),
            StyleEdit::SetFont(family) => next.font = family,
        }
        next
    }

    /// Next size preset after the current size, wrapping around.
    pub fn next_font_size(&self) -> f32 {
        let idx = FONT_SIZE_PRESETS
            .iter()
            .position(|&s| s > self.font_size_px);
        match idx {
            Some(i) => FONT_SIZE_PRESETS[i],
            None => FONT_SIZE_PRESETS[0],
        }
    }

    /// Largest preset strictly below the current size, wrapping around.
    pub fn prev_font_size(&self) -> f32 {
        let idx = FONT_SIZE_PRESETS
            .iter()
            .rposition(|&s| s < self.font_size_px);
        match idx {
            Some(i) => FONT_SIZE_PRESETS[i],
            None => FONT_SIZE_PRESETS[FONT_SIZE_PRESETS.len() - 1],
        }
    }
}
