//! Unicode text utilities
//!
//! Display-width and grapheme helpers used by the control panel and the
//! caption editor.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Calculate the display width of a string
///
/// Takes into account East Asian Wide/Fullwidth characters.
pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Truncate a string to fit within a maximum display width
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for grapheme in s.graphemes(true) {
        let grapheme_width = grapheme.width();
        if current_width + grapheme_width > max_width {
            break;
        }
        result.push_str(grapheme);
        current_width += grapheme_width;
    }

    result
}

/// Remove the last grapheme cluster (caption-editor backspace).
pub fn pop_grapheme(s: &mut String) {
    if let Some((idx, _)) = s.grapheme_indices(true).last() {
        s.truncate(idx);
    }
}
