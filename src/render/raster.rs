//! Poster rasterizer
//!
//! Renders a `PosterPlan` into an RGBA bitmap: background photo scaled to the
//! layout size, caption bar blurred and tinted at the bottom edge, caption
//! text wrapped and drawn with the exact family/size/weight/slant/color of
//! the plan. The terminal preview and the PNG export both go through here,
//! which is what makes the export pixel-faithful to what is shown.

use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};
use image::{imageops, RgbaImage};
use imageproc::filter::gaussian_blur_f32;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

use crate::color::Rgba;
use crate::composition::{PosterPlan, BAR_PADDING, TEXT_PADDING_H, TEXT_PADDING_V};
use crate::fonts::FontCatalog;

/// Horizontal shear applied for synthetic italics (roughly a 12 degree slant).
const ITALIC_SHEAR: f32 = 0.21;

/// Rasterization failures. All of them are terminal: the caller reports a
/// status message and no artifact is produced.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no usable font for family '{0}'")]
    FontUnavailable(&'static str),
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Rasterize a poster plan at the given device-pixel-ratio scale.
///
/// Output dimensions are exactly `plan.width x plan.height` multiplied by
/// `scale`, so exported pixels match the on-screen layout.
pub fn rasterize(
    plan: &PosterPlan,
    fonts: &FontCatalog,
    scale: f32,
) -> Result<RgbaImage, RenderError> {
    let scale = scale.max(0.1);
    let out_w = ((plan.width as f32 * scale).round() as u32).max(1);
    let out_h = ((plan.height as f32 * scale).round() as u32).max(1);

    let mut canvas = plan
        .image
        .resize_exact(out_w, out_h, imageops::FilterType::Lanczos3)
        .to_rgba8();

    let caption = &plan.caption;
    let font = fonts
        .resolve(caption.font)
        .ok_or(RenderError::FontUnavailable(caption.font.name()))?;

    let px = PxScale::from(caption.font_size_px * scale);
    let scaled = font.as_scaled(px);

    let inset_h = (BAR_PADDING + TEXT_PADDING_H) * scale;
    let inset_v = (BAR_PADDING + TEXT_PADDING_V) * scale;
    let inner_width = (out_w as f32 - 2.0 * inset_h).max(1.0);

    let lines = wrap_caption(&caption.text, inner_width, |s| line_width(&scaled, s));
    let line_height = scaled.height() + scaled.line_gap();
    let text_height = lines.len() as f32 * line_height;

    // The bar grows with its content but never past the poster itself.
    let bar_height = ((text_height + 2.0 * inset_v).ceil() as u32).min(out_h);
    let bar_top = out_h - bar_height;

    blur_bar(&mut canvas, bar_top, caption.translucency.blur_radius_px() * scale);
    tint_bar(&mut canvas, bar_top, caption.fill);

    let text_top = bar_top as f32 + inset_v;
    for (i, line) in lines.iter().enumerate() {
        let width = line_width(&scaled, line);
        let x = (out_w as f32 - width) / 2.0;
        let baseline = text_top + i as f32 * line_height + scaled.ascent();

        draw_line(
            &mut canvas,
            font,
            px,
            x,
            baseline,
            caption.text_color,
            line,
            caption.bold,
            caption.italic,
        );
    }

    Ok(canvas)
}

/// Advance-based width of a single line in pixels.
fn line_width<F: Font>(scaled: &ab_glyph::PxScaleFont<F>, text: &str) -> f32 {
    let mut width = 0.0;
    let mut previous = None;

    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }

    width
}

/// Wrap caption text against a maximum line width.
///
/// Explicit line breaks are preserved, wrapping happens on whitespace, and a
/// word wider than the whole bar is hard-broken at grapheme boundaries. The
/// measurement function is injected so wrapping stays testable without a
/// real font.
pub fn wrap_caption<F: Fn(&str) -> f32>(text: &str, max_width: f32, measure: F) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in words {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if measure(&candidate) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if measure(word) <= max_width {
                current = word.to_string();
            } else {
                let mut chunks = break_word(word, max_width, &measure);
                current = chunks.pop().unwrap_or_default();
                lines.append(&mut chunks);
            }
        }
        lines.push(current);
    }

    lines
}

/// Break a single oversized word at grapheme boundaries.
fn break_word<F: Fn(&str) -> f32>(word: &str, max_width: f32, measure: &F) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for grapheme in word.graphemes(true) {
        let candidate = format!("{}{}", current, grapheme);
        if measure(&candidate) <= max_width || current.is_empty() {
            current = candidate;
        } else {
            chunks.push(std::mem::take(&mut current));
            current = grapheme.to_string();
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Gaussian-blur the strip from `bar_top` to the bottom edge in place.
fn blur_bar(canvas: &mut RgbaImage, bar_top: u32, blur_radius: f32) {
    let (width, height) = canvas.dimensions();
    let bar_height = height - bar_top;
    if bar_height == 0 || blur_radius <= 0.0 {
        return;
    }

    // CSS blur(r) corresponds to a Gaussian with sigma of about r / 2.
    let sigma = (blur_radius * 0.5).max(0.1);
    let strip = imageops::crop_imm(&*canvas, 0, bar_top, width, bar_height).to_image();
    let blurred = gaussian_blur_f32(&strip, sigma);
    imageops::replace(canvas, &blurred, 0, bar_top as i64);
}

/// Composite the bar fill color over the (already blurred) strip.
fn tint_bar(canvas: &mut RgbaImage, bar_top: u32, fill: Rgba) {
    let (width, height) = canvas.dimensions();
    for y in bar_top..height {
        for x in 0..width {
            let dst = canvas.get_pixel_mut(x, y);
            let below = Rgba::new(dst.0[0], dst.0[1], dst.0[2], dst.0[3]);
            let out = fill.over(below);
            *dst = image::Rgba([out.r, out.g, out.b, out.a]);
        }
    }
}

/// Draw one caption line at the given baseline.
///
/// Bold is a synthetic double-strike; italic is a per-pixel horizontal shear
/// relative to the baseline.
#[allow(clippy::too_many_arguments)]
fn draw_line(
    canvas: &mut RgbaImage,
    font: &FontArc,
    px: PxScale,
    x: f32,
    baseline: f32,
    color: Rgba,
    text: &str,
    bold: bool,
    italic: bool,
) {
    let shear = if italic { ITALIC_SHEAR } else { 0.0 };
    let bold_offset = if bold {
        (px.x / 24.0).clamp(1.0, 3.0)
    } else {
        0.0
    };

    draw_line_pass(canvas, font, px, x, baseline, color, text, shear);
    if bold {
        draw_line_pass(canvas, font, px, x + bold_offset, baseline, color, text, shear);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_line_pass(
    canvas: &mut RgbaImage,
    font: &FontArc,
    px: PxScale,
    x: f32,
    baseline: f32,
    color: Rgba,
    text: &str,
    shear: f32,
) {
    let scaled = font.as_scaled(px);
    let (width, height) = canvas.dimensions();
    let alpha = color.a as f32 / 255.0;

    let mut caret = x;
    let mut previous = None;

    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }

        let glyph = id.with_scale_and_position(px, point(caret, baseline));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let py = bounds.min.y + gy as f32;
                // Slant leans the part above the baseline to the right.
                let dx = (baseline - py) * shear;
                let px_x = (bounds.min.x + gx as f32 + dx).round() as i64;
                let px_y = py.round() as i64;
                if px_x < 0 || px_y < 0 || px_x >= width as i64 || px_y >= height as i64 {
                    return;
                }

                let src_a = coverage * alpha;
                if src_a <= 0.0 {
                    return;
                }

                let dst = canvas.get_pixel_mut(px_x as u32, px_y as u32);
                let inv = 1.0 - src_a;
                dst.0[0] = (color.r as f32 * src_a + dst.0[0] as f32 * inv) as u8;
                dst.0[1] = (color.g as f32 * src_a + dst.0[1] as f32 * inv) as u8;
                dst.0[2] = (color.b as f32 * src_a + dst.0[2] as f32 * inv) as u8;
                dst.0[3] = dst.0[3].max((src_a * 255.0) as u8);
            });
        }

        caret += scaled.h_advance(id);
        previous = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::PhotoAsset;
    use crate::composition::CompositionModel;
    use crate::style::{StyleEdit, StyleState};
    use image::{DynamicImage, RgbImage};

    /// Width model for wrap tests: every grapheme is 10px wide, spaces too.
    fn measure(s: &str) -> f32 {
        s.graphemes(true).count() as f32 * 10.0
    }

    #[test]
    fn test_wrap_short_line_untouched() {
        let lines = wrap_caption("Hello", 100.0, measure);
        assert_eq!(lines, vec!["Hello".to_string()]);
    }

    #[test]
    fn test_wrap_on_whitespace() {
        let lines = wrap_caption("one two three", 70.0, measure);
        assert_eq!(lines, vec!["one two".to_string(), "three".to_string()]);
    }

    #[test]
    fn test_wrap_preserves_explicit_breaks() {
        let lines = wrap_caption("a\n\nb", 100.0, measure);
        assert_eq!(
            lines,
            vec!["a".to_string(), String::new(), "b".to_string()]
        );
    }

    #[test]
    fn test_wrap_hard_breaks_oversized_word() {
        let lines = wrap_caption("abcdefgh", 30.0, measure);
        assert_eq!(
            lines,
            vec!["abc".to_string(), "def".to_string(), "gh".to_string()]
        );
    }

    #[test]
    fn test_wrap_never_exceeds_width() {
        let lines = wrap_caption("several words of varying length here", 50.0, measure);
        for line in &lines {
            assert!(measure(line) <= 50.0, "line too wide: {:?}", line);
        }
    }

    fn test_plan(caption: &str) -> PosterPlan {
        let asset = PhotoAsset::new(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(200, 150, image::Rgb([0, 0, 255]))),
            None,
            0,
        );
        let style = StyleState::default().apply(StyleEdit::SetCaption(caption.to_string()));
        CompositionModel::derive(Some(&asset), &style)
            .poster
            .expect("photo present")
    }

    #[test]
    fn test_rasterize_matches_layout_dimensions() {
        let fonts = FontCatalog::load();
        if fonts.is_empty() {
            return; // no system fonts in this environment
        }

        let plan = test_plan("Hello");
        let img = rasterize(&plan, &fonts, 1.0).unwrap();
        assert_eq!(img.dimensions(), (plan.width, plan.height));

        let doubled = rasterize(&plan, &fonts, 2.0).unwrap();
        assert_eq!(doubled.dimensions(), (plan.width * 2, plan.height * 2));
    }

    #[test]
    fn test_rasterize_fails_without_fonts() {
        let fonts = FontCatalog::empty();
        let plan = test_plan("Hello");
        assert!(matches!(
            rasterize(&plan, &fonts, 1.0),
            Err(RenderError::FontUnavailable(_))
        ));
    }

    #[test]
    fn test_opaque_fill_covers_bar_corner() {
        let fonts = FontCatalog::load();
        if fonts.is_empty() {
            return;
        }

        let asset = PhotoAsset::new(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(200, 150, image::Rgb([0, 0, 255]))),
            None,
            0,
        );
        let style = StyleState::default()
            .apply(StyleEdit::SetCaption("Hello".to_string()))
            .apply(StyleEdit::SetFooterColor(Rgba::opaque(255, 0, 0)));
        let plan = CompositionModel::derive(Some(&asset), &style)
            .poster
            .unwrap();

        let img = rasterize(&plan, &fonts, 1.0).unwrap();
        // Bottom-left corner sits inside the bar padding, away from glyphs.
        let corner = img.get_pixel(2, img.height() - 2);
        assert_eq!(corner.0[0], 255);
        assert_eq!(corner.0[1], 0);
        assert_eq!(corner.0[2], 0);
    }
}
