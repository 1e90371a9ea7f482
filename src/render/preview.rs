//! Live terminal preview
//!
//! Presents the rasterized poster in the terminal using half-block
//! characters, one character cell per 1x2 pixel pair. The preview consumes
//! the same raster output as the exporter, so the canvas is an honest
//! (downsampled) view of what `poster.png` will contain.

use image::{imageops, DynamicImage, GenericImageView};

use crate::color::{format_bg_color, format_fg_color, ANSI_RESET};
use crate::composition::PosterPlan;
use crate::fonts::FontCatalog;
use crate::render::raster::{rasterize, RenderError};
use crate::terminal_capabilities::ColorSupport;

/// Configuration for the terminal preview
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Preview width in character columns.
    pub columns: usize,
    pub color_mode: ColorSupport,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            columns: 80,
            color_mode: ColorSupport::TrueColor,
        }
    }
}

/// Rasterize the plan and downsample it into half-block ANSI art.
pub fn render_preview(
    plan: &PosterPlan,
    fonts: &FontCatalog,
    config: &PreviewConfig,
) -> Result<String, RenderError> {
    let raster = rasterize(plan, fonts, 1.0)?;
    Ok(half_blocks(&DynamicImage::ImageRgba8(raster), config))
}

/// Render an image as half-block characters with 2x vertical resolution.
fn half_blocks(image: &DynamicImage, config: &PreviewConfig) -> String {
    let (width, height) = cell_dimensions(image, config.columns.max(1));
    let actual_height = height * 2;

    let resized = image.resize_exact(
        width as u32,
        actual_height as u32,
        imageops::FilterType::Lanczos3,
    );

    let mut output = String::with_capacity((width * 30 + 1) * height);

    // Process 2 rows at a time
    for y in (0..actual_height).step_by(2) {
        for x in 0..width {
            let top = resized.get_pixel(x as u32, y as u32);
            let bottom = if y + 1 < actual_height {
                resized.get_pixel(x as u32, (y + 1) as u32)
            } else {
                top
            };

            // Upper half block with top color as foreground, bottom as background
            if config.color_mode != ColorSupport::NoColor {
                output.push_str(&format_fg_color(top[0], top[1], top[2], config.color_mode));
                output.push_str(&format_bg_color(
                    bottom[0],
                    bottom[1],
                    bottom[2],
                    config.color_mode,
                ));
            }

            output.push('▀');

            if config.color_mode != ColorSupport::NoColor {
                output.push_str(ANSI_RESET);
            }
        }
        output.push('\n');
    }

    output
}

/// Character-cell grid for a given column budget.
///
/// Terminal cells are roughly twice as tall as wide; half blocks double the
/// vertical resolution, so each cell covers a square pixel pair.
fn cell_dimensions(image: &DynamicImage, columns: usize) -> (usize, usize) {
    let (img_width, img_height) = image.dimensions();
    let aspect_ratio = img_width.max(1) as f32 / img_height.max(1) as f32;

    let height = (columns as f32 / aspect_ratio / 2.0).round() as usize;
    (columns.max(1), height.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn solid_image(r: u8, g: u8, b: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 40, image::Rgb([r, g, b])))
    }

    #[test]
    fn test_half_blocks_dimensions() {
        let config = PreviewConfig {
            columns: 10,
            color_mode: ColorSupport::NoColor,
        };
        let output = half_blocks(&solid_image(0, 0, 0), &config);
        let lines: Vec<&str> = output.lines().collect();
        assert!(!lines.is_empty());
        assert_eq!(lines[0].chars().count(), 10);
    }

    #[test]
    fn test_half_blocks_no_color_is_plain() {
        let config = PreviewConfig {
            columns: 8,
            color_mode: ColorSupport::NoColor,
        };
        let output = half_blocks(&solid_image(255, 0, 0), &config);
        assert!(!output.contains("\x1b["));
        assert!(output.contains('▀'));
    }

    #[test]
    fn test_half_blocks_true_color_escapes() {
        let config = PreviewConfig {
            columns: 8,
            color_mode: ColorSupport::TrueColor,
        };
        let output = half_blocks(&solid_image(255, 0, 0), &config);
        assert!(output.contains("\x1b[38;2;"));
        assert!(output.contains("\x1b[48;2;"));
    }
}
