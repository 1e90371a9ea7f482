//! Composition model
//!
//! Pure derivation of a display-independent poster plan from the current
//! photo and style. The live terminal preview and the PNG exporter both
//! consume the same plan, so what is exported is exactly what is shown.

use std::sync::Arc;

use image::DynamicImage;

use crate::asset::PhotoAsset;
use crate::color::Rgba;
use crate::style::{FontFamily, StyleState};

/// Layout ceilings imposed by the poster container, in layout pixels.
pub const CONTAINER_MAX_WIDTH: u32 = 800;
pub const CONTAINER_MAX_HEIGHT: u32 = 1000;

/// Caption bar inset and text inset, in layout pixels.
pub const BAR_PADDING: f32 = 10.0;
pub const TEXT_PADDING_V: f32 = 5.0;
pub const TEXT_PADDING_H: f32 = 10.0;

/// Prompt shown inside the caption bar while no text has been entered.
pub const PLACEHOLDER_CAPTION: &str = "Add a caption";

/// Bar fill and text color used for the placeholder caption.
pub const PLACEHOLDER_FILL: Rgba = Rgba::new(255, 255, 255, 77);
pub const PLACEHOLDER_TEXT_COLOR: Rgba = Rgba::opaque(0x61, 0x61, 0x61);

/// Blur weight of the caption bar. Heavy iff caption text is present, so an
/// empty caption reads as a subtle ghost and a filled one as a frosted banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Translucency {
    Light,
    Heavy,
}

impl Translucency {
    /// Blur radius applied under the bar, in layout pixels.
    pub fn blur_radius_px(&self) -> f32 {
        match self {
            Translucency::Light => 10.0,
            Translucency::Heavy => 12.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Translucency::Light => "Light",
            Translucency::Heavy => "Heavy",
        }
    }
}

/// Caption bar parameters, taken verbatim from the style when text is
/// present, or the fixed placeholder treatment when it is not.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionPlan {
    pub text: String,
    pub is_placeholder: bool,
    pub fill: Rgba,
    pub text_color: Rgba,
    pub translucency: Translucency,
    pub font: FontFamily,
    pub font_size_px: f32,
    pub bold: bool,
    pub italic: bool,
}

/// The renderable poster: shared photo pixels plus layout geometry and the
/// caption plan.
#[derive(Debug, Clone)]
pub struct PosterPlan {
    pub image: Arc<DynamicImage>,
    /// Layout dimensions after container fitting, in layout pixels.
    pub width: u32,
    pub height: u32,
    pub caption: CaptionPlan,
}

impl PartialEq for PosterPlan {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
            && self.width == other.width
            && self.height == other.height
            && self.caption == other.caption
    }
}

/// Derived layout for the current photo + style. Recomputed on every change,
/// never cached, so there is no staleness to manage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositionModel {
    /// `None` means no photo yet: the canvas shows the upload placeholder
    /// and there is nothing to export.
    pub poster: Option<PosterPlan>,
}

impl CompositionModel {
    /// Pure function of its inputs; calling it twice with the same photo and
    /// style yields an identical plan.
    pub fn derive(photo: Option<&PhotoAsset>, style: &StyleState) -> Self {
        let poster = photo.map(|asset| {
            let (iw, ih) = asset.dimensions();
            let (width, height) = fit_to_container(iw, ih);
            PosterPlan {
                image: Arc::clone(&asset.pixels),
                width,
                height,
                caption: caption_plan(style),
            }
        });

        Self { poster }
    }

    pub fn has_photo(&self) -> bool {
        self.poster.is_some()
    }
}

/// Scale intrinsic photo dimensions into the container: aspect preserved,
/// never cropped, never upscaled past the intrinsic resolution. The ceilings
/// only shrink.
fn fit_to_container(width: u32, height: u32) -> (u32, u32) {
    let width = width.max(1);
    let height = height.max(1);

    let scale_w = CONTAINER_MAX_WIDTH as f32 / width as f32;
    let scale_h = CONTAINER_MAX_HEIGHT as f32 / height as f32;
    let scale = scale_w.min(scale_h).min(1.0);

    let out_w = ((width as f32 * scale).round() as u32).max(1);
    let out_h = ((height as f32 * scale).round() as u32).max(1);
    (out_w, out_h)
}

fn caption_plan(style: &StyleState) -> CaptionPlan {
    if style.caption.is_empty() {
        CaptionPlan {
            text: PLACEHOLDER_CAPTION.to_string(),
            is_placeholder: true,
            fill: PLACEHOLDER_FILL,
            text_color: PLACEHOLDER_TEXT_COLOR,
            translucency: Translucency::Light,
            font: style.font,
            font_size_px: style.font_size_px,
            bold: style.bold,
            italic: style.italic,
        }
    } else {
        CaptionPlan {
            text: style.caption.clone(),
            is_placeholder: false,
            fill: style.footer_color,
            text_color: style.text_color,
            translucency: Translucency::Heavy,
            font: style.font,
            font_size_px: style.font_size_px,
            bold: style.bold,
            italic: style.italic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn photo(width: u32, height: u32) -> PhotoAsset {
        PhotoAsset::new(
            DynamicImage::ImageRgb8(RgbImage::new(width, height)),
            None,
            0,
        )
    }

    #[test]
    fn test_no_photo_means_no_poster() {
        let model = CompositionModel::derive(None, &StyleState::default());
        assert!(!model.has_photo());
        assert_eq!(model.poster, None);
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let asset = photo(640, 480);
        let style = StyleState::default();

        let a = CompositionModel::derive(Some(&asset), &style);
        let b = CompositionModel::derive(Some(&asset), &style);
        assert_eq!(a, b);
    }

    #[test]
    fn test_translucency_tracks_caption_presence() {
        let asset = photo(100, 100);

        let empty = CompositionModel::derive(Some(&asset), &StyleState::default());
        assert_eq!(
            empty.poster.unwrap().caption.translucency,
            Translucency::Light
        );

        let mut style = StyleState::default();
        style.caption = "Hello".to_string();
        let filled = CompositionModel::derive(Some(&asset), &style);
        assert_eq!(
            filled.poster.unwrap().caption.translucency,
            Translucency::Heavy
        );
    }

    #[test]
    fn test_placeholder_caption_ignores_styled_colors() {
        let asset = photo(100, 100);
        let mut style = StyleState::default();
        style.footer_color = Rgba::opaque(255, 0, 0);
        style.text_color = Rgba::opaque(0, 255, 0);

        let model = CompositionModel::derive(Some(&asset), &style);
        let caption = model.poster.unwrap().caption;
        assert!(caption.is_placeholder);
        assert_eq!(caption.text, PLACEHOLDER_CAPTION);
        assert_eq!(caption.fill, PLACEHOLDER_FILL);
        assert_eq!(caption.text_color, PLACEHOLDER_TEXT_COLOR);
    }

    #[test]
    fn test_small_photo_keeps_intrinsic_size() {
        let asset = photo(320, 240);
        let model = CompositionModel::derive(Some(&asset), &StyleState::default());
        let poster = model.poster.unwrap();
        assert_eq!((poster.width, poster.height), (320, 240));
    }

    #[test]
    fn test_wide_photo_fits_width_ceiling() {
        let asset = photo(1600, 800);
        let model = CompositionModel::derive(Some(&asset), &StyleState::default());
        let poster = model.poster.unwrap();
        assert_eq!((poster.width, poster.height), (800, 400));
    }

    #[test]
    fn test_tall_photo_fits_height_ceiling() {
        let asset = photo(1000, 4000);
        let model = CompositionModel::derive(Some(&asset), &StyleState::default());
        let poster = model.poster.unwrap();
        assert_eq!((poster.width, poster.height), (250, 1000));
    }
}
