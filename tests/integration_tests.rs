//! Integration tests for PosterForge

use std::path::PathBuf;
use std::sync::Arc;

use crossbeam_channel::unbounded;
use image::{DynamicImage, RgbImage};
use proptest::prelude::*;

use posterforge::asset::PhotoAsset;
use posterforge::color::Rgba;
use posterforge::composition::{
    CompositionModel, Translucency, CONTAINER_MAX_HEIGHT, CONTAINER_MAX_WIDTH,
    PLACEHOLDER_CAPTION,
};
use posterforge::config::{Config, StylePreferences};
use posterforge::export::encode_poster;
use posterforge::fonts::FontCatalog;
use posterforge::render::preview::{render_preview, PreviewConfig};
use posterforge::render::{rasterize, wrap_caption};
use posterforge::state::AppState;
use posterforge::style::{FontFamily, StyleEdit, StyleState};
use posterforge::terminal_capabilities::{ColorSupport, TerminalCapabilities};
use posterforge::worker::{WorkerMessage, WorkerResponse};

fn create_photo(width: u32, height: u32) -> PhotoAsset {
    let mut img = RgbImage::new(width, height);
    for x in 0..width {
        for y in 0..height {
            let r = ((x as f32 / width as f32) * 255.0) as u8;
            let g = ((y as f32 / height as f32) * 255.0) as u8;
            img.put_pixel(x, y, image::Rgb([r, g, 128]));
        }
    }
    PhotoAsset::new(DynamicImage::ImageRgb8(img), None, 0)
}

fn styled(caption: &str) -> StyleState {
    StyleState::default().apply(StyleEdit::SetCaption(caption.to_string()))
}

mod composition_tests {
    use super::*;

    #[test]
    fn test_derivation_is_idempotent() {
        let photo = create_photo(900, 600);
        let style = styled("Sunset over the bay");

        let a = CompositionModel::derive(Some(&photo), &style);
        let b = CompositionModel::derive(Some(&photo), &style);
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_photo_means_no_poster() {
        let model = CompositionModel::derive(None, &styled("anything"));
        assert!(model.poster.is_none());
    }

    #[test]
    fn test_oversized_photo_fits_container() {
        let photo = create_photo(1600, 2400);
        let model = CompositionModel::derive(Some(&photo), &StyleState::default());
        let plan = model.poster.unwrap();

        assert!(plan.width <= CONTAINER_MAX_WIDTH);
        assert!(plan.height <= CONTAINER_MAX_HEIGHT);
        // Aspect ratio preserved: 1600/2400 == width/height
        let src_ratio = 1600.0 / 2400.0;
        let out_ratio = plan.width as f32 / plan.height as f32;
        assert!((src_ratio - out_ratio).abs() < 0.01);
    }

    #[test]
    fn test_small_photo_keeps_intrinsic_size() {
        let photo = create_photo(320, 240);
        let plan = CompositionModel::derive(Some(&photo), &StyleState::default())
            .poster
            .unwrap();
        assert_eq!((plan.width, plan.height), (320, 240));
    }

    #[test]
    fn test_empty_caption_uses_placeholder_and_light_blur() {
        let photo = create_photo(400, 300);
        let mut style = StyleState::default();
        style.footer_color = Rgba::new(10, 20, 30, 200);
        style.text_color = Rgba::new(200, 0, 0, 255);

        let plan = CompositionModel::derive(Some(&photo), &style)
            .poster
            .unwrap();

        assert!(plan.caption.is_placeholder);
        assert_eq!(plan.caption.text, PLACEHOLDER_CAPTION);
        assert_eq!(plan.caption.translucency, Translucency::Light);
        // Placeholder ignores the user's colors
        assert_ne!(plan.caption.fill, style.footer_color);
        assert_ne!(plan.caption.text_color, style.text_color);
    }

    #[test]
    fn test_real_caption_uses_heavy_blur_and_styled_colors() {
        let photo = create_photo(400, 300);
        let mut style = styled("hello");
        style.footer_color = Rgba::new(10, 20, 30, 200);

        let plan = CompositionModel::derive(Some(&photo), &style)
            .poster
            .unwrap();

        assert!(!plan.caption.is_placeholder);
        assert_eq!(plan.caption.translucency, Translucency::Heavy);
        assert_eq!(plan.caption.fill, style.footer_color);
    }
}

mod wrap_tests {
    use super::*;

    // Ten pixels per grapheme keeps the math obvious
    fn measure(s: &str) -> f32 {
        s.chars().count() as f32 * 10.0
    }

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap_caption("one two three four five", 100.0, measure);
        for line in &lines {
            assert!(measure(line) <= 100.0, "line too wide: {:?}", line);
        }
        assert_eq!(lines.join(" "), "one two three four five");
    }

    #[test]
    fn test_explicit_newlines_preserved() {
        let lines = wrap_caption("top\nbottom", 1000.0, measure);
        assert_eq!(lines, vec!["top".to_string(), "bottom".to_string()]);
    }

    #[test]
    fn test_oversized_word_is_hard_broken() {
        let lines = wrap_caption("abcdefghijklmnop", 50.0, measure);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(measure(line) <= 50.0);
        }
        assert_eq!(lines.concat(), "abcdefghijklmnop");
    }
}

mod wysiwyg_tests {
    use super::*;

    #[test]
    fn test_export_pixels_match_raster() {
        let fonts = FontCatalog::load();
        if fonts.is_empty() {
            return; // no system fonts in this environment
        }

        let photo = create_photo(200, 150);
        let plan = CompositionModel::derive(Some(&photo), &styled("WYSIWYG"))
            .poster
            .unwrap();

        let raster = rasterize(&plan, &fonts, 1.0).unwrap();
        let png = encode_poster(&plan, &fonts, 1.0).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();

        assert_eq!(decoded.dimensions(), raster.dimensions());
        assert_eq!(decoded.as_raw(), raster.as_raw());
    }

    #[test]
    fn test_export_scale_multiplies_dimensions() {
        let fonts = FontCatalog::load();
        if fonts.is_empty() {
            return;
        }

        let photo = create_photo(200, 150);
        let plan = CompositionModel::derive(Some(&photo), &styled("big"))
            .poster
            .unwrap();

        let small = rasterize(&plan, &fonts, 1.0).unwrap();
        let big = rasterize(&plan, &fonts, 2.0).unwrap();
        assert_eq!(big.width(), small.width() * 2);
        assert_eq!(big.height(), small.height() * 2);
    }

    #[test]
    fn test_preview_consumes_same_plan() {
        let fonts = FontCatalog::load();
        if fonts.is_empty() {
            return;
        }

        let photo = create_photo(120, 90);
        let plan = CompositionModel::derive(Some(&photo), &styled("same"))
            .poster
            .unwrap();

        let config = PreviewConfig {
            columns: 40,
            color_mode: ColorSupport::TrueColor,
        };
        let preview = render_preview(&plan, &fonts, &config).unwrap();

        assert!(preview.contains('\u{2580}'));
        assert_eq!(preview.lines().next().map(|l| {
            l.chars().filter(|&c| c == '\u{2580}').count()
        }), Some(40));
    }
}

mod state_tests {
    use super::*;

    fn test_state() -> (AppState, crossbeam_channel::Receiver<WorkerMessage>) {
        let (tx, rx) = unbounded();
        let state = AppState::new(Config::default(), TerminalCapabilities::default(), tx);
        (state, rx)
    }

    #[test]
    fn test_export_is_noop_without_photo() {
        let (mut state, rx) = test_state();
        state.request_export();
        assert!(!state.is_exporting);
        assert!(rx.try_recv().is_err());
        assert!(!state.status_is_error);
    }

    #[test]
    fn test_replacing_photo_releases_previous() {
        let (mut state, _rx) = test_state();

        state.request_photo_load(PathBuf::from("a.png"));
        state.handle_worker_response(WorkerResponse::DecodeComplete {
            image: Arc::new(DynamicImage::ImageRgb8(RgbImage::new(10, 10))),
            path: PathBuf::from("a.png"),
            generation: 1,
            decode_time: 1,
        });
        let first = Arc::downgrade(&state.photo.as_ref().unwrap().pixels);

        state.request_photo_load(PathBuf::from("b.png"));
        state.handle_worker_response(WorkerResponse::DecodeComplete {
            image: Arc::new(DynamicImage::ImageRgb8(RgbImage::new(20, 20))),
            path: PathBuf::from("b.png"),
            generation: 2,
            decode_time: 1,
        });

        // Drain queued preview requests so the channel doesn't pin the plans.
        while _rx.try_recv().is_ok() {}

        // The composition holds the new plan, so no clone of the old photo
        // survives anywhere in the state.
        assert!(first.upgrade().is_none());
        assert_eq!(state.photo.as_ref().unwrap().dimensions(), (20, 20));
    }

    #[test]
    fn test_caption_edit_reflects_in_plan() {
        let (mut state, _rx) = test_state();
        state.handle_worker_response(WorkerResponse::DecodeComplete {
            image: Arc::new(DynamicImage::ImageRgb8(RgbImage::new(50, 40))),
            path: PathBuf::from("p.png"),
            generation: 0,
            decode_time: 1,
        });

        state.apply_style_edit(StyleEdit::SetCaption("fresh".to_string()));
        let plan = state.composition.poster.as_ref().unwrap();
        assert_eq!(plan.caption.text, "fresh");
        assert!(!plan.caption.is_placeholder);
    }
}

mod config_tests {
    use super::*;

    #[test]
    fn test_style_prefs_round_trip_through_toml() {
        let mut style = StyleState::default();
        style.footer_color = Rgba::new(12, 34, 56, 99);
        style.font = FontFamily::LiberationSerif;
        style.italic = true;

        let mut config = Config::default();
        config.style = StylePreferences::from_style_state(&style);

        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        let restored = parsed.style.to_style_state();

        assert_eq!(restored.footer_color, style.footer_color);
        assert_eq!(restored.font, style.font);
        assert!(restored.italic);
    }
}

mod hex_tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(Rgba::parse_hex("#fff"), Some(Rgba::new(255, 255, 255, 255)));
        assert_eq!(
            Rgba::parse_hex("#102030"),
            Some(Rgba::new(16, 32, 48, 255))
        );
        assert_eq!(
            Rgba::parse_hex("1020304d"),
            Some(Rgba::new(16, 32, 48, 77))
        );
        assert_eq!(Rgba::parse_hex("#12345"), None);
        assert_eq!(Rgba::parse_hex("#gggggg"), None);
    }

    #[test]
    fn test_to_hex_round_trips() {
        let color = Rgba::new(255, 255, 255, 77);
        assert_eq!(Rgba::parse_hex(&color.to_hex()), Some(color));
    }
}

proptest! {
    #[test]
    fn prop_bold_edit_touches_only_bold(caption in ".{0,40}", size in 1.0f32..100.0) {
        let base = StyleState::default()
            .apply(StyleEdit::SetCaption(caption))
            .apply(StyleEdit::SetFontSize(size));
        let edited = base.apply(StyleEdit::ToggleBold);

        prop_assert_eq!(edited.caption, base.caption);
        prop_assert_eq!(edited.footer_color, base.footer_color);
        prop_assert_eq!(edited.text_color, base.text_color);
        prop_assert_eq!(edited.italic, base.italic);
        prop_assert_eq!(edited.font_size_px, base.font_size_px);
        prop_assert_eq!(edited.font, base.font);
        prop_assert_ne!(edited.bold, base.bold);
    }

    #[test]
    fn prop_wrap_never_loses_graphemes(text in "[a-z ]{0,60}") {
        let measure = |s: &str| s.chars().count() as f32 * 7.0;
        let lines = wrap_caption(&text, 70.0, measure);

        let rejoined: String = lines.join("");
        let original: String = text.split_whitespace().collect::<Vec<_>>().join("");
        let rejoined_compact: String = rejoined.split_whitespace().collect::<Vec<_>>().join("");
        prop_assert_eq!(rejoined_compact, original.replace(' ', ""));
    }

    #[test]
    fn prop_fit_never_exceeds_container(w in 1u32..4000, h in 1u32..4000) {
        let photo = PhotoAsset::new(
            DynamicImage::ImageRgb8(RgbImage::new(w, h)),
            None,
            0,
        );
        let plan = CompositionModel::derive(Some(&photo), &StyleState::default())
            .poster
            .unwrap();
        prop_assert!(plan.width <= CONTAINER_MAX_WIDTH);
        prop_assert!(plan.height <= CONTAINER_MAX_HEIGHT);
        prop_assert!(plan.width >= 1 && plan.height >= 1);
    }
}
