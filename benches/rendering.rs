//! Rendering benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, RgbImage};

use posterforge::asset::PhotoAsset;
use posterforge::composition::{CompositionModel, PosterPlan};
use posterforge::fonts::FontCatalog;
use posterforge::render::preview::{render_preview, PreviewConfig};
use posterforge::render::{rasterize, wrap_caption};
use posterforge::style::{StyleEdit, StyleState};
use posterforge::terminal_capabilities::ColorSupport;

fn create_test_photo(width: u32, height: u32) -> PhotoAsset {
    let mut img = RgbImage::new(width, height);
    for x in 0..width {
        for y in 0..height {
            let r = ((x as f32 / width as f32) * 255.0) as u8;
            let g = ((y as f32 / height as f32) * 255.0) as u8;
            let b = (((x + y) as f32 / (width + height) as f32) * 255.0) as u8;
            img.put_pixel(x, y, image::Rgb([r, g, b]));
        }
    }
    PhotoAsset::new(DynamicImage::ImageRgb8(img), None, 0)
}

fn plan_for(photo: &PhotoAsset, caption: &str) -> PosterPlan {
    let style = StyleState::default().apply(StyleEdit::SetCaption(caption.to_string()));
    CompositionModel::derive(Some(photo), &style)
        .poster
        .expect("photo present")
}

fn benchmark_rasterize_sizes(c: &mut Criterion) {
    let fonts = FontCatalog::load();
    if fonts.is_empty() {
        return;
    }

    let mut group = c.benchmark_group("Rasterize");

    for (w, h) in [(400, 300), (800, 600), (1600, 1200)] {
        let photo = create_test_photo(w, h);
        let plan = plan_for(&photo, "A caption across the bottom");

        group.bench_function(format!("{}x{}", w, h), |b| {
            b.iter(|| rasterize(black_box(&plan), black_box(&fonts), black_box(1.0)))
        });
    }

    group.finish();
}

fn benchmark_rasterize_scales(c: &mut Criterion) {
    let fonts = FontCatalog::load();
    if fonts.is_empty() {
        return;
    }

    let photo = create_test_photo(800, 600);
    let plan = plan_for(&photo, "Export density");

    let mut group = c.benchmark_group("Export Scale");

    for scale in [1.0f32, 2.0, 3.0] {
        group.bench_function(format!("scale_{}", scale), |b| {
            b.iter(|| rasterize(black_box(&plan), black_box(&fonts), black_box(scale)))
        });
    }

    group.finish();
}

fn benchmark_preview(c: &mut Criterion) {
    let fonts = FontCatalog::load();
    if fonts.is_empty() {
        return;
    }

    let photo = create_test_photo(800, 600);
    let plan = plan_for(&photo, "Terminal preview");

    let mut group = c.benchmark_group("Preview");

    for color_mode in [
        ColorSupport::NoColor,
        ColorSupport::Color256,
        ColorSupport::TrueColor,
    ] {
        let config = PreviewConfig {
            columns: 80,
            color_mode,
        };

        group.bench_function(format!("{:?}", color_mode), |b| {
            b.iter(|| render_preview(black_box(&plan), black_box(&fonts), black_box(&config)))
        });
    }

    group.finish();
}

fn benchmark_wrap(c: &mut Criterion) {
    let text = "The quick brown fox jumps over the lazy dog again and again and again";
    let measure = |s: &str| s.chars().count() as f32 * 9.5;

    let mut group = c.benchmark_group("Caption Wrap");

    for width in [120.0f32, 300.0, 780.0] {
        group.bench_function(format!("width_{}", width), |b| {
            b.iter(|| wrap_caption(black_box(text), black_box(width), black_box(measure)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_rasterize_sizes,
    benchmark_rasterize_scales,
    benchmark_preview,
    benchmark_wrap,
);

criterion_main!(benches);
