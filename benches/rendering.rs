//! Rendering benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use inkname::color_space::parse_or_fallback;
use inkname::export::ImageExporter;
use inkname::fonts::FontBook;
use inkname::raster::{block_rows, rasterize, RasterConfig};
use inkname::style::GeneratedSignature;

fn signature(name: &str) -> GeneratedSignature {
    GeneratedSignature {
        name: name.to_string(),
        font: "Brush Script MT, cursive".to_string(),
        color: "#1e90ff".to_string(),
    }
}

fn benchmark_rasterize(c: &mut Criterion) {
    let fonts = FontBook::system();
    let Ok(font) = fonts.resolve("Brush Script MT, cursive") else {
        eprintln!("No fonts installed; skipping rasterization benchmarks");
        return;
    };
    let color = parse_or_fallback("#1e90ff");
    let config = RasterConfig::default();

    let mut group = c.benchmark_group("Rasterize");

    for name in ["Jo", "Jane Doe", "Maximilian Alexander Featherstonehaugh"] {
        group.bench_function(format!("chars_{}", name.len()), |b| {
            b.iter(|| rasterize(black_box(name), &font, color, &config))
        });
    }

    group.finish();
}

fn benchmark_glyph_preview(c: &mut Criterion) {
    let fonts = FontBook::system();
    let Ok(font) = fonts.resolve("cursive") else {
        return;
    };
    let image = rasterize(
        "Jane Doe",
        &font,
        parse_or_fallback("black"),
        &RasterConfig::default(),
    );

    let mut group = c.benchmark_group("Glyph Preview");

    for columns in [40, 60, 120] {
        group.bench_function(format!("columns_{}", columns), |b| {
            b.iter(|| block_rows(black_box(&image), columns))
        });
    }

    group.finish();
}

fn benchmark_png_encode(c: &mut Criterion) {
    let fonts = FontBook::system();
    if fonts.is_empty() {
        return;
    }
    let exporter = ImageExporter::new(fonts, std::env::temp_dir());
    let jane = signature("Jane Doe");

    c.bench_function("render_png", |b| {
        b.iter(|| exporter.render_png(black_box(&jane)))
    });
}

criterion_group!(
    benches,
    benchmark_rasterize,
    benchmark_glyph_preview,
    benchmark_png_encode
);
criterion_main!(benches);
