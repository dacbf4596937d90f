//! Signature rasterization
//!
//! Draws a name onto a fixed-size transparent surface, centered horizontally
//! with the em box centered vertically (canvas `textAlign = center`,
//! `textBaseline = middle`).

use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};
use image::{imageops, RgbaImage};

use crate::color_space::Rgba;

/// Surface width in pixels
pub const SURFACE_WIDTH: u32 = 600;
/// Surface height in pixels
pub const SURFACE_HEIGHT: u32 = 200;
/// CSS font size of the exported text
pub const EXPORT_FONT_PX: f32 = 40.0;

/// Surface and text size for a raster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterConfig {
    pub width: u32,
    pub height: u32,
    pub font_px: f32,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            width: SURFACE_WIDTH,
            height: SURFACE_HEIGHT,
            font_px: EXPORT_FONT_PX,
        }
    }
}

/// Draw `text` centered on a new transparent surface
pub fn rasterize(text: &str, font: &FontArc, color: Rgba, config: &RasterConfig) -> RgbaImage {
    let mut canvas = RgbaImage::new(config.width, config.height);
    let scaled = font.as_scaled(css_px_scale(font, config.font_px));

    let advance = text_advance(&scaled, text);
    let mut caret = (config.width as f32 - advance) / 2.0;
    // Baseline sits half the (ascent + descent) below the vertical center
    let baseline = config.height as f32 / 2.0 + (scaled.ascent() + scaled.descent()) / 2.0;

    let mut previous = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scaled.scale(), point(caret, baseline));
        caret += scaled.h_advance(id);
        previous = Some(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let x = bounds.min.x as i32 + gx as i32;
            let y = bounds.min.y as i32 + gy as i32;
            if x < 0 || y < 0 || x >= config.width as i32 || y >= config.height as i32 {
                return;
            }
            let pixel = canvas.get_pixel_mut(x as u32, y as u32);
            blend_over(pixel, color, coverage);
        });
    }

    canvas
}

/// ab_glyph scales by ascent-to-descent height; CSS sizes the em square
fn css_px_scale(font: &FontArc, font_px: f32) -> PxScale {
    match font.units_per_em() {
        Some(upem) if upem > 0.0 => PxScale::from(font_px * font.height_unscaled() / upem),
        _ => PxScale::from(font_px),
    }
}

fn text_advance<F: Font, SF: ScaleFont<F>>(scaled: &SF, text: &str) -> f32 {
    let mut width = 0.0;
    let mut previous = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }
    width
}

/// Source-over compositing of `color` at `coverage` onto `dst`
fn blend_over(dst: &mut image::Rgba<u8>, color: Rgba, coverage: f32) {
    let src_a = (color.a as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    let channel = |s: u8, d: u8| {
        let s = s as f32 / 255.0;
        let d = d as f32 / 255.0;
        let v = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };

    *dst = image::Rgba([
        channel(color.r, dst[0]),
        channel(color.g, dst[1]),
        channel(color.b, dst[2]),
        (out_a * 255.0).round() as u8,
    ]);
}

/// Downsample a raster into half-block rows for terminal display.
///
/// Each output character covers two vertical pixels; a pixel counts as ink
/// when its alpha passes the threshold.
pub fn block_rows(raster: &RgbaImage, columns: u32) -> Vec<String> {
    if columns == 0 || raster.width() == 0 {
        return Vec::new();
    }

    let scale = columns as f32 / raster.width() as f32;
    // Terminal cells are roughly twice as tall as wide; two pixels per cell row
    let rows = ((raster.height() as f32 * scale) / 2.0).round().max(1.0) as u32;
    let resized = imageops::resize(raster, columns, rows * 2, imageops::FilterType::Triangle);

    let ink = |x: u32, y: u32| resized.get_pixel(x, y)[3] > 96;

    let mut lines: Vec<String> = (0..rows)
        .map(|row| {
            (0..columns)
                .map(|x| match (ink(x, row * 2), ink(x, row * 2 + 1)) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                })
                .collect()
        })
        .collect();

    // Drop blank margin rows
    while lines.last().is_some_and(|l: &String| l.trim().is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|l| l.trim().is_empty()).count();
    lines.drain(..leading);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontBook;

    #[test]
    fn test_blend_over_transparent_takes_source() {
        let mut px = image::Rgba([0, 0, 0, 0]);
        blend_over(&mut px, Rgba::new(255, 0, 0, 255), 1.0);
        assert_eq!(px, image::Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_blend_over_partial_coverage_keeps_color() {
        let mut px = image::Rgba([0, 0, 0, 0]);
        blend_over(&mut px, Rgba::new(255, 0, 0, 255), 0.5);
        assert_eq!(px[0], 255);
        assert!((126..=129).contains(&px[3]));
    }

    #[test]
    fn test_block_rows_of_blank_raster_is_empty() {
        let raster = RgbaImage::new(600, 200);
        assert!(block_rows(&raster, 60).is_empty());
        assert!(block_rows(&raster, 0).is_empty());
    }

    #[test]
    fn test_block_rows_full_raster() {
        let raster = RgbaImage::from_pixel(600, 200, image::Rgba([0, 0, 0, 255]));
        let rows = block_rows(&raster, 60);
        assert_eq!(rows.len(), 10);
        assert!(rows.iter().all(|r| r.chars().all(|c| c == '█')));
    }

    #[test]
    fn test_rasterize_centers_ink() {
        let book = FontBook::system();
        let Ok(font) = book.resolve("sans-serif") else {
            return;
        };
        let image = rasterize("Jane Doe", &font, Rgba::new(255, 0, 0, 255), &RasterConfig::default());
        assert_eq!(image.dimensions(), (600, 200));

        let inked: Vec<(u32, u32)> = image
            .enumerate_pixels()
            .filter(|(_, _, p)| p[3] > 0)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!inked.is_empty());

        let min_x = inked.iter().map(|p| p.0).min().unwrap_or(0);
        let max_x = inked.iter().map(|p| p.0).max().unwrap_or(0);
        let center = (min_x + max_x) as i32 / 2;
        assert!((center - 300).abs() < 40, "ink centered at {}", center);

        let min_y = inked.iter().map(|p| p.1).min().unwrap_or(0);
        let max_y = inked.iter().map(|p| p.1).max().unwrap_or(0);
        let middle = (min_y + max_y) as i32 / 2;
        assert!((middle - 100).abs() <= 12, "ink middle at {}", middle);
    }

    #[test]
    fn test_rasterize_fills_with_requested_color() {
        let book = FontBook::system();
        let Ok(font) = book.resolve("sans-serif") else {
            return;
        };
        let image = rasterize("Jane Doe", &font, Rgba::new(255, 0, 0, 255), &RasterConfig::default());

        let mut inked = 0;
        for pixel in image.pixels().filter(|p| p[3] > 0) {
            assert_eq!((pixel[0], pixel[1], pixel[2]), (255, 0, 0));
            inked += 1;
        }
        assert!(inked > 0);
        assert!(image.pixels().any(|p| p[3] == 255));
    }

    #[test]
    fn test_blend_over_transparent_keeps_color() {
        let mut pixel = image::Rgba([0, 0, 0, 0]);
        blend_over(&mut pixel, Rgba::new(30, 144, 255, 255), 0.5);
        assert_eq!(pixel, image::Rgba([30, 144, 255, 128]));

        blend_over(&mut pixel, Rgba::new(30, 144, 255, 255), 1.0);
        assert_eq!(pixel, image::Rgba([30, 144, 255, 255]));
    }
}
