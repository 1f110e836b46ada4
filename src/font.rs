//! Text layout shared by hit testing and the offscreen rasterizer.
//!
//! Glyphs come from the proportional font egui embeds, so measured text matches what
//! the live canvas shows closely enough for bounds and export.

use std::sync::OnceLock;

use ab_glyph::{Font, FontRef, PxScale, ScaleFont, point};
use egui::Vec2;
use log::warn;

use crate::element::common::TEXT_LINE_HEIGHT;

// Fallback advance per character when no font could be loaded
const FALLBACK_ADVANCE: f32 = 0.6;

static FONT_BYTES: OnceLock<Option<Vec<u8>>> = OnceLock::new();

fn font_bytes() -> Option<&'static [u8]> {
    FONT_BYTES
        .get_or_init(|| {
            let definitions = egui::FontDefinitions::default();
            let data = definitions
                .font_data
                .get("Ubuntu-Light")
                .or_else(|| definitions.font_data.values().next());
            if data.is_none() {
                warn!("⚠️ No embedded font available, text will not be rasterized");
            }
            data.map(|data| data.font.to_vec())
        })
        .as_deref()
}

fn default_font() -> Option<FontRef<'static>> {
    font_bytes().and_then(|bytes| FontRef::try_from_slice(bytes).ok())
}

/// Size of the laid-out text block at the given font size.
pub fn measure_text(content: &str, font_size: f32) -> Vec2 {
    let line_count = content.lines().count().max(1) as f32;
    let height = line_count * font_size * TEXT_LINE_HEIGHT;

    let width = match default_font() {
        Some(font) => {
            let scaled = font.as_scaled(PxScale::from(font_size));
            content
                .lines()
                .map(|line| line.chars().map(|c| scaled.h_advance(scaled.glyph_id(c))).sum::<f32>())
                .fold(0.0, f32::max)
        }
        None => content
            .lines()
            .map(|line| line.chars().count() as f32 * font_size * FALLBACK_ADVANCE)
            .fold(0.0, f32::max),
    };

    Vec2::new(width, height)
}

/// Rasterize text into a coverage mask. Returns `(width, height, coverage)` with one
/// byte per pixel, or `None` when no font is available or the text is empty.
pub fn rasterize_text(content: &str, font_size: f32) -> Option<(u32, u32, Vec<u8>)> {
    let font = default_font()?;
    let size = measure_text(content, font_size);
    let width = size.x.ceil().max(1.0) as u32;
    let height = size.y.ceil().max(1.0) as u32;
    if content.trim().is_empty() {
        return None;
    }

    let mut coverage = vec![0u8; (width * height) as usize];
    let px_scale = PxScale::from(font_size);
    let scaled = font.as_scaled(px_scale);
    let line_advance = font_size * TEXT_LINE_HEIGHT;

    for (line_index, line) in content.lines().enumerate() {
        let baseline = line_index as f32 * line_advance + scaled.ascent();
        let mut caret = point(0.0, baseline);
        for c in line.chars() {
            let id = scaled.glyph_id(c);
            let glyph = id.with_scale_and_position(px_scale, caret);
            caret.x += scaled.h_advance(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|x, y, c| {
                let px = bounds.min.x as i32 + x as i32;
                let py = bounds.min.y as i32 + y as i32;
                if px < 0 || py < 0 || px >= width as i32 || py >= height as i32 {
                    return;
                }
                let index = (py as u32 * width + px as u32) as usize;
                let value = (c.clamp(0.0, 1.0) * 255.0) as u8;
                coverage[index] = coverage[index].max(value);
            });
        }
    }

    Some((width, height, coverage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_grows_with_length() {
        let short = measure_text("Hi", 20.0);
        let long = measure_text("Hello there", 20.0);
        assert!(long.x > short.x);
        assert_eq!(short.y, long.y);
    }

    #[test]
    fn test_measure_counts_lines() {
        let one = measure_text("a", 10.0);
        let two = measure_text("a\nb", 10.0);
        assert!((two.y - 2.0 * one.y).abs() < 1e-4);
    }

    #[test]
    fn test_rasterize_produces_ink() {
        if let Some((width, height, coverage)) = rasterize_text("Ab", 32.0) {
            assert_eq!(coverage.len(), (width * height) as usize);
            assert!(coverage.iter().any(|&c| c > 0));
        }
    }
}
