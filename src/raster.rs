//! Software compositing of a canvas snapshot into an RGBA buffer.
//!
//! Every pixel inside a shape's bounds is mapped back into shape-local space, so
//! rotated and negatively sized shapes need no special casing. Edges get one pixel of
//! coverage-based anti-aliasing.
use egui::{Color32, Pos2, Rect, Vec2};
use image::{Rgba, RgbaImage};

use crate::element::common::distance_to_polyline;
use crate::element::{Element, Shape, ShapeKind};
use crate::error::BitmapError;
use crate::font;
use crate::state::CanvasSnapshot;

const CANVAS_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Pixel dimensions of a canvas of `size` at `pixel_ratio`
pub fn output_size(size: Vec2, pixel_ratio: f32) -> (u32, u32) {
    let width = (size.x * pixel_ratio).round().max(1.0) as u32;
    let height = (size.y * pixel_ratio).round().max(1.0) as u32;
    (width, height)
}

/// Composite background, committed shapes and any in-progress shape over white
pub fn render(snapshot: &CanvasSnapshot, pixel_ratio: f32) -> Result<RgbaImage, BitmapError> {
    if !(pixel_ratio.is_finite() && pixel_ratio > 0.0) {
        return Err(BitmapError::InvalidDimensions { width: 0, height: 0 });
    }
    let (width, height) = output_size(snapshot.size, pixel_ratio);
    let mut canvas = RgbaImage::from_pixel(width, height, CANVAS_FILL);

    if let Some(background) = &snapshot.background {
        // Stretched over the whole canvas
        let source = background.pixels();
        for (x, y, pixel) in canvas.enumerate_pixels_mut() {
            let sx = (x as u64 * source.width() as u64 / width as u64) as u32;
            let sy = (y as u64 * source.height() as u64 / height as u64) as u32;
            blend(pixel, *source.get_pixel(sx, sy), 1.0);
        }
    }

    for shape in snapshot.visible_shapes() {
        paint_shape(&mut canvas, shape, pixel_ratio);
    }

    Ok(canvas)
}

fn paint_shape(canvas: &mut RgbaImage, shape: &Shape, ratio: f32) {
    let bounds = shape.rect().expand(1.0);
    let pixel_bounds = Rect::from_min_max(
        Pos2::new((bounds.min.x * ratio).floor().max(0.0), (bounds.min.y * ratio).floor().max(0.0)),
        Pos2::new(
            (bounds.max.x * ratio).ceil().min(canvas.width() as f32),
            (bounds.max.y * ratio).ceil().min(canvas.height() as f32),
        ),
    );
    if !pixel_bounds.is_positive() {
        return;
    }

    let unit = 1.0 / ratio;
    let painter = ShapeSampler::new(shape, ratio);

    for y in pixel_bounds.min.y as u32..pixel_bounds.max.y as u32 {
        for x in pixel_bounds.min.x as u32..pixel_bounds.max.x as u32 {
            let canvas_pos = Pos2::new((x as f32 + 0.5) * unit, (y as f32 + 0.5) * unit);
            let local = shape.canvas_to_local(canvas_pos);
            let pixel = canvas.get_pixel_mut(x, y);
            painter.paint(pixel, local, unit);
        }
    }
}

/// Per-shape data prepared once before the pixel loop
enum ShapeSampler<'a> {
    Geometry(&'a Shape),
    Text {
        mask: Option<(u32, u32, Vec<u8>)>,
        ratio: f32,
        color: Color32,
    },
}

impl<'a> ShapeSampler<'a> {
    fn new(shape: &'a Shape, ratio: f32) -> Self {
        match &shape.kind {
            ShapeKind::Text(text) => ShapeSampler::Text {
                mask: font::rasterize_text(&text.content, text.font_size * ratio),
                ratio,
                color: text.fill,
            },
            _ => ShapeSampler::Geometry(shape),
        }
    }

    fn paint(&self, pixel: &mut Rgba<u8>, local: Pos2, unit: f32) {
        match self {
            ShapeSampler::Text { mask, ratio, color } => {
                let Some((width, height, coverage)) = mask else {
                    return;
                };
                let mx = (local.x * ratio).floor();
                let my = (local.y * ratio).floor();
                if mx < 0.0 || my < 0.0 || mx >= *width as f32 || my >= *height as f32 {
                    return;
                }
                let value = coverage[(my as u32 * width + mx as u32) as usize];
                blend(pixel, to_rgba(*color), value as f32 / 255.0);
            }
            ShapeSampler::Geometry(shape) => paint_geometry(pixel, &shape.kind, local, unit),
        }
    }
}

fn paint_geometry(pixel: &mut Rgba<u8>, kind: &ShapeKind, local: Pos2, unit: f32) {
    match kind {
        ShapeKind::Rectangle(rect) => {
            let distance = signed_box_distance(rect.local_rect(), local);
            fill_and_stroke(pixel, distance, rect.style.fill, rect.style.stroke, rect.style.stroke_width(), unit);
        }
        ShapeKind::Circle(circle) => {
            let distance = local.to_vec2().length() - circle.radius();
            fill_and_stroke(
                pixel,
                distance,
                circle.style.fill,
                circle.style.stroke,
                circle.style.stroke_width(),
                unit,
            );
        }
        ShapeKind::Line(line) => {
            let distance = distance_to_polyline(local, &line.local_points()) - line.width / 2.0;
            blend(pixel, to_rgba(line.color), coverage(distance, unit));
        }
        ShapeKind::Stroke(stroke) => {
            let distance = distance_to_polyline(local, stroke.points()) - stroke.width() / 2.0;
            blend(pixel, to_rgba(stroke.color()), coverage(distance, unit));
        }
        ShapeKind::Image(image) => {
            if image.size.x == 0.0 || image.size.y == 0.0 {
                return;
            }
            // Negative sizes mirror the bitmap
            let u = local.x / image.size.x;
            let v = local.y / image.size.y;
            if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                return;
            }
            let source = image.bitmap.pixels();
            let sx = ((u * source.width() as f32) as u32).min(source.width() - 1);
            let sy = ((v * source.height() as f32) as u32).min(source.height() - 1);
            blend(pixel, *source.get_pixel(sx, sy), 1.0);
        }
        ShapeKind::Text(_) => {}
    }
}

fn fill_and_stroke(
    pixel: &mut Rgba<u8>,
    distance: f32,
    fill: Option<Color32>,
    stroke: Option<Color32>,
    stroke_width: f32,
    unit: f32,
) {
    if let Some(fill) = fill {
        blend(pixel, to_rgba(fill), coverage(distance, unit));
    }
    if let Some(stroke) = stroke {
        if stroke_width > 0.0 {
            // Stroke is centred on the outline
            blend(pixel, to_rgba(stroke), coverage(distance.abs() - stroke_width / 2.0, unit));
        }
    }
}

/// Signed distance to a box: negative inside, positive outside
fn signed_box_distance(rect: Rect, p: Pos2) -> f32 {
    let dx = (rect.min.x - p.x).max(p.x - rect.max.x);
    let dy = (rect.min.y - p.y).max(p.y - rect.max.y);
    if dx <= 0.0 && dy <= 0.0 {
        dx.max(dy)
    } else {
        Vec2::new(dx.max(0.0), dy.max(0.0)).length()
    }
}

/// Pixel coverage from a signed distance, with a one-pixel ramp
fn coverage(distance: f32, unit: f32) -> f32 {
    (0.5 - distance / unit).clamp(0.0, 1.0)
}

fn to_rgba(color: Color32) -> Rgba<u8> {
    Rgba(color.to_srgba_unmultiplied())
}

/// Source-over blend of `src` scaled by `coverage` onto `dst`
fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f32) {
    let alpha = (src.0[3] as f32 / 255.0) * coverage;
    if alpha <= 0.0 {
        return;
    }
    let dst_alpha = dst.0[3] as f32 / 255.0;
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    for channel in 0..3 {
        let s = src.0[channel] as f32;
        let d = dst.0[channel] as f32;
        let value = (s * alpha + d * dst_alpha * (1.0 - alpha)) / out_alpha.max(f32::EPSILON);
        dst.0[channel] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_alpha * 255.0).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::common::rotate;
    use crate::element::{Bitmap, Stroke, StrokeTool, factory};
    use std::sync::Arc;

    fn snapshot(shapes: Vec<Shape>, background: Option<Bitmap>) -> CanvasSnapshot {
        CanvasSnapshot {
            size: Vec2::new(100.0, 80.0),
            background,
            shapes: Arc::new(shapes),
            in_progress: None,
            selected: None,
        }
    }

    #[test]
    fn test_empty_canvas_is_white_at_ratio() {
        let image = render(&snapshot(vec![], None), 2.0).unwrap();
        assert_eq!(image.dimensions(), (200, 160));
        assert!(image.pixels().all(|p| *p == CANVAS_FILL));
    }

    #[test]
    fn test_negative_rectangle_is_painted() {
        let shape = factory::create_rectangle(Pos2::new(60.0, 60.0), Vec2::new(-40.0, -30.0), Color32::RED, 1.0);
        let image = render(&snapshot(vec![shape], None), 1.0).unwrap();
        assert_eq!(image.get_pixel(40, 45).0, [255, 0, 0, 255]);
        assert_eq!(*image.get_pixel(70, 70), CANVAS_FILL);
    }

    #[test]
    fn test_later_shapes_paint_over_earlier() {
        let below = factory::create_rectangle(Pos2::ZERO, Vec2::new(50.0, 50.0), Color32::RED, 0.0);
        let above = factory::create_circle(Pos2::new(25.0, 25.0), Vec2::new(20.0, 0.0), Color32::BLUE, 0.0);
        let image = render(&snapshot(vec![below, above], None), 1.0).unwrap();
        assert_eq!(image.get_pixel(25, 25).0, [0, 0, 255, 255]);
        assert_eq!(image.get_pixel(5, 5).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_eraser_paints_white_over_shape() {
        let below = factory::create_rectangle(Pos2::ZERO, Vec2::new(50.0, 50.0), Color32::RED, 0.0);
        let mut stroke = Stroke::begin(StrokeTool::Eraser, Pos2::new(0.0, 20.0), Color32::BLACK, 6.0);
        stroke.add_point(Pos2::new(50.0, 20.0));
        let image = render(&snapshot(vec![below, factory::create_stroke(stroke)], None), 1.0).unwrap();
        assert_eq!(*image.get_pixel(25, 20), CANVAS_FILL);
        assert_eq!(image.get_pixel(25, 40).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_background_is_stretched() {
        let bitmap = Bitmap::from_rgba(RgbaImage::from_pixel(2, 2, Rgba([0, 255, 0, 255]))).unwrap();
        let image = render(&snapshot(vec![], Some(bitmap)), 1.0).unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [0, 255, 0, 255]);
        assert_eq!(image.get_pixel(99, 79).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_rotated_rectangle() {
        let mut shape = factory::create_rectangle(Pos2::new(50.0, 10.0), Vec2::new(30.0, 10.0), Color32::RED, 0.0);
        shape.transform.rotation = 90.0;
        let sample = Pos2::new(50.0, 10.0) + rotate(Vec2::new(20.0, 5.0), 90.0);
        let image = render(&snapshot(vec![shape], None), 1.0).unwrap();
        assert_eq!(image.get_pixel(sample.x as u32, sample.y as u32).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        assert!(render(&snapshot(vec![], None), 0.0).is_err());
    }
}
