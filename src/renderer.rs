//! Live painting of a canvas snapshot with egui.
use egui::epaint::{Mesh, TextShape, Vertex};
use egui::{Color32, FontId, Painter, Pos2, Rect, Vec2};

use crate::element::{Shape, ShapeKind, ShapeStyle};
use crate::state::CanvasSnapshot;
use crate::texture_manager::TextureManager;
use crate::widgets::resize_handle::draw_selection;

const MAX_CACHED_TEXTURES: usize = 32;

#[derive(Debug)]
pub struct Renderer {
    textures: TextureManager,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            textures: TextureManager::new(MAX_CACHED_TEXTURES),
        }
    }

    pub fn textures(&self) -> &TextureManager {
        &self.textures
    }

    /// Paint `snapshot` with its canvas origin at `canvas_rect.min`.
    ///
    /// Background first, then shapes in insertion order, then the selection box of the
    /// selected shape.
    pub fn render(&mut self, painter: &Painter, canvas_rect: Rect, snapshot: &CanvasSnapshot) {
        self.textures.begin_frame();
        let painter = painter.with_clip_rect(canvas_rect.intersect(painter.clip_rect()));
        let origin = canvas_rect.min.to_vec2();

        painter.rect_filled(canvas_rect, 0.0, Color32::WHITE);

        if let Some(background) = &snapshot.background {
            let texture = self.textures.texture_for(background, painter.ctx());
            painter.image(
                texture,
                canvas_rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        for shape in snapshot.visible_shapes() {
            self.paint_shape(&painter, shape, origin);
        }

        if let Some(shape) = snapshot.selected_shape() {
            draw_selection(&painter, shape.corners().map(|corner| corner + origin));
        }
    }

    fn paint_shape(&mut self, painter: &Painter, shape: &Shape, origin: Vec2) {
        let to_screen = |local: Pos2| shape.local_to_canvas(local) + origin;

        match &shape.kind {
            ShapeKind::Rectangle(rect) => {
                let outline = rect_outline(rect.local_rect()).map(to_screen).to_vec();
                paint_polygon(painter, outline, &rect.style);
            }
            ShapeKind::Circle(circle) => {
                let center = to_screen(Pos2::ZERO);
                let radius = circle.radius() * shape.transform.scale.x.abs();
                painter.circle(
                    center,
                    radius,
                    circle.style.fill.unwrap_or(Color32::TRANSPARENT),
                    outline_stroke(&circle.style),
                );
            }
            ShapeKind::Line(line) => {
                let points = line.local_points().into_iter().map(to_screen).collect();
                painter.add(egui::Shape::line(points, egui::Stroke::new(line.width, line.color)));
            }
            ShapeKind::Stroke(stroke) => {
                let points: Vec<Pos2> = stroke.points().iter().copied().map(to_screen).collect();
                let pen = egui::Stroke::new(stroke.width(), stroke.color());
                if let [point] = points.as_slice() {
                    painter.circle_filled(*point, stroke.width() / 2.0, stroke.color());
                } else {
                    painter.add(egui::Shape::line(points, pen));
                }
            }
            ShapeKind::Text(text) => {
                let font_size = text.font_size * shape.transform.scale.y.abs();
                let galley = painter.layout_no_wrap(text.content.clone(), FontId::proportional(font_size), text.fill);
                let text_shape = TextShape::new(to_screen(Pos2::ZERO), galley, text.fill)
                    .with_angle(shape.transform.rotation.to_radians());
                painter.add(text_shape);
            }
            ShapeKind::Image(image) => {
                let texture = self.textures.texture_for(&image.bitmap, painter.ctx());
                let mut mesh = Mesh::with_texture(texture);
                // Corners follow the signed size, so negative sizes mirror the texture
                let corners = [
                    (Pos2::ZERO, Pos2::new(0.0, 0.0)),
                    (Pos2::new(image.size.x, 0.0), Pos2::new(1.0, 0.0)),
                    (image.size.to_pos2(), Pos2::new(1.0, 1.0)),
                    (Pos2::new(0.0, image.size.y), Pos2::new(0.0, 1.0)),
                ];
                for (local, uv) in corners {
                    mesh.vertices.push(Vertex {
                        pos: to_screen(local),
                        uv,
                        color: Color32::WHITE,
                    });
                }
                mesh.add_triangle(0, 1, 2);
                mesh.add_triangle(0, 2, 3);
                painter.add(egui::Shape::mesh(mesh));
            }
        }
    }
}

fn rect_outline(rect: Rect) -> [Pos2; 4] {
    [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()]
}

fn outline_stroke(style: &ShapeStyle) -> egui::Stroke {
    match style.stroke {
        Some(color) => egui::Stroke::new(style.stroke_width(), color),
        None => egui::Stroke::NONE,
    }
}

fn paint_polygon(painter: &Painter, points: Vec<Pos2>, style: &ShapeStyle) {
    painter.add(egui::Shape::convex_polygon(
        points,
        style.fill.unwrap_or(Color32::TRANSPARENT),
        outline_stroke(style),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::element::{Bitmap, Stroke, StrokeTool, factory};
    use image::{Rgba, RgbaImage};
    use std::sync::Arc;

    fn painter(ctx: &egui::Context) -> Painter {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(200.0, 200.0));
        Painter::new(ctx.clone(), egui::LayerId::background(), rect)
    }

    #[test]
    fn test_render_every_variant() {
        let ctx = egui::Context::default();
        let bitmap = Bitmap::from_rgba(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 255, 255]))).unwrap();
        let mut stroke = Stroke::begin(StrokeTool::Pen, Pos2::new(1.0, 1.0), Color32::BLACK, 5.0);
        stroke.add_point(Pos2::new(20.0, 20.0));

        let mut rotated = factory::create_rectangle(Pos2::new(50.0, 50.0), Vec2::new(30.0, 20.0), Color32::RED, 2.0);
        rotated.transform.rotation = 30.0;
        let shapes = vec![
            rotated,
            factory::create_circle(Pos2::new(100.0, 100.0), Vec2::new(40.0, 0.0), Color32::GREEN, 1.0),
            factory::create_line(Pos2::new(10.0, 150.0), Vec2::new(60.0, 0.0), Color32::BLACK, 3.0),
            factory::create_text(Pos2::new(120.0, 20.0), "hello", 20.0, Color32::BLACK),
            factory::create_image(Pos2::new(150.0, 150.0), bitmap.clone()),
            factory::create_stroke(stroke),
        ];
        let selected = shapes[0].id().clone();
        let snapshot = CanvasSnapshot {
            size: Vec2::new(200.0, 200.0),
            background: Some(bitmap),
            shapes: Arc::new(shapes),
            in_progress: None,
            selected: Some(selected),
        };

        let mut renderer = Renderer::new();
        let rect = Rect::from_min_size(Pos2::new(10.0, 10.0), snapshot.size);
        // Fonts only exist inside a frame
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            renderer.render(&painter(ctx), rect, &snapshot);
        });

        // Background and image share one bitmap, so one texture
        assert_eq!(renderer.textures().cache_size(), 1);
    }

    #[test]
    fn test_outline_follows_rotation() {
        let mut shape = factory::create_rectangle(Pos2::new(10.0, 10.0), Vec2::new(20.0, 10.0), Color32::RED, 0.0);
        shape.transform.rotation = 90.0;
        let ShapeKind::Rectangle(rect) = &shape.kind else {
            unreachable!()
        };
        let outline = rect_outline(rect.local_rect()).map(|p| shape.local_to_canvas(p));
        assert_eq!(outline[0], Pos2::new(10.0, 10.0));
        assert!((outline[1] - Pos2::new(10.0, 30.0)).length() < 1e-3);
    }
}
