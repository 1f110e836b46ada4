use std::collections::HashSet;

use eframe_canvas_editor::element::common::parse_hex_color;
use eframe_canvas_editor::element::{Element, ShapeKind, StrokeTool};
use eframe_canvas_editor::error::TransitionError;
use eframe_canvas_editor::input::{InputEvent, PointerTarget};
use eframe_canvas_editor::state::EditorContext;
use eframe_canvas_editor::tools::ToolKind;
use egui::{Color32, Pos2, Vec2};
use pretty_assertions::assert_eq;

fn editor_with(tool: ToolKind) -> EditorContext {
    let mut editor = EditorContext::new(Vec2::new(800.0, 600.0));
    editor.set_tool(tool).unwrap();
    editor
}

fn gesture(editor: &mut EditorContext, points: &[(f32, f32)]) {
    let (first, rest) = points.split_first().unwrap();
    let start = Pos2::new(first.0, first.1);
    let target = editor.target_at(start);
    editor.handle_event(InputEvent::down(start, target)).unwrap();
    for (x, y) in rest {
        editor.handle_event(InputEvent::moved(Pos2::new(*x, *y))).unwrap();
    }
    let (x, y) = points[points.len() - 1];
    editor.handle_event(InputEvent::up(Pos2::new(x, y))).unwrap();
}

#[test]
fn test_rectangle_gesture_commits_one_shape() {
    let mut editor = editor_with(ToolKind::Rectangle);
    editor.set_brush_color(parse_hex_color("#ff0000").unwrap());

    gesture(&mut editor, &[(10.0, 10.0), (50.0, 80.0)]);

    let shapes = editor.document().shapes();
    assert_eq!(shapes.len(), 1);
    let shape = &shapes[0];
    assert_eq!(shape.position, Pos2::new(10.0, 10.0));
    let ShapeKind::Rectangle(rect) = &shape.kind else {
        panic!("expected a rectangle, got {}", shape.element_type());
    };
    assert_eq!(rect.size, Vec2::new(40.0, 70.0));
    assert_eq!(rect.style.fill, Some(Color32::from_rgb(255, 0, 0)));
    assert!(!editor.is_drawing());
    assert!(editor.snapshot().in_progress.is_none());
}

#[test]
fn test_pen_gesture_records_every_point() {
    let mut editor = editor_with(ToolKind::Pen);

    gesture(&mut editor, &[(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)]);

    let strokes: Vec<_> = editor.document().strokes().collect();
    assert_eq!(strokes.len(), 1);
    let ShapeKind::Stroke(stroke) = &strokes[0].kind else {
        panic!("expected a stroke");
    };
    assert_eq!(stroke.tool(), StrokeTool::Pen);
    assert_eq!(stroke.flat_points(), vec![0.0, 0.0, 5.0, 5.0, 10.0, 0.0]);
}

#[test]
fn test_stroke_grows_while_drawing() {
    let mut editor = editor_with(ToolKind::Brush);
    editor
        .handle_event(InputEvent::down(Pos2::new(1.0, 1.0), PointerTarget::Background))
        .unwrap();

    let mut last_len = 1;
    for i in 2..10 {
        editor.handle_event(InputEvent::moved(Pos2::new(i as f32, 1.0))).unwrap();
        let preview = editor.snapshot().in_progress.unwrap();
        let ShapeKind::Stroke(stroke) = &preview.kind else {
            panic!("expected a stroke preview");
        };
        assert_eq!(stroke.points().len(), last_len + 1);
        last_len = stroke.points().len();
    }
    assert!(editor.document().is_empty());
}

#[test]
fn test_pointer_leave_commits_like_release() {
    let mut editor = editor_with(ToolKind::Circle);
    editor
        .handle_event(InputEvent::down(Pos2::new(100.0, 100.0), PointerTarget::Background))
        .unwrap();
    editor.handle_event(InputEvent::moved(Pos2::new(140.0, 120.0))).unwrap();
    editor.handle_event(InputEvent::leave(Pos2::new(900.0, 120.0))).unwrap();

    assert_eq!(editor.document().shapes().len(), 1);
    assert!(!editor.is_drawing());
}

#[test]
fn test_negative_drag_keeps_signed_size() {
    let mut editor = editor_with(ToolKind::Rectangle);
    gesture(&mut editor, &[(100.0, 100.0), (60.0, 70.0)]);

    let shape = &editor.document().shapes()[0];
    assert_eq!(shape.size(), Some(Vec2::new(-40.0, -30.0)));
    assert!(shape.hit_test(Pos2::new(80.0, 85.0)));
    assert!(!shape.hit_test(Pos2::new(120.0, 120.0)));
}

#[test]
fn test_line_keeps_first_point_at_origin() {
    let mut editor = editor_with(ToolKind::Line);
    gesture(&mut editor, &[(20.0, 20.0), (30.0, 25.0), (60.0, 50.0)]);

    let shape = &editor.document().shapes()[0];
    let ShapeKind::Line(line) = &shape.kind else {
        panic!("expected a line");
    };
    assert_eq!(shape.position, Pos2::new(20.0, 20.0));
    assert_eq!(line.flat_points(), vec![0.0, 0.0, 40.0, 30.0]);
}

#[test]
fn test_degenerate_shape_is_committed() {
    let mut editor = editor_with(ToolKind::Rectangle);
    gesture(&mut editor, &[(10.0, 10.0)]);
    assert_eq!(editor.document().shapes()[0].size(), Some(Vec2::ZERO));
}

#[test]
fn test_each_gesture_adds_one_distinct_shape() {
    let mut editor = editor_with(ToolKind::Rectangle);
    let tools = [ToolKind::Rectangle, ToolKind::Circle, ToolKind::Line, ToolKind::Pen, ToolKind::Eraser];

    for (i, tool) in tools.iter().cycle().take(15).enumerate() {
        editor.set_tool(*tool).unwrap();
        let offset = i as f32 * 10.0;
        gesture(&mut editor, &[(offset, offset), (offset + 15.0, offset + 8.0)]);
        assert_eq!(editor.document().shapes().len(), i + 1);
    }

    let ids: HashSet<_> = editor.document().shapes().iter().map(|s| s.id().clone()).collect();
    assert_eq!(ids.len(), 15);
}

#[test]
fn test_tool_switch_rejected_mid_gesture() {
    let mut editor = editor_with(ToolKind::Pen);
    editor
        .handle_event(InputEvent::down(Pos2::new(5.0, 5.0), PointerTarget::Background))
        .unwrap();

    assert_eq!(
        editor.set_tool(ToolKind::Rectangle),
        Err(TransitionError::ToolBusy("Pen".to_owned()))
    );
    assert_eq!(editor.tool_kind(), ToolKind::Pen);

    editor.handle_event(InputEvent::up(Pos2::new(5.0, 5.0))).unwrap();
    editor.set_tool(ToolKind::Rectangle).unwrap();
}

#[test]
fn test_brush_read_when_gesture_begins() {
    let mut editor = editor_with(ToolKind::Brush);
    editor.set_brush_size(8.0);
    editor.set_brush_color(Color32::BLUE);
    editor
        .handle_event(InputEvent::down(Pos2::ZERO, PointerTarget::Background))
        .unwrap();
    editor.set_brush_color(Color32::GREEN);
    editor.handle_event(InputEvent::up(Pos2::new(4.0, 4.0))).unwrap();

    let ShapeKind::Stroke(stroke) = &editor.document().shapes()[0].kind else {
        panic!("expected a stroke");
    };
    assert_eq!(stroke.color(), Color32::BLUE);
    assert_eq!(stroke.width(), 16.0);
}

#[test]
fn test_eraser_paints_white() {
    let mut editor = editor_with(ToolKind::Eraser);
    editor.set_brush_color(Color32::RED);
    gesture(&mut editor, &[(0.0, 0.0), (5.0, 0.0)]);

    let ShapeKind::Stroke(stroke) = &editor.document().shapes()[0].kind else {
        panic!("expected a stroke");
    };
    assert_eq!(stroke.color(), Color32::WHITE);
}

#[test]
fn test_text_tool_with_installed_input() {
    let mut editor = editor_with(ToolKind::Text);
    editor.set_brush_size(6.0);
    editor.set_text_input(Box::new(|_at: Pos2| Some("Hello".to_owned())));

    editor
        .handle_event(InputEvent::down(Pos2::new(30.0, 40.0), PointerTarget::Background))
        .unwrap();

    let shape = &editor.document().shapes()[0];
    let ShapeKind::Text(text) = &shape.kind else {
        panic!("expected text");
    };
    assert_eq!(text.content, "Hello");
    assert_eq!(text.font_size, 24.0);
    assert_eq!(shape.position, Pos2::new(30.0, 40.0));
    assert!(!editor.is_drawing());
}

#[test]
fn test_text_tool_deferred_and_empty_input() {
    let mut editor = editor_with(ToolKind::Text);
    editor
        .handle_event(InputEvent::down(Pos2::new(5.0, 5.0), PointerTarget::Background))
        .unwrap();
    assert_eq!(editor.pending_text_request(), Some(Pos2::new(5.0, 5.0)));

    assert_eq!(editor.insert_text(Pos2::new(5.0, 5.0), "   "), Ok(None));
    assert!(editor.document().is_empty());
    assert_eq!(editor.pending_text_request(), None);
}

#[test]
fn test_move_without_gesture_is_ignored() {
    let mut editor = editor_with(ToolKind::Pen);
    editor.handle_event(InputEvent::moved(Pos2::new(3.0, 3.0))).unwrap();
    editor.handle_event(InputEvent::up(Pos2::new(3.0, 3.0))).unwrap();
    assert!(editor.document().is_empty());
}
