//! End-to-end engine behaviour observed through the capture backend.

use core_geometry::{Border, Canvas, GeometrySpec};
use core_model::{Content, CursorMove, Position, RegionSpec};
use core_render::ClearOptions;
use core_state::Engine;
use pretty_assertions::assert_eq;

const ELEMENTS: [&str; 6] = ["barium", "carbon", "helium", "iodine", "nickel", "osmium"];

fn boxed(y: i32, x: i32, yn: i32, xn: i32) -> GeometrySpec {
    GeometrySpec {
        y: Some(y),
        x: Some(x),
        yn: Some(yn),
        xn: Some(xn),
        ..GeometrySpec::default()
    }
}

fn engine_with_elements() -> Engine {
    let mut engine = Engine::headless(Canvas::new(24, 80));
    engine
        .define(&RegionSpec::new("elements").geometry(boxed(1, 1, 3, 3)).lines(&ELEMENTS))
        .unwrap();
    engine
}

#[test]
fn refresh_promotes_and_renders_content() {
    let mut engine = engine_with_elements();
    let frame = engine.refresh("elements").unwrap().unwrap();
    assert_eq!(frame.text_rows(), vec!["bar", "car", "hel"]);
    let captured = engine.capture().unwrap().last_frame().unwrap();
    assert_eq!(captured, frame);
    assert!(!engine.last_output().is_empty());
}

#[test]
fn refresh_is_idempotent() {
    let mut engine = engine_with_elements();
    let first = engine.refresh("elements").unwrap();
    let second = engine.refresh("elements").unwrap();
    assert_eq!(first, second);
    assert_eq!(engine.capture().unwrap().frames_seen(), 2);
}

#[test]
fn refresh_without_content_blanks_the_area() {
    let mut engine = Engine::headless(Canvas::new(24, 80));
    engine
        .define(&RegionSpec::new("empty").geometry(boxed(2, 2, 3, 4)))
        .unwrap();
    let frame = engine.refresh("empty").unwrap().unwrap();
    assert_eq!(frame.text_rows(), vec!["   ", "   "]);
}

#[test]
fn scrolling_follows_cursor_offset() {
    let mut engine = engine_with_elements();
    engine.refresh("elements").unwrap();
    for _ in 0..3 {
        engine.move_cursor("elements", CursorMove::Down).unwrap();
        engine.move_cursor("elements", CursorMove::Right).unwrap();
    }
    let cursor = engine.cursor("elements").unwrap();
    assert_eq!((cursor.oy, cursor.ox), (3, 3));
    assert_eq!((cursor.y, cursor.x), (3, 3));
    let frame = engine.refresh("elements").unwrap().unwrap();
    assert_eq!(frame.text_rows(), vec!["arb", "eli", "odi"]);
}

#[test]
fn hidden_region_is_computed_but_not_output() {
    let mut engine = engine_with_elements();
    engine.hide_interface("elements").unwrap();
    let seen = engine.capture().unwrap().frames_seen();
    assert_eq!(engine.refresh("elements").unwrap(), None);
    assert_eq!(engine.capture().unwrap().frames_seen(), seen);
    // The pending content was still promoted while hidden.
    assert!(engine.buffer("elements").unwrap().front().is_some());

    assert!(engine.toggle_interface("elements").unwrap());
    assert!(engine.is_visible("elements"));
}

#[test]
fn hide_blanks_area_with_terminal_colours() {
    let mut engine = engine_with_elements();
    engine.refresh("elements").unwrap();
    engine.hide_interface("elements").unwrap();
    let frame = engine.capture().unwrap().last_frame().unwrap();
    assert_eq!(frame.text_rows(), vec!["   "; 3]);
}

#[test]
fn origin_lands_inside_the_border() {
    let mut engine = Engine::headless(Canvas::new(24, 80));
    engine
        .define(
            &RegionSpec::new("boxed")
                .geometry(boxed(4, 10, 9, 20))
                .border(Border::enabled())
                .lines(&ELEMENTS),
        )
        .unwrap();
    for _ in 0..4 {
        engine.move_cursor("boxed", CursorMove::Down).unwrap();
        engine.move_cursor("boxed", CursorMove::Right).unwrap();
    }
    let cursor = engine.move_cursor("boxed", CursorMove::Origin).unwrap();
    assert_eq!((cursor.y, cursor.x), (5, 11));
}

#[test]
fn repeated_down_stops_above_bottom_border() {
    let mut engine = Engine::headless(Canvas::new(24, 80));
    engine
        .define(
            &RegionSpec::new("boxed")
                .geometry(boxed(4, 10, 9, 20))
                .border(Border::enabled())
                .lines(&ELEMENTS),
        )
        .unwrap();
    for _ in 0..20 {
        engine.move_cursor("boxed", CursorMove::Down).unwrap();
    }
    assert_eq!(engine.cursor("boxed").unwrap().y, 8);
    assert_eq!(engine.cursor("boxed").unwrap().oy, 6);
}

#[test]
fn focused_region_carries_cursor_mark() {
    let mut engine = engine_with_elements();
    engine
        .define(&RegionSpec::new("other").geometry(boxed(5, 5, 6, 6)))
        .unwrap();
    let frame = engine.refresh_all().unwrap().unwrap();
    assert_eq!(frame.cursor.map(|m| m.position), Some(Position::new(1, 1)));

    assert_eq!(engine.focus_next().as_deref(), Some("other"));
    let frame = engine.refresh_cursor("other").unwrap().unwrap();
    assert_eq!(frame.cursor.map(|m| m.position), Some(Position::new(5, 5)));
    let frame = engine.refresh("elements").unwrap().unwrap();
    assert_eq!(frame.cursor, None);
}

#[test]
fn group_operations_touch_members_only() {
    let mut engine = Engine::headless(Canvas::new(24, 80));
    engine
        .define(&RegionSpec::new("a").group("left").geometry(boxed(1, 1, 1, 2)).lines(&["aa"]))
        .unwrap();
    engine
        .define(&RegionSpec::new("b").group("right").geometry(boxed(1, 5, 1, 6)).lines(&["bb"]))
        .unwrap();
    engine.hide_group("left").unwrap();
    assert!(!engine.is_visible("a"));
    assert!(engine.is_visible("b"));

    let frame = engine.show_group("left").unwrap().unwrap();
    assert_eq!(frame.text_rows(), vec!["aa"]);
    assert!(engine.is_visible("a"));
}

#[test]
fn clear_respects_border_option() {
    let mut engine = Engine::headless(Canvas::new(24, 80));
    engine
        .define(
            &RegionSpec::new("boxed")
                .geometry(boxed(1, 1, 4, 4))
                .border(Border::enabled()),
        )
        .unwrap();
    let inner = engine.clear("boxed", ClearOptions::default()).unwrap();
    assert_eq!(inner.cell_count(), 4);
    let whole = engine.clear("boxed", ClearOptions::whole_area()).unwrap();
    assert_eq!(whole.cell_count(), 16);
    let all = engine.clear_all();
    assert_eq!(all.cell_count(), 24 * 80);
}

#[test]
fn move_geometry_refuses_to_leave_canvas() {
    let mut engine = engine_with_elements();
    assert!(!engine.move_geometry("elements", -1, 0).unwrap());
    assert!(engine.move_geometry("elements", 2, 3).unwrap());
    let geometry = engine.geometry("elements").unwrap();
    assert_eq!((geometry.y, geometry.x, geometry.yn, geometry.xn), (3, 4, 5, 6));
    let cursor = engine.cursor("elements").unwrap();
    assert_eq!((cursor.y, cursor.x), (3, 4));
}

#[test]
fn maximise_and_restore() {
    let mut engine = engine_with_elements();
    let frame = engine.maximise("elements").unwrap().unwrap();
    assert_eq!(frame.cell_count(), 24 * 80);
    assert!(!engine.move_geometry("elements", 1, 0).unwrap());
    engine.unmaximise("elements").unwrap();
    assert_eq!(engine.geometry("elements").unwrap().yn, 3);
}

#[test]
fn resize_reresolves_and_reclamps() {
    let mut engine = Engine::headless(Canvas::new(24, 80));
    engine
        .define(
            &RegionSpec::new("full")
                .geometry(GeometrySpec {
                    maximised: true,
                    ..GeometrySpec::default()
                })
                .lines(&ELEMENTS),
        )
        .unwrap();
    engine.reposition_cursor("full", 20, 70).unwrap();
    engine.resize(Canvas::new(10, 40));
    let geometry = engine.geometry("full").unwrap();
    assert_eq!((geometry.yn, geometry.xn), (10, 40));
    let cursor = engine.cursor("full").unwrap();
    assert_eq!((cursor.y, cursor.x), (10, 40));
}

#[test]
fn shrinking_canvas_clips_fixed_regions() {
    let mut engine = Engine::headless(Canvas::new(24, 80));
    for (name, spec) in [("left", boxed(2, 2, 8, 12)), ("right", boxed(5, 30, 8, 38))] {
        engine
            .define(&RegionSpec::new(name).geometry(spec).lines(&ELEMENTS))
            .unwrap();
    }
    engine.resize(Canvas::new(6, 20));

    let left = engine.refresh("left").unwrap().unwrap();
    assert_eq!(left.rows.len(), 5);
    assert!(left.cells().all(|c| c.position.y <= 6 && c.position.x <= 20));

    let right = engine.refresh("right").unwrap().unwrap();
    assert_eq!(right.cell_count(), 0);
    let output = String::from_utf8_lossy(&engine.last_output()).into_owned();
    assert!(!output.contains("\x1b[5;30H"), "{output:?}");
}

#[test]
fn enqueue_replaces_pending_content() {
    let mut engine = engine_with_elements();
    engine
        .enqueue("elements", Content::from_text(&["one", "two"]))
        .unwrap();
    let frame = engine.refresh("elements").unwrap().unwrap();
    assert_eq!(frame.text_rows(), vec!["one", "two", "   "]);
    assert!(engine.enqueue("ghost", Content::default()).is_err());
}
