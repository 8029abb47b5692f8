//! Viewport windows over the six-element fixture used across the render tests.

use core_geometry::{Canvas, Geometry, GeometrySpec};
use core_model::Cursor;
use core_render::visible;
use pretty_assertions::assert_eq;

const LINES: [&str; 6] = ["barium", "carbon", "helium", "iodine", "nickel", "osmium"];

fn geometry() -> Geometry {
    Geometry::resolve(
        GeometrySpec {
            y: Some(1),
            yn: Some(3),
            x: Some(1),
            xn: Some(3),
            ..GeometrySpec::default()
        },
        Canvas::new(24, 80),
    )
}

fn at(oy: u16, ox: u16) -> Cursor {
    Cursor {
        oy,
        ox,
        ..Cursor::new("elements")
    }
}

fn grid(rows: &[&str]) -> Vec<Vec<char>> {
    rows.iter().map(|r| r.chars().collect()).collect()
}

#[test]
fn offset_inside_content() {
    assert_eq!(
        visible(&LINES, &geometry(), &at(3, 3)),
        grid(&["arb", "eli", "odi"])
    );
}

#[test]
fn offset_beyond_content_height() {
    assert_eq!(
        visible(&LINES, &geometry(), &at(7, 3)),
        grid(&["smi", "   ", "   "])
    );
}

#[test]
fn offset_near_both_ends() {
    assert_eq!(
        visible(&LINES, &geometry(), &at(6, 6)),
        grid(&["el ", "um ", "   "])
    );
}

#[test]
fn offset_beyond_both_ends() {
    assert_eq!(
        visible(&LINES, &geometry(), &at(7, 7)),
        grid(&["m  ", "   ", "   "])
    );
}

#[test]
fn offset_beyond_width_only() {
    assert_eq!(
        visible(&LINES, &geometry(), &at(3, 7)),
        grid(&["n  ", "m  ", "e  "])
    );
}

#[test]
fn zero_offset_shows_top_left() {
    assert_eq!(
        visible(&LINES, &geometry(), &at(0, 0)),
        grid(&["bar", "car", "hel"])
    );
}

#[test]
fn content_smaller_than_region_is_padded() {
    let geo = Geometry::resolve(
        GeometrySpec {
            height: Some(4),
            width: Some(8),
            ..GeometrySpec::default()
        },
        Canvas::new(24, 80),
    );
    assert_eq!(
        visible(&["ab", "cd"], &geo, &at(0, 0)),
        grid(&["ab      ", "cd      ", "        ", "        "])
    );
}

#[test]
fn taller_but_narrower_content() {
    let geo = Geometry::resolve(
        GeometrySpec {
            height: Some(2),
            width: Some(8),
            ..GeometrySpec::default()
        },
        Canvas::new(24, 80),
    );
    assert_eq!(
        visible(&LINES, &geo, &at(0, 0)),
        grid(&["barium  ", "carbon  "])
    );
}

#[test]
fn shorter_but_wider_content() {
    let geo = Geometry::resolve(
        GeometrySpec {
            height: Some(8),
            width: Some(2),
            ..GeometrySpec::default()
        },
        Canvas::new(24, 80),
    );
    let out = visible(&LINES, &geo, &at(0, 0));
    assert_eq!(out.len(), 8);
    assert_eq!(out[0], vec!['b', 'a']);
    assert_eq!(out[6], vec![' ', ' ']);
}
