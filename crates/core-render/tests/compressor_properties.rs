//! Compressor output against the uncompressed reference emitter.

use core_model::{Cell, Colour, ColourValue, Position, Style};
use core_render::{Compressor, Frame, encode_uncompressed};
use proptest::prelude::*;

fn colour_strategy() -> impl Strategy<Value = Colour> {
    let value = prop_oneof![
        Just(None),
        Just(Some(ColourValue::Default)),
        (0u8..8).prop_map(|n| Some(ColourValue::Named(n))),
        (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Some(ColourValue::Rgb(r, g, b))),
    ];
    (value.clone(), value).prop_map(|(fg, bg)| Colour::new(fg, bg))
}

fn style_strategy() -> impl Strategy<Value = Style> {
    (0u8..32).prop_map(Style::from_bits_truncate)
}

fn frame_strategy() -> impl Strategy<Value = Frame> {
    (1u16..6, 1u16..8).prop_flat_map(|(h, w)| {
        proptest::collection::vec(
            ("[a-z ]", colour_strategy(), style_strategy()),
            usize::from(h * w),
        )
        .prop_map(move |cells| {
            let mut iter = cells.into_iter();
            let rows = (1..=h)
                .map(|y| {
                    (1..=w)
                        .filter_map(|x| {
                            iter.next()
                                .map(|(v, c, s)| Cell::new(v, c, s, Position::new(y, x)))
                        })
                        .collect()
                })
                .collect();
            Frame::new(rows)
        })
    })
}

/// Drop every colour/style sequence that repeats the previous one.
fn strip_redundant(frame: &Frame) -> String {
    let mut out = String::new();
    let (mut last_colour, mut last_style): (Option<String>, Option<Style>) = (None, None);
    for cell in frame.cells().filter(|c| !c.is_continuation()) {
        out.push_str(&cell.position.escape());
        let colour = cell.colour.escape();
        if last_colour.as_ref() != Some(&colour) {
            out.push_str(&colour);
            last_colour = Some(colour);
        }
        if last_style != Some(cell.style) {
            out.push_str(&cell.style.escape());
            last_style = Some(cell.style);
        }
        out.push_str(&cell.value);
    }
    out
}

proptest! {
    #[test]
    fn compressed_equals_reference_with_repeats_removed(frame in frame_strategy()) {
        let compressed = Compressor::new().compress(&frame);
        prop_assert_eq!(compressed, strip_redundant(&frame));
    }

    #[test]
    fn compression_never_grows_output(frame in frame_strategy()) {
        let compressed = Compressor::encode(&frame);
        prop_assert!(compressed.len() <= encode_uncompressed(&frame).len());
    }

    #[test]
    fn uniform_frame_costs_one_pair(
        h in 1u16..6,
        w in 1u16..8,
        colour in colour_strategy(),
        style in style_strategy(),
    ) {
        let rows = (1..=h)
            .map(|y| (1..=w).map(|x| Cell::new("u", colour, style, Position::new(y, x))).collect())
            .collect();
        let mut c = Compressor::new();
        c.compress(&Frame::new(rows));
        prop_assert_eq!(c.stats().colour_codes, 1);
        prop_assert_eq!(c.stats().style_codes, 1);
        prop_assert_eq!(c.stats().cells, usize::from(h * w));
    }
}

#[test]
fn alternating_attributes_cost_one_pair_per_cell() {
    let a = Colour::new(Some(ColourValue::Named(1)), None);
    let b = Colour::new(Some(ColourValue::Named(2)), None);
    let row = (1..=6)
        .map(|x| {
            let (colour, style) = if x % 2 == 0 {
                (a, Style::BOLD)
            } else {
                (b, Style::UNDERLINE)
            };
            Cell::new("x", colour, style, Position::new(1, x))
        })
        .collect();
    let mut c = Compressor::new();
    c.compress(&Frame::new(vec![row]));
    assert_eq!(c.stats().colour_codes, 6);
    assert_eq!(c.stats().style_codes, 6);
}
