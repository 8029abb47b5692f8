use core_model::{Cell, Colour, ColourValue, Position, Style};
use core_render::{Compressor, Frame, encode_uncompressed};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn screen(height: u16, width: u16, striped: bool) -> Frame {
    let rows = (1..=height)
        .map(|y| {
            (1..=width)
                .map(|x| {
                    let colour = if striped && x % 2 == 0 {
                        Colour::new(Some(ColourValue::Rgb(200, 40, 40)), None)
                    } else {
                        Colour::default()
                    };
                    Cell::new("x", colour, Style::empty(), Position::new(y, x))
                })
                .collect()
        })
        .collect();
    Frame::new(rows)
}

fn bench_compressor(c: &mut Criterion) {
    let uniform = screen(50, 200, false);
    let striped = screen(50, 200, true);
    c.bench_function("compress_uniform_50x200", |b| {
        b.iter(|| Compressor::encode(black_box(&uniform)))
    });
    c.bench_function("compress_striped_50x200", |b| {
        b.iter(|| Compressor::encode(black_box(&striped)))
    });
    c.bench_function("uncompressed_50x200", |b| {
        b.iter(|| encode_uncompressed(black_box(&uniform)))
    });
}

criterion_group!(benches, bench_compressor);
criterion_main!(benches);
