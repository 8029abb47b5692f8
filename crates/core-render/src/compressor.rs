//! Frame -> escape-sequence byte stream.
//!
//! Cells are visited row-major. Each printable cell gets its absolute
//! position; the colour and style sequences are only written when they
//! differ from the last ones written. Colours are compared in resolved form,
//! so an unset side matches the terminal default. That state starts empty
//! and is carried across row boundaries for the whole frame, so a frame with
//! uniform presentation costs exactly one colour and one style sequence.
//!
//! Continuation cells (second column of a wide grapheme) are skipped: the
//! terminal advances over them when printing the leader.
//!
//! `encode_uncompressed` is the reference emitter that writes both sequences
//! for every cell; stripping its redundant sequences yields `encode`'s output
//! byte for byte.

use crate::esc;
use crate::frame::{CursorMark, Frame};
use core_model::{Cell, Colour, Style};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressionStats {
    pub cells: usize,
    pub colour_codes: usize,
    pub style_codes: usize,
    pub bytes: usize,
}

#[derive(Debug, Default)]
pub struct Compressor {
    colour: Option<Colour>,
    style: Option<Style>,
    stats: CompressionStats,
}

impl Compressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode one frame with fresh state.
    pub fn encode(frame: &Frame) -> Vec<u8> {
        Self::new().compress(frame).into_bytes()
    }

    pub fn compress(&mut self, frame: &Frame) -> String {
        let mut out = String::with_capacity(frame.cell_count() * 8);
        for cell in frame.cells() {
            if cell.is_continuation() {
                continue;
            }
            self.stats.cells += 1;
            out.push_str(&cell.position.escape());
            let colour = cell.colour.resolved();
            if self.colour != Some(colour) {
                self.colour = Some(colour);
                self.stats.colour_codes += 1;
                out.push_str(&cell.colour.escape());
            }
            if self.style != Some(cell.style) {
                self.style = Some(cell.style);
                self.stats.style_codes += 1;
                out.push_str(&cell.style.escape());
            }
            out.push_str(&cell.value);
        }
        push_cursor(&mut out, frame.cursor);
        self.stats.bytes += out.len();
        tracing::trace!(
            target: "render.compress",
            cells = self.stats.cells,
            colour_codes = self.stats.colour_codes,
            style_codes = self.stats.style_codes,
            bytes = out.len(),
            "frame_compressed"
        );
        out
    }

    pub fn stats(&self) -> CompressionStats {
        self.stats
    }
}

/// Reference emitter: both sequences on every printable cell.
pub fn encode_uncompressed(frame: &Frame) -> String {
    let mut out = String::new();
    for cell in frame.cells().filter(|c| !c.is_continuation()) {
        push_full_cell(&mut out, cell);
    }
    push_cursor(&mut out, frame.cursor);
    out
}

fn push_full_cell(out: &mut String, cell: &Cell) {
    out.push_str(&cell.position.escape());
    out.push_str(&cell.colour.escape());
    out.push_str(&cell.style.escape());
    out.push_str(&cell.value);
}

fn push_cursor(out: &mut String, mark: Option<CursorMark>) {
    if let Some(mark) = mark {
        out.push_str(&mark.position.escape());
        out.push_str(esc::cursor_visibility(mark.visible));
    }
}
