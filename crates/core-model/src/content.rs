//! Region content: lines of styled streams.
//!
//! Invariants:
//! - Content never crops or pads itself; the owning region's viewport does.
//! - Flattening resolves colour/style inheritance stream -> line -> region.
//! - Every grapheme becomes one `StyledChar`; wide graphemes are followed by
//!   one continuation entry per extra column.

use crate::{Colour, StyledChar, Style};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A run of text sharing presentation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stream {
    pub text: String,
    pub colour: Option<Colour>,
    pub style: Option<Style>,
}

impl Stream {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn colour(mut self, colour: Colour) -> Self {
        self.colour = Some(colour);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    pub streams: Vec<Stream>,
    pub colour: Option<Colour>,
    pub style: Option<Style>,
}

impl Line {
    pub fn new(streams: Vec<Stream>) -> Self {
        Self {
            streams,
            ..Self::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![Stream::new(text)])
    }

    pub fn colour(mut self, colour: Colour) -> Self {
        self.colour = Some(colour);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    /// Flatten to styled cells, inheriting unset presentation from the line
    /// and then from `base`.
    pub fn chars(&self, base_colour: Colour, base_style: Style) -> Vec<StyledChar> {
        let line_colour = self.colour.unwrap_or_default().inherit(base_colour);
        let line_style = self.style.unwrap_or(base_style);
        let mut out = Vec::new();
        for stream in &self.streams {
            let colour = stream.colour.unwrap_or_default().inherit(line_colour);
            let style = stream.style.unwrap_or(line_style);
            for grapheme in stream.text.graphemes(true) {
                if grapheme.chars().any(char::is_control) {
                    continue;
                }
                out.push(StyledChar::new(grapheme, colour, style));
                for _ in 1..grapheme.width() {
                    out.push(StyledChar::new("", colour, style));
                }
            }
        }
        out
    }

    /// Display columns occupied by the line.
    pub fn width(&self) -> usize {
        self.streams
            .iter()
            .flat_map(|s| s.text.graphemes(true))
            .filter(|g| !g.chars().any(char::is_control))
            .map(|g| g.width().max(1))
            .sum()
    }

    pub fn plain_text(&self) -> String {
        self.streams.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Content {
    pub lines: Vec<Line>,
}

impl Content {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    pub fn from_text<S: AsRef<str>>(lines: &[S]) -> Self {
        Self::new(lines.iter().map(|l| Line::text(l.as_ref())).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Widest line in display columns.
    pub fn width(&self) -> usize {
        self.lines.iter().map(Line::width).max().unwrap_or(0)
    }

    pub fn rows(&self, base_colour: Colour, base_style: Style) -> Vec<Vec<StyledChar>> {
        self.lines
            .iter()
            .map(|l| l.chars(base_colour, base_style))
            .collect()
    }
}
