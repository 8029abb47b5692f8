//! Region borders.
//!
//! Each enabled side consumes one row or column of the region's geometry;
//! `interior` returns what is left for content. `ring` produces the glyph
//! cells for the outer ring in row-major order, with the optional title laid
//! over the top edge.

use crate::Geometry;
use unicode_segmentation::UnicodeSegmentation;

/// Corner and edge characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            top_left: '┌',
            top_right: '┐',
            bottom_left: '└',
            bottom_right: '┘',
            horizontal: '─',
            vertical: '│',
        }
    }
}

/// One cell of the border ring, in absolute screen coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderGlyph {
    pub y: u16,
    pub x: u16,
    pub value: String,
}

impl BorderGlyph {
    fn new(y: u16, x: u16, value: impl Into<String>) -> Self {
        Self {
            y,
            x,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Border {
    pub enabled: bool,
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
    pub glyphs: Glyphs,
    pub title: Option<String>,
}

impl Default for Border {
    fn default() -> Self {
        Self::disabled()
    }
}

impl Border {
    /// Null border: no sides, interior equals the geometry.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            top: false,
            bottom: false,
            left: false,
            right: false,
            glyphs: Glyphs::default(),
            title: None,
        }
    }

    /// All four sides on with default glyphs.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            top: true,
            bottom: true,
            left: true,
            right: true,
            ..Self::disabled()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// True only when explicitly enabled with at least one side on.
    pub fn is_enabled(&self) -> bool {
        self.enabled && (self.top || self.bottom || self.left || self.right)
    }

    pub fn has_top(&self) -> bool {
        self.is_enabled() && self.top
    }

    pub fn has_bottom(&self) -> bool {
        self.is_enabled() && self.bottom
    }

    pub fn has_left(&self) -> bool {
        self.is_enabled() && self.left
    }

    pub fn has_right(&self) -> bool {
        self.is_enabled() && self.right
    }

    /// Usable content rectangle. Boxes too small to hold any interior
    /// collapse to a single row/column rather than inverting.
    pub fn interior(&self, geometry: &Geometry) -> Geometry {
        let mut inner = geometry.clone();
        if !self.is_enabled() {
            return inner;
        }
        inner.y = geometry.y + u16::from(self.top);
        inner.x = geometry.x + u16::from(self.left);
        inner.yn = geometry
            .yn
            .saturating_sub(u16::from(self.bottom))
            .max(inner.y);
        inner.xn = geometry
            .xn
            .saturating_sub(u16::from(self.right))
            .max(inner.x);
        inner
    }

    /// Title as it appears on the top edge: truncated to `width - 4`
    /// graphemes and padded with one space on each side.
    pub fn rendered_title(&self, geometry: &Geometry) -> Option<String> {
        let title = self.title.as_deref().filter(|t| !t.is_empty())?;
        let room = usize::from(geometry.width()).saturating_sub(4);
        if room == 0 {
            return None;
        }
        let truncated: String = title.graphemes(true).take(room).collect();
        Some(format!(" {truncated} "))
    }

    /// Glyph cells for the outer ring, row-major. Empty when disabled.
    pub fn ring(&self, geometry: &Geometry) -> Vec<BorderGlyph> {
        let mut out = Vec::new();
        if !self.is_enabled() {
            return out;
        }
        let g = &self.glyphs;
        if self.top {
            out.extend(self.edge_row(
                geometry,
                geometry.y,
                g.top_left,
                g.top_right,
            ));
            if let Some(title) = self.rendered_title(geometry) {
                let start = geometry.x + 1;
                for (offset, grapheme) in title.graphemes(true).enumerate() {
                    let x = start + offset as u16;
                    if let Some(cell) = out
                        .iter_mut()
                        .find(|cell| cell.y == geometry.y && cell.x == x)
                    {
                        cell.value = grapheme.to_string();
                    }
                }
            }
        }
        let first = geometry.y + u16::from(self.top);
        let last = geometry.yn.saturating_sub(u16::from(self.bottom));
        for y in first..=last {
            if y < geometry.y || y > geometry.yn {
                continue;
            }
            if self.left {
                out.push(BorderGlyph::new(y, geometry.x, g.vertical));
            }
            if self.right && !(self.left && geometry.xn == geometry.x) {
                out.push(BorderGlyph::new(y, geometry.xn, g.vertical));
            }
        }
        if self.bottom && !(self.top && geometry.yn == geometry.y) {
            out.extend(self.edge_row(
                geometry,
                geometry.yn,
                g.bottom_left,
                g.bottom_right,
            ));
        }
        out
    }

    fn edge_row(
        &self,
        geometry: &Geometry,
        y: u16,
        left_corner: char,
        right_corner: char,
    ) -> Vec<BorderGlyph> {
        (geometry.x..=geometry.xn)
            .map(|x| {
                let ch = if x == geometry.x && self.left {
                    left_corner
                } else if x == geometry.xn && self.right {
                    right_corner
                } else {
                    self.glyphs.horizontal
                };
                BorderGlyph::new(y, x, ch)
            })
            .collect()
    }
}
