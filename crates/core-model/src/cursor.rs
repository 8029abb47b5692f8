//! Per-region cursor and its movement rules.
//!
//! `(y, x)` is the on-screen cell, always inside the region's border-adjusted
//! interior after a move. `(oy, ox)` is the scroll offset into content and
//! always lies in `[0, content height/width]`. Moves never mutate in place:
//! they return the next `Cursor`, which the caller stores.

use core_geometry::{Border, Canvas, Geometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Up,
    Down,
    Left,
    Right,
    /// Back to the top-left interior cell.
    Origin,
}

impl CursorMove {
    pub fn as_str(&self) -> &'static str {
        match self {
            CursorMove::Up => "up",
            CursorMove::Down => "down",
            CursorMove::Left => "left",
            CursorMove::Right => "right",
            CursorMove::Origin => "origin",
        }
    }
}

/// Everything a move is clamped against.
#[derive(Debug, Clone, Copy)]
pub struct CursorBounds<'a> {
    pub canvas: Canvas,
    pub geometry: &'a Geometry,
    pub border: &'a Border,
    pub content_height: usize,
    pub content_width: usize,
}

impl CursorBounds<'_> {
    fn rows(&self) -> (i32, i32) {
        let top = i32::from(self.geometry.top()) + i32::from(self.border.has_top());
        let bottom = i32::from(self.geometry.bottom()) - i32::from(self.border.has_bottom());
        (top, bottom.max(top))
    }

    fn columns(&self) -> (i32, i32) {
        let left = i32::from(self.geometry.left()) + i32::from(self.border.has_left());
        let right = i32::from(self.geometry.right()) - i32::from(self.border.has_right());
        (left, right.max(left))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub name: String,
    pub y: u16,
    pub x: u16,
    pub oy: u16,
    pub ox: u16,
    pub visible: bool,
}

impl Cursor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            y: 1,
            x: 1,
            oy: 0,
            ox: 0,
            visible: true,
        }
    }

    /// Cursor parked at the interior origin of its region.
    pub fn at_origin(name: impl Into<String>, bounds: &CursorBounds<'_>) -> Self {
        Self::new(name).moved(CursorMove::Origin, bounds)
    }

    pub fn moved(&self, mv: CursorMove, bounds: &CursorBounds<'_>) -> Cursor {
        let (dy, dx) = match mv {
            CursorMove::Up => (-1, 0),
            CursorMove::Down => (1, 0),
            CursorMove::Left => (0, -1),
            CursorMove::Right => (0, 1),
            CursorMove::Origin => (-i32::from(self.y), -i32::from(self.x)),
        };
        self.shifted(dy, dx, bounds)
    }

    /// Move by an arbitrary delta, with the same clamping as the single-step moves.
    pub fn shifted(&self, dy: i32, dx: i32, bounds: &CursorBounds<'_>) -> Cursor {
        let (top, bottom) = bounds.rows();
        let (left, right) = bounds.columns();
        let y = clamp_screen(i32::from(self.y) + dy, bounds.canvas.height).clamp(top, bottom);
        let x = clamp_screen(i32::from(self.x) + dx, bounds.canvas.width).clamp(left, right);
        let oy = clamp_offset(i32::from(self.oy) + dy, bounds.content_height);
        let ox = clamp_offset(i32::from(self.ox) + dx, bounds.content_width);
        Cursor {
            name: self.name.clone(),
            y: to_u16(y),
            x: to_u16(x),
            oy,
            ox,
            visible: self.visible,
        }
    }

    /// Place the cursor at `(y, x)` relative to the interior origin (0-based),
    /// clamped into the interior. The scroll offset is left alone.
    pub fn repositioned(&self, y: u16, x: u16, bounds: &CursorBounds<'_>) -> Cursor {
        let (top, bottom) = bounds.rows();
        let (left, right) = bounds.columns();
        Cursor {
            y: to_u16((top + i32::from(y)).clamp(top, bottom)),
            x: to_u16((left + i32::from(x)).clamp(left, right)),
            ..self.clone()
        }
    }

    /// Interior origin with offsets zeroed.
    pub fn reset(&self, bounds: &CursorBounds<'_>) -> Cursor {
        let (top, _) = bounds.rows();
        let (left, _) = bounds.columns();
        Cursor {
            y: to_u16(top),
            x: to_u16(left),
            oy: 0,
            ox: 0,
            ..self.clone()
        }
    }

    pub fn shown(&self) -> Cursor {
        Cursor {
            visible: true,
            ..self.clone()
        }
    }

    pub fn hidden(&self) -> Cursor {
        Cursor {
            visible: false,
            ..self.clone()
        }
    }

    pub fn toggled(&self) -> Cursor {
        Cursor {
            visible: !self.visible,
            ..self.clone()
        }
    }
}

fn clamp_screen(value: i32, extent: u16) -> i32 {
    value.clamp(1, i32::from(extent.max(1)))
}

fn clamp_offset(value: i32, extent: usize) -> u16 {
    let max = i32::try_from(extent).unwrap_or(i32::MAX);
    to_u16(value.clamp(0, max))
}

fn to_u16(value: i32) -> u16 {
    u16::try_from(value.max(0)).unwrap_or(u16::MAX)
}
