//! Visible window over a region's content.
//!
//! The window is always exactly `height x width`. Its first content row and
//! column follow the cursor's scroll offset: the window scrolls just far
//! enough that offset row `oy` (and column `ox`) is the last one in view once
//! it passes the window size, and starts at the top-left otherwise.
//!
//! ```text
//! top  = max(0, oy - (height - 1))
//! left = max(0, ox - (width - 1))
//! ```
//!
//! Rows past the end of content become blank rows; columns past the end of a
//! line become blank cells. Longer content is cropped. Content never decides
//! its own rendered width.

use core_geometry::Geometry;
use core_model::{Cursor, StyledChar};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub height: usize,
    pub width: usize,
    pub oy: usize,
    pub ox: usize,
}

impl Viewport {
    pub fn new(height: usize, width: usize, oy: usize, ox: usize) -> Self {
        Self {
            height,
            width,
            oy,
            ox,
        }
    }

    /// Window sized to `interior` scrolled by `cursor`'s offset.
    pub fn for_region(interior: &Geometry, cursor: &Cursor) -> Self {
        Self::new(
            usize::from(interior.height()),
            usize::from(interior.width()),
            usize::from(cursor.oy),
            usize::from(cursor.ox),
        )
    }

    /// First content row shown.
    pub fn top(&self) -> usize {
        self.oy.saturating_sub(self.height.saturating_sub(1))
    }

    /// First content column shown.
    pub fn left(&self) -> usize {
        self.ox.saturating_sub(self.width.saturating_sub(1))
    }

    /// Crop/pad `rows` to the window, filling gaps with `blank`.
    pub fn window<T: Clone>(&self, rows: &[Vec<T>], blank: &T) -> Vec<Vec<T>> {
        let (top, left) = (self.top(), self.left());
        (0..self.height)
            .map(|i| {
                let row = rows.get(top + i).map(Vec::as_slice).unwrap_or(&[]);
                (0..self.width)
                    .map(|j| row.get(left + j).unwrap_or(blank).clone())
                    .collect()
            })
            .collect()
    }

    /// Character grid for plain text lines.
    pub fn chars<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Vec<char>> {
        let rows: Vec<Vec<char>> = lines.iter().map(|l| l.as_ref().chars().collect()).collect();
        self.window(&rows, &' ')
    }

    /// Styled window. Wide graphemes cut by either edge are replaced by
    /// blanks so no half glyph reaches the terminal.
    pub fn cells(&self, rows: &[Vec<StyledChar>], blank: &StyledChar) -> Vec<Vec<StyledChar>> {
        let left = self.left();
        let mut grid = self.window(rows, blank);
        for (i, out) in grid.iter_mut().enumerate() {
            let Some(source) = rows.get(self.top() + i) else {
                continue;
            };
            if let Some(first) = out.first_mut()
                && first.is_continuation()
            {
                *first = blank.clone();
            }
            let cut = source
                .get(left + self.width)
                .is_some_and(StyledChar::is_continuation);
            if cut && let Some(last) = out.last_mut() {
                *last = blank.clone();
            }
            for j in 1..out.len() {
                if out[j].is_continuation() && out[j - 1] == *blank {
                    out[j] = blank.clone();
                }
            }
        }
        grid
    }
}

/// Visible character grid for `lines` inside `geometry` at `cursor`'s offset.
pub fn visible<S: AsRef<str>>(lines: &[S], geometry: &Geometry, cursor: &Cursor) -> Vec<Vec<char>> {
    Viewport::for_region(geometry, cursor).chars(lines)
}
