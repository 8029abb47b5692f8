//! Frame assembly for a single region.
//!
//! A region frame covers the region's full geometry: border ring first, then
//! the viewport window laid over the interior, with every cell carrying its
//! absolute position. Frames for several regions can be concatenated with
//! [`Frame::extend`]; each row stays rectangular within its own region.
//! Geometry may reach past the canvas; composed frames are clipped to it, so
//! no cell is ever addressed off screen.

use crate::viewport::Viewport;
use core_geometry::{Border, Canvas, Geometry};
use core_model::{Cell, Content, Cursor, Position, Region, StyledChar};

/// Where to leave the terminal cursor once the cells are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorMark {
    pub position: Position,
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub rows: Vec<Vec<Cell>>,
    pub cursor: Option<CursorMark>,
}

impl Frame {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows, cursor: None }
    }

    /// Frame with no cells and only a cursor mark (cursor-only refresh).
    pub fn cursor_only(mark: CursorMark) -> Self {
        Self {
            rows: Vec::new(),
            cursor: Some(mark),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty) && self.cursor.is_none()
    }

    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flatten()
    }

    /// Append `other`'s rows; its cursor mark replaces ours when present.
    pub fn extend(&mut self, other: Frame) {
        self.rows.extend(other.rows);
        if other.cursor.is_some() {
            self.cursor = other.cursor;
        }
    }

    /// Drop every cell outside `canvas` (and rows left empty); a cursor mark
    /// off screen is pulled back onto its nearest edge.
    pub fn clip(mut self, canvas: Canvas) -> Frame {
        for row in &mut self.rows {
            row.retain(|cell| canvas.contains(cell.position.y, cell.position.x));
        }
        self.rows.retain(|row| !row.is_empty());
        if let Some(mark) = &mut self.cursor {
            mark.position = Position::new(
                mark.position.y.clamp(1, canvas.height.max(1)),
                mark.position.x.clamp(1, canvas.width.max(1)),
            );
        }
        self
    }

    /// Plain text of each row, continuation cells skipped.
    pub fn text_rows(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.value.as_str()).collect())
            .collect()
    }
}

/// Everything needed to draw one region.
#[derive(Debug, Clone, Copy)]
pub struct RegionView<'a> {
    pub region: &'a Region,
    pub geometry: &'a Geometry,
    pub border: &'a Border,
    pub cursor: &'a Cursor,
    pub canvas: Canvas,
}

impl RegionView<'_> {
    pub fn blank(&self) -> StyledChar {
        StyledChar::blank(self.region.colour, self.region.style)
    }

    /// Compose the region's frame. `None` content draws a blank interior.
    /// The cursor mark is attached only when `with_cursor` is set (focused
    /// region).
    pub fn compose(&self, content: Option<&Content>, with_cursor: bool) -> Frame {
        let geo = self.geometry;
        let blank = self.blank();
        let mut grid: Vec<Vec<Cell>> = (geo.y..=geo.yn)
            .map(|y| {
                (geo.x..=geo.xn)
                    .map(|x| blank.clone().at(Position::new(y, x)))
                    .collect()
            })
            .collect();

        for glyph in self.border.ring(geo) {
            let (row, col) = (usize::from(glyph.y - geo.y), usize::from(glyph.x - geo.x));
            if let Some(cell) = grid.get_mut(row).and_then(|r| r.get_mut(col)) {
                cell.value = glyph.value;
            }
        }

        let interior = self.border.interior(geo);
        if let Some(content) = content {
            let rows = content.rows(self.region.colour, self.region.style);
            let window = Viewport::for_region(&interior, self.cursor).cells(&rows, &blank);
            let (dy, dx) = (
                usize::from(interior.y - geo.y),
                usize::from(interior.x - geo.x),
            );
            for (i, row) in window.into_iter().enumerate() {
                for (j, styled) in row.into_iter().enumerate() {
                    if let Some(cell) = grid.get_mut(dy + i).and_then(|r| r.get_mut(dx + j)) {
                        let position = cell.position;
                        *cell = styled.at(position);
                    }
                }
            }
        }

        Frame {
            rows: grid,
            cursor: with_cursor.then(|| CursorMark {
                position: Position::new(self.cursor.y, self.cursor.x),
                visible: self.cursor.visible,
            }),
        }
        .clip(self.canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_geometry::{Canvas, GeometrySpec};
    use core_model::RegionSpec;
    use pretty_assertions::assert_eq;

    fn built(bordered: bool) -> core_model::BuiltRegion {
        let mut spec = RegionSpec::new("frame").geometry(GeometrySpec {
            y: Some(2),
            yn: Some(5),
            x: Some(3),
            xn: Some(8),
            ..GeometrySpec::default()
        });
        if bordered {
            spec = spec.border(Border::enabled().with_title("T"));
        }
        spec.lines(&["hello world", "second", "third", "fourth"])
            .build(Canvas::new(24, 80))
            .unwrap()
    }

    #[test]
    fn composes_border_and_interior() {
        let b = built(true);
        let view = RegionView {
            region: &b.region,
            geometry: &b.geometry,
            border: &b.border,
            cursor: &b.cursor,
            canvas: Canvas::new(24, 80),
        };
        let frame = view.compose(Some(&b.content), false);
        assert_eq!(
            frame.text_rows(),
            vec!["┌ T ─┐", "│hell│", "│seco│", "└────┘"]
        );
        assert_eq!(frame.rows[0][0].position, Position::new(2, 3));
        assert_eq!(frame.rows[3][5].position, Position::new(5, 8));
        assert_eq!(frame.cursor, None);
    }

    #[test]
    fn blank_content_fills_area_with_spaces() {
        let b = built(false);
        let view = RegionView {
            region: &b.region,
            geometry: &b.geometry,
            border: &b.border,
            cursor: &b.cursor,
            canvas: Canvas::new(24, 80),
        };
        let frame = view.compose(None, true);
        assert_eq!(frame.text_rows(), vec!["      "; 4]);
        assert_eq!(
            frame.cursor,
            Some(CursorMark {
                position: Position::new(2, 3),
                visible: true
            })
        );
    }

    #[test]
    fn extend_keeps_rows_and_latest_cursor() {
        let mut a = Frame::new(vec![vec![]]);
        let b = Frame::cursor_only(CursorMark {
            position: Position::new(4, 4),
            visible: false,
        });
        a.extend(b);
        assert_eq!(a.rows.len(), 1);
        assert_eq!(a.cursor.map(|m| m.position), Some(Position::new(4, 4)));
    }

    #[test]
    fn region_past_the_canvas_is_clipped() {
        let b = RegionSpec::new("overhang")
            .geometry(GeometrySpec {
                y: Some(23),
                yn: Some(30),
                x: Some(75),
                xn: Some(90),
                ..GeometrySpec::default()
            })
            .border(Border::enabled())
            .lines(&["overhanging text"])
            .build(Canvas::new(24, 80))
            .unwrap();
        let view = RegionView {
            region: &b.region,
            geometry: &b.geometry,
            border: &b.border,
            cursor: &b.cursor,
            canvas: Canvas::new(24, 80),
        };
        let frame = view.compose(Some(&b.content), true);
        assert_eq!(frame.rows.len(), 2);
        assert!(frame.rows.iter().all(|row| row.len() == 6));
        assert!(frame.cells().all(|c| c.position.y <= 24 && c.position.x <= 80));
        assert_eq!(frame.text_rows(), vec!["┌─────", "│overh"]);
        assert_eq!(
            frame.cursor.map(|m| m.position),
            Some(Position::new(24, 76))
        );
    }

    #[test]
    fn clip_pulls_cursor_mark_onto_the_canvas() {
        let frame = Frame::cursor_only(CursorMark {
            position: Position::new(40, 100),
            visible: true,
        })
        .clip(Canvas::new(24, 80));
        assert!(frame.rows.is_empty());
        assert_eq!(frame.cursor.map(|m| m.position), Some(Position::new(24, 80)));
    }
}
