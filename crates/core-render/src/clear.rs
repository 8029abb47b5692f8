//! Blanking a region's area.

use crate::frame::Frame;
use core_geometry::{Border, Canvas, Geometry};
use core_model::{Colour, Position, Style, StyledChar};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearOptions {
    /// Blank the border ring as well as the interior.
    pub clear_border: bool,
    /// Paint with the terminal's default colours instead of the region's.
    pub use_terminal_colours: bool,
}

impl ClearOptions {
    pub const fn whole_area() -> Self {
        Self {
            clear_border: true,
            use_terminal_colours: false,
        }
    }
}

/// Frame of spaces over the region's interior (or whole geometry), clipped
/// to `canvas`.
pub fn clear_region(
    canvas: Canvas,
    geometry: &Geometry,
    border: &Border,
    colour: Colour,
    options: ClearOptions,
) -> Frame {
    let area = if options.clear_border {
        geometry.clone()
    } else {
        border.interior(geometry)
    };
    let colour = if options.use_terminal_colours {
        Colour::terminal_default()
    } else {
        colour
    };
    let blank = StyledChar::blank(colour, Style::empty());
    Frame::new(
        (area.y..=area.yn)
            .map(|y| {
                (area.x..=area.xn)
                    .map(|x| blank.clone().at(Position::new(y, x)))
                    .collect()
            })
            .collect(),
    )
    .clip(canvas)
}
