use crate::{Colour, Style};
use std::fmt;

/// Absolute 1-based screen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub y: u16,
    pub x: u16,
}

impl Position {
    /// Zero coordinates are coerced to 1 (terminals are 1-based).
    pub fn new(y: u16, x: u16) -> Self {
        Self { y: y.max(1), x: x.max(1) }
    }

    /// Cursor positioning sequence `ESC [ y ; x H`.
    pub fn escape(&self) -> String {
        format!("\x1b[{};{}H", self.y.max(1), self.x.max(1))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.escape())
    }
}

/// A grapheme with its resolved presentation, not yet placed on screen.
///
/// A grapheme wider than one column is followed by a continuation entry
/// whose `value` is empty; continuation entries keep columns aligned and are
/// never printed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyledChar {
    pub value: String,
    pub colour: Colour,
    pub style: Style,
}

impl StyledChar {
    pub fn new(value: impl Into<String>, colour: Colour, style: Style) -> Self {
        Self {
            value: value.into(),
            colour,
            style,
        }
    }

    pub fn blank(colour: Colour, style: Style) -> Self {
        Self::new(" ", colour, style)
    }

    pub fn is_continuation(&self) -> bool {
        self.value.is_empty()
    }

    pub fn at(self, position: Position) -> Cell {
        Cell {
            value: self.value,
            colour: self.colour,
            style: self.style,
            position,
        }
    }
}

/// Fully resolved output cell. Frames are rectangular arrays of these.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    pub value: String,
    pub colour: Colour,
    pub style: Style,
    pub position: Position,
}

impl Cell {
    pub fn new(value: impl Into<String>, colour: Colour, style: Style, position: Position) -> Self {
        Self {
            value: value.into(),
            colour,
            style,
            position,
        }
    }

    pub fn is_continuation(&self) -> bool {
        self.value.is_empty()
    }
}
