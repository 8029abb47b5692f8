//! Region model: presentation attributes, content, cursors and the named
//! repositories they are stored in.
//!
//! Everything here is plain data plus pure transitions. Screen placement
//! lives in `core-geometry`; turning content into output lives in
//! `core-render`.

pub mod cell;
pub mod colour;
pub mod content;
pub mod cursor;
pub mod error;
pub mod region;
pub mod repository;
pub mod style;

pub use cell::{Cell, Position, StyledChar};
pub use colour::{Colour, ColourValue};
pub use content::{Content, Line, Stream};
pub use cursor::{Cursor, CursorBounds, CursorMove};
pub use error::BuildError;
pub use region::{BuiltRegion, ColourSpec, Region, RegionSpec};
pub use repository::{Handle, Repository};
pub use style::Style;
