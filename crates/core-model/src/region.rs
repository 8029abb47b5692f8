//! Named regions and the explicit build step that validates them.
//!
//! A `RegionSpec` is the declarative description handed in by a host (or by
//! the configuration layer). `build` validates it once and resolves it into
//! the parts that are stored by name: the region record itself, its geometry,
//! its border and its cursor.

use crate::{BuildError, Colour, Content, Cursor, CursorBounds, Style};
use core_geometry::{Border, Canvas, Geometry, GeometrySpec};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColourSpec {
    pub foreground: Option<String>,
    pub background: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionSpec {
    pub name: String,
    pub group: Option<String>,
    pub geometry: GeometrySpec,
    pub border: Option<Border>,
    pub colour: ColourSpec,
    pub style: Vec<String>,
    pub cursor_visible: bool,
    /// Debounce for this region's refresh event. Zero refreshes immediately.
    pub delay: Duration,
    pub lines: Vec<String>,
}

impl RegionSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cursor_visible: true,
            ..Self::default()
        }
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn geometry(mut self, geometry: GeometrySpec) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    pub fn colour(mut self, foreground: Option<&str>, background: Option<&str>) -> Self {
        self.colour = ColourSpec {
            foreground: foreground.map(str::to_string),
            background: background.map(str::to_string),
        };
        self
    }

    pub fn style(mut self, names: &[&str]) -> Self {
        self.style = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn cursor_visible(mut self, visible: bool) -> Self {
        self.cursor_visible = visible;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn lines<S: AsRef<str>>(mut self, lines: &[S]) -> Self {
        self.lines = lines.iter().map(|l| l.as_ref().to_string()).collect();
        self
    }

    /// Validate and resolve against `canvas`. Fails fast on the first
    /// malformed field; nothing required is ever defaulted.
    pub fn build(&self, canvas: Canvas) -> Result<BuiltRegion, BuildError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(BuildError::MissingName);
        }
        for (axis, value) in [("height", self.geometry.height), ("width", self.geometry.width)] {
            if let Some(v) = value
                && v < 1
            {
                return Err(BuildError::InvalidGeometry {
                    name: name.to_string(),
                    reason: format!("{axis} must be positive, got {v}"),
                });
            }
        }
        let colour = Colour::parse(
            self.colour.foreground.as_deref(),
            self.colour.background.as_deref(),
        )?;
        let style = Style::parse_all(&self.style)?;
        let geometry = Geometry::resolve(self.geometry.clone(), canvas);
        let border = self.border.clone().unwrap_or_default();
        let content = Content::from_text(&self.lines);
        let bounds = CursorBounds {
            canvas,
            geometry: &geometry,
            border: &border,
            content_height: content.height(),
            content_width: content.width(),
        };
        let mut cursor = Cursor::at_origin(name, &bounds);
        cursor.visible = self.cursor_visible;
        tracing::debug!(
            target: "model.region",
            name,
            y = geometry.y,
            yn = geometry.yn,
            x = geometry.x,
            xn = geometry.xn,
            bordered = border.is_enabled(),
            "region_built"
        );
        Ok(BuiltRegion {
            region: Region {
                name: name.to_string(),
                group: self.group.clone(),
                colour,
                style,
                cursor_visible: self.cursor_visible,
                delay: self.delay,
            },
            geometry,
            border,
            cursor,
            content,
        })
    }
}

/// Presentation record of a defined region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub group: Option<String>,
    pub colour: Colour,
    pub style: Style,
    pub cursor_visible: bool,
    pub delay: Duration,
}

/// Output of [`RegionSpec::build`]: every part the engine stores by name.
#[derive(Debug, Clone)]
pub struct BuiltRegion {
    pub region: Region,
    pub geometry: Geometry,
    pub border: Border,
    pub cursor: Cursor,
    pub content: Content,
}
