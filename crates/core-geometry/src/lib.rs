//! Region bounds: canvas, per-axis dimension resolution, geometry and border.
//!
//! Coordinates are 1-based terminal cells with the origin at the top-left
//! corner `(1, 1)`. A `Geometry` is always stored resolved (`y <= yn`,
//! `x <= xn`, both starts >= 1) and keeps the `GeometrySpec` it came from so
//! it can be re-resolved when the canvas changes or a maximise is undone.

pub mod border;
pub mod dimension;

pub use border::{Border, BorderGlyph, Glyphs};
pub use dimension::Dimension;

/// Drawable terminal area. All geometry defaults derive from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub height: u16,
    pub width: u16,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(24, 80)
    }
}

impl Canvas {
    pub const fn new(height: u16, width: u16) -> Self {
        Self { height, width }
    }

    /// Build from a `(columns, rows)` size as reported by the terminal.
    pub const fn from_terminal_size(columns: u16, rows: u16) -> Self {
        Self::new(rows, columns)
    }

    pub const fn centre(&self) -> (u16, u16) {
        (self.height / 2, self.width / 2)
    }

    pub fn contains(&self, y: u16, x: u16) -> bool {
        (1..=self.height).contains(&y) && (1..=self.width).contains(&x)
    }
}

/// Declarative, partially specified bounds for a region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometrySpec {
    pub y: Option<i32>,
    pub yn: Option<i32>,
    pub x: Option<i32>,
    pub xn: Option<i32>,
    pub height: Option<i32>,
    pub width: Option<i32>,
    pub centred: bool,
    pub maximised: bool,
}

impl GeometrySpec {
    fn vertical(&self, canvas: Canvas) -> Dimension {
        Dimension::new(i32::from(canvas.height))
            .start(self.y)
            .end(self.yn)
            .length(self.height)
            .centred(self.centred)
            .maximised(self.maximised)
    }

    fn horizontal(&self, canvas: Canvas) -> Dimension {
        Dimension::new(i32::from(canvas.width))
            .start(self.x)
            .end(self.xn)
            .length(self.width)
            .centred(self.centred)
            .maximised(self.maximised)
    }
}

/// Resolved bounding box of a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometry {
    pub y: u16,
    pub yn: u16,
    pub x: u16,
    pub xn: u16,
    pub centred: bool,
    pub maximised: bool,
    spec: GeometrySpec,
}

impl Geometry {
    pub fn resolve(spec: GeometrySpec, canvas: Canvas) -> Self {
        let (y, yn) = axis_bounds(spec.vertical(canvas));
        let (x, xn) = axis_bounds(spec.horizontal(canvas));
        Self {
            y,
            yn,
            x,
            xn,
            centred: spec.centred,
            maximised: spec.maximised,
            spec,
        }
    }

    /// Geometry covering the whole canvas.
    pub fn full(canvas: Canvas) -> Self {
        Self::resolve(GeometrySpec::default(), canvas)
    }

    pub fn spec(&self) -> &GeometrySpec {
        &self.spec
    }

    pub fn height(&self) -> u16 {
        self.yn - self.y + 1
    }

    pub fn width(&self) -> u16 {
        self.xn - self.x + 1
    }

    pub fn top(&self) -> u16 {
        self.y
    }

    pub fn bottom(&self) -> u16 {
        self.yn
    }

    pub fn left(&self) -> u16 {
        self.x
    }

    pub fn right(&self) -> u16 {
        self.xn
    }

    /// Row directly above the region (0 when the region touches the top).
    pub fn north(&self) -> u16 {
        self.y.saturating_sub(1)
    }

    pub fn south(&self) -> u16 {
        self.yn.saturating_add(1)
    }

    pub fn west(&self) -> u16 {
        self.x.saturating_sub(1)
    }

    pub fn east(&self) -> u16 {
        self.xn.saturating_add(1)
    }

    pub fn contains(&self, y: u16, x: u16) -> bool {
        (self.y..=self.yn).contains(&y) && (self.x..=self.xn).contains(&x)
    }

    /// Re-resolve against a new canvas (terminal resize).
    pub fn reresolve(&mut self, canvas: Canvas) {
        *self = Self::resolve(self.spec.clone(), canvas);
    }

    pub fn maximise(&mut self, canvas: Canvas) {
        self.spec.maximised = true;
        self.reresolve(canvas);
        tracing::trace!(target: "geometry", y = self.y, yn = self.yn, x = self.x, xn = self.xn, "maximised");
    }

    pub fn unmaximise(&mut self, canvas: Canvas) {
        self.spec.maximised = false;
        self.reresolve(canvas);
        tracing::trace!(target: "geometry", y = self.y, yn = self.yn, x = self.x, xn = self.xn, "unmaximised");
    }

    /// Shift the whole box by `(dy, dx)`. A move that would push any edge off
    /// the canvas is refused and leaves the geometry untouched. Returns whether
    /// the geometry moved.
    ///
    /// A successful move pins the `GeometrySpec` to explicit coordinates, so centring is
    /// dropped and later resizes keep the moved position.
    pub fn move_by(&mut self, dy: i32, dx: i32, canvas: Canvas) -> bool {
        if self.maximised {
            return false;
        }
        let y = i32::from(self.y) + dy;
        let yn = i32::from(self.yn) + dy;
        let x = i32::from(self.x) + dx;
        let xn = i32::from(self.xn) + dx;
        if y < 1 || x < 1 || yn > i32::from(canvas.height) || xn > i32::from(canvas.width) {
            tracing::trace!(target: "geometry", dy, dx, "move_refused");
            return false;
        }
        let spec = GeometrySpec {
            y: Some(y),
            yn: Some(yn),
            x: Some(x),
            xn: Some(xn),
            height: None,
            width: None,
            centred: false,
            maximised: false,
        };
        *self = Self::resolve(spec, canvas);
        true
    }
}

fn axis_bounds(dimension: Dimension) -> (u16, u16) {
    let d1 = dimension.d1();
    let d2 = dimension.d2().max(d1);
    (to_cell(d1), to_cell(d2))
}

fn to_cell(value: i32) -> u16 {
    u16::try_from(value.max(1)).unwrap_or(u16::MAX)
}
