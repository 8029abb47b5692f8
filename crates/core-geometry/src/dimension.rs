//! Single-axis bound resolution.
//!
//! A `Dimension` turns partial constraints for one axis (start, end, length)
//! into a concrete `(d1, d2)` pair against the canvas extent on that axis.
//! The same algorithm serves the vertical axis (`y`, `yn`, height) and the
//! horizontal axis (`x`, `xn`, width).
//!
//! Resolution order:
//! 1. `maximised` wins: the pair spans the whole axis `(1, default)`.
//! 2. `centred` with a determinable length: the span is placed around the
//!    axis midpoint using floor division on both halves.
//! 3. Otherwise the start defaults to 1 and the end is taken from `dn`, or
//!    derived from the length, or falls back to the axis extent.
//!
//! Inverted or out-of-canvas values are never rejected here. Only `d1` is
//! clamped (to a minimum of 1); consumers clamp everything else.

/// Partial constraints for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimension {
    pub d: Option<i32>,
    pub dn: Option<i32>,
    pub length: Option<i32>,
    /// Extent of the canvas on this axis.
    pub default: i32,
    pub centred: bool,
    pub maximised: bool,
}

impl Dimension {
    pub fn new(default: i32) -> Self {
        Self {
            default,
            ..Self::default()
        }
    }

    pub fn start(mut self, d: Option<i32>) -> Self {
        self.d = d;
        self
    }

    pub fn end(mut self, dn: Option<i32>) -> Self {
        self.dn = dn;
        self
    }

    pub fn length(mut self, length: Option<i32>) -> Self {
        self.length = length;
        self
    }

    pub fn centred(mut self, centred: bool) -> Self {
        self.centred = centred;
        self
    }

    pub fn maximised(mut self, maximised: bool) -> Self {
        self.maximised = maximised;
        self
    }

    /// Raw resolved pair. The start may be below 1 for centred spans wider
    /// than the canvas; use [`Dimension::d1`] when a screen coordinate is needed.
    pub fn resolve(&self) -> (i32, i32) {
        if self.maximised {
            return (1, self.default);
        }
        if self.centred {
            let length = self.span_length();
            let half = self.default / 2;
            return (half - length / 2, half + length / 2);
        }
        (self.d.unwrap_or(1), self.resolved_end())
    }

    /// Resolved start, never below 1.
    pub fn d1(&self) -> i32 {
        self.resolve().0.max(1)
    }

    pub fn d2(&self) -> i32 {
        self.resolve().1
    }

    /// Length used for centring: inclusive `d..=dn` span first, then the
    /// explicit length, then the full axis extent.
    fn span_length(&self) -> i32 {
        match (self.d, self.dn, self.length) {
            (Some(d), Some(dn), _) => (dn - d + 1).max(0),
            (_, _, Some(length)) => length,
            _ => self.default,
        }
    }

    fn resolved_end(&self) -> i32 {
        match (self.d, self.dn, self.length) {
            (_, Some(dn), _) => dn,
            (None, None, Some(length)) => length,
            (Some(d), None, Some(length)) => d + length - 1,
            _ => self.default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maximised_spans_whole_axis() {
        let dim = Dimension::new(80).start(Some(10)).end(Some(20)).maximised(true);
        assert_eq!(dim.resolve(), (1, 80));
    }

    #[test]
    fn maximised_beats_centred() {
        let dim = Dimension::new(40).length(Some(10)).centred(true).maximised(true);
        assert_eq!(dim.resolve(), (1, 40));
    }

    #[test]
    fn centred_uses_explicit_length() {
        let dim = Dimension::new(80).length(Some(20)).centred(true);
        assert_eq!(dim.resolve(), (30, 50));
    }

    #[test]
    fn centred_prefers_start_end_span() {
        // 5..=14 is ten cells wide.
        let dim = Dimension::new(80)
            .start(Some(5))
            .end(Some(14))
            .length(Some(30))
            .centred(true);
        assert_eq!(dim.resolve(), (35, 45));
    }

    #[test]
    fn centred_without_length_uses_axis_extent() {
        let dim = Dimension::new(25).centred(true);
        assert_eq!(dim.resolve(), (0, 24));
        assert_eq!(dim.d1(), 1);
    }

    #[test]
    fn centred_wider_than_canvas_clamps_start() {
        let dim = Dimension::new(10).length(Some(30)).centred(true);
        assert_eq!(dim.resolve(), (-10, 20));
        assert_eq!(dim.d1(), 1);
        assert_eq!(dim.d2(), 20);
    }

    #[test]
    fn start_defaults_to_one() {
        let dim = Dimension::new(24);
        assert_eq!(dim.resolve(), (1, 24));
    }

    #[test]
    fn end_overrides_length() {
        let dim = Dimension::new(24).start(Some(3)).end(Some(7)).length(Some(15));
        assert_eq!(dim.resolve(), (3, 7));
    }

    #[test]
    fn end_derived_from_start_and_length() {
        let dim = Dimension::new(24).start(Some(3)).length(Some(5));
        assert_eq!(dim.resolve(), (3, 7));
    }

    #[test]
    fn length_alone_ends_at_length() {
        let dim = Dimension::new(24).length(Some(5));
        assert_eq!(dim.resolve(), (1, 5));
    }

    #[test]
    fn inverted_values_pass_through() {
        let dim = Dimension::new(24).start(Some(9)).end(Some(4));
        assert_eq!(dim.resolve(), (9, 4));
    }
}
