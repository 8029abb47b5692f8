//! The engine: named repositories plus every operation that changes what is
//! on screen.
//!
//! All state is owned here and mutated only through `&mut Engine`, which in
//! practice means from inside a dispatcher handler on the main loop. Every
//! operation that draws composes a [`Frame`] and hands it to the render
//! dispatcher; the frame is also returned so callers (and tests) can see
//! exactly what went out. Hidden regions are still composed but their
//! output is suppressed, in which case `None` is returned.

use crate::error::StateError;
use crate::focus::FocusRing;
use core_geometry::{Border, Canvas, Geometry};
use core_model::{
    BuiltRegion, Colour, Content, Cursor, CursorBounds, CursorMove, Position, Region, RegionSpec,
    Repository,
};
use core_render::{
    Buffer, CaptureRenderer, ClearOptions, CursorMark, Frame, RegionView, RenderDispatcher,
    clear_region, shared_output,
};
use tracing::{debug, trace, warn};

pub struct Engine {
    canvas: Canvas,
    regions: Repository<Region>,
    geometries: Repository<Geometry>,
    borders: Repository<Border>,
    cursors: Repository<Cursor>,
    buffers: Repository<Buffer<Content>>,
    focus: FocusRing,
    renderer: RenderDispatcher,
    capture: Option<CaptureRenderer>,
    remote_running: bool,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("canvas", &self.canvas)
            .field("regions", &self.regions.names())
            .field("focus", &self.focus.current())
            .field("renderer", &self.renderer)
            .finish()
    }
}

fn unknown(name: &str) -> StateError {
    StateError::UnknownRegion(name.to_string())
}

impl Engine {
    pub fn new(canvas: Canvas, renderer: RenderDispatcher) -> Self {
        Self {
            canvas,
            regions: Repository::new(),
            geometries: Repository::new(),
            borders: Repository::new(),
            cursors: Repository::new(),
            buffers: Repository::new(),
            focus: FocusRing::new(),
            renderer,
            capture: None,
            remote_running: false,
        }
    }

    /// Engine whose only backend is an in-memory capture; nothing is written
    /// to a device.
    pub fn headless(canvas: Canvas) -> Self {
        let mut engine = Self::new(canvas, RenderDispatcher::new(shared_output(std::io::sink())));
        engine.attach_capture();
        engine
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn renderer(&self) -> &RenderDispatcher {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut RenderDispatcher {
        &mut self.renderer
    }

    /// Register a capture backend (once) and return a handle to it.
    pub fn attach_capture(&mut self) -> CaptureRenderer {
        if let Some(capture) = &self.capture {
            return capture.clone();
        }
        let capture = CaptureRenderer::new();
        self.renderer.add(capture.clone());
        self.capture = Some(capture.clone());
        capture
    }

    pub fn capture(&self) -> Option<&CaptureRenderer> {
        self.capture.as_ref()
    }

    /// Bytes of the most recent frame, if a capture backend is attached.
    pub fn last_output(&self) -> Vec<u8> {
        self.capture
            .as_ref()
            .map(CaptureRenderer::last_output)
            .unwrap_or_default()
    }

    pub fn remote_running(&self) -> bool {
        self.remote_running
    }

    pub fn set_remote_running(&mut self, running: bool) {
        self.remote_running = running;
    }

    // ---------------------------------------------------------------------
    // Definition and lookup
    // ---------------------------------------------------------------------

    /// Build `spec` and store every part under its name. Redefining a name
    /// replaces its geometry, border, cursor and presentation; its buffer is
    /// kept and the new lines (if any) are queued on it.
    pub fn define(&mut self, spec: &RegionSpec) -> Result<(), StateError> {
        let BuiltRegion {
            region,
            geometry,
            border,
            cursor,
            content,
        } = spec.build(self.canvas)?;
        let name = region.name.clone();
        let buffer = self.buffers.find_or_create(&name, Buffer::new);
        if !content.is_empty() {
            buffer.enqueue(content);
        }
        self.regions.store(name.as_str(), region);
        self.geometries.store(name.as_str(), geometry);
        self.borders.store(name.as_str(), border);
        self.cursors.store(name.as_str(), cursor);
        self.focus.add(&name);
        debug!(target: "state", region = name.as_str(), regions = self.regions.len(), "region_defined");
        Ok(())
    }

    /// Forget every region (explicit repository reset).
    pub fn reset(&mut self) {
        self.regions.reset();
        self.geometries.reset();
        self.borders.reset();
        self.cursors.reset();
        self.buffers.reset();
        self.focus.clear();
        debug!(target: "state", "repositories_reset");
    }

    pub fn contains(&self, name: &str) -> bool {
        self.regions.contains(name)
    }

    /// Region names in definition order.
    pub fn names(&self) -> Vec<String> {
        self.regions.names()
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.by_name(name)
    }

    pub fn geometry(&self, name: &str) -> Option<&Geometry> {
        self.geometries.by_name(name)
    }

    pub fn border(&self, name: &str) -> Option<&Border> {
        self.borders.by_name(name)
    }

    pub fn cursor(&self, name: &str) -> Option<&Cursor> {
        self.cursors.by_name(name)
    }

    pub fn buffer(&self, name: &str) -> Option<&Buffer<Content>> {
        self.buffers.by_name(name)
    }

    pub fn is_visible(&self, name: &str) -> bool {
        self.buffers.by_name(name).is_some_and(Buffer::is_visible)
    }

    /// Members of `group` in definition order.
    pub fn group_members(&self, group: &str) -> Vec<String> {
        self.regions
            .iter()
            .filter(|(_, r)| r.group.as_deref() == Some(group))
            .map(|(n, _)| n.to_string())
            .collect()
    }

    /// Distinct group names in first-seen order.
    pub fn groups(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for (_, region) in self.regions.iter() {
            if let Some(g) = &region.group
                && !out.contains(g)
            {
                out.push(g.clone());
            }
        }
        out
    }

    fn members(&self, group: &str) -> Result<Vec<String>, StateError> {
        let members = self.group_members(group);
        if members.is_empty() {
            return Err(StateError::UnknownGroup(group.to_string()));
        }
        Ok(members)
    }

    /// Queue new content for `name`; it appears on the next refresh.
    pub fn enqueue(&mut self, name: &str, content: Content) -> Result<(), StateError> {
        if !self.regions.contains(name) {
            return Err(unknown(name));
        }
        self.buffers.find_or_create(name, Buffer::new).enqueue(content);
        trace!(target: "render.buffer", region = name, "enqueued");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Output
    // ---------------------------------------------------------------------

    fn emit(&self, frame: &Frame) {
        let report = self.renderer.render(frame);
        if !report.is_clean() {
            warn!(
                target: "state.refresh",
                failed = report.failed.len(),
                rendered = report.rendered.len(),
                "frame_partially_rendered"
            );
        }
    }

    fn emit_if_visible(&self, name: &str, frame: Frame, visible: bool) -> Option<Frame> {
        if !visible {
            trace!(target: "state.refresh", region = name, "output_suppressed");
            return None;
        }
        self.emit(&frame);
        Some(frame)
    }

    /// Run the region's buffer refresh and compose its frame. Returns the
    /// frame with the region's visibility.
    fn compose(&mut self, name: &str) -> Result<(Frame, bool), StateError> {
        let focused = self.focus.is_focused(name);
        let region = self.regions.by_name(name).ok_or_else(|| unknown(name))?;
        let geometry = self.geometries.by_name(name).ok_or_else(|| unknown(name))?;
        let border = self.borders.by_name(name).ok_or_else(|| unknown(name))?;
        let cursor = self.cursors.by_name(name).ok_or_else(|| unknown(name))?;
        let buffer = self.buffers.find_or_create(name, Buffer::new);
        let visible = buffer.is_visible();
        let refresh = buffer.refresh();
        trace!(
            target: "state.refresh",
            region = name,
            kind = refresh.as_str(),
            visible,
            focused,
            "refresh"
        );
        let view = RegionView {
            region,
            geometry,
            border,
            cursor,
            canvas: self.canvas,
        };
        Ok((view.compose(refresh.content(), focused), visible))
    }

    /// Promote pending content (if any) and redraw the region. Every call
    /// redraws, whether or not anything changed.
    pub fn refresh(&mut self, name: &str) -> Result<Option<Frame>, StateError> {
        let (frame, visible) = self.compose(name)?;
        Ok(self.emit_if_visible(name, frame, visible))
    }

    fn refresh_many(&mut self, names: &[String]) -> Result<Option<Frame>, StateError> {
        let mut combined = Frame::default();
        for name in names {
            let (frame, visible) = self.compose(name)?;
            if visible {
                combined.extend(frame);
            }
        }
        if combined.is_empty() {
            return Ok(None);
        }
        self.emit(&combined);
        Ok(Some(combined))
    }

    /// Redraw every region as one frame, in definition order.
    pub fn refresh_all(&mut self) -> Result<Option<Frame>, StateError> {
        let names = self.regions.names();
        self.refresh_many(&names)
    }

    pub fn refresh_group(&mut self, group: &str) -> Result<Option<Frame>, StateError> {
        let names = self.members(group)?;
        self.refresh_many(&names)
    }

    /// Reposition (and show or hide) the terminal cursor for `name` without
    /// redrawing any cells.
    pub fn refresh_cursor(&mut self, name: &str) -> Result<Option<Frame>, StateError> {
        let cursor = self.cursors.by_name(name).ok_or_else(|| unknown(name))?;
        let frame = Frame::cursor_only(CursorMark {
            position: Position::new(cursor.y, cursor.x),
            visible: cursor.visible,
        });
        Ok(self.emit_if_visible(name, frame, self.is_visible(name)))
    }

    /// Blank the region's area.
    pub fn clear(&mut self, name: &str, options: ClearOptions) -> Result<Frame, StateError> {
        let region = self.regions.by_name(name).ok_or_else(|| unknown(name))?;
        let geometry = self.geometries.by_name(name).ok_or_else(|| unknown(name))?;
        let border = self.borders.by_name(name).ok_or_else(|| unknown(name))?;
        let frame = clear_region(self.canvas, geometry, border, region.colour, options);
        trace!(target: "state.refresh", region = name, clear_border = options.clear_border, "clear");
        self.emit(&frame);
        Ok(frame)
    }

    /// Blank the whole canvas with the terminal's default colours.
    pub fn clear_all(&mut self) -> Frame {
        let frame = clear_region(
            self.canvas,
            &Geometry::full(self.canvas),
            &Border::disabled(),
            Colour::terminal_default(),
            ClearOptions::whole_area(),
        );
        trace!(target: "state.refresh", "clear_all");
        self.emit(&frame);
        frame
    }

    pub fn clear_group(&mut self, group: &str, options: ClearOptions) -> Result<(), StateError> {
        for name in self.members(group)? {
            self.clear(&name, options)?;
        }
        Ok(())
    }

    /// Blank the area a region occupies, including its border, with terminal
    /// colours. Used when a region leaves (hide, move, shrink).
    fn vacate(&self, geometry: &Geometry) {
        let frame = clear_region(
            self.canvas,
            geometry,
            &Border::disabled(),
            Colour::terminal_default(),
            ClearOptions::whole_area(),
        );
        self.emit(&frame);
    }

    // ---------------------------------------------------------------------
    // Visibility
    // ---------------------------------------------------------------------

    pub fn show_interface(&mut self, name: &str) -> Result<Option<Frame>, StateError> {
        self.buffers.by_name_mut(name).ok_or_else(|| unknown(name))?.show();
        debug!(target: "state", region = name, "interface_shown");
        self.refresh(name)
    }

    pub fn hide_interface(&mut self, name: &str) -> Result<(), StateError> {
        self.buffers.by_name_mut(name).ok_or_else(|| unknown(name))?.hide();
        let geometry = self.geometries.by_name(name).ok_or_else(|| unknown(name))?;
        self.vacate(geometry);
        debug!(target: "state", region = name, "interface_hidden");
        Ok(())
    }

    /// Returns the new visibility.
    pub fn toggle_interface(&mut self, name: &str) -> Result<bool, StateError> {
        if self.is_visible(name) {
            self.hide_interface(name)?;
            Ok(false)
        } else {
            self.show_interface(name)?;
            Ok(true)
        }
    }

    /// Clear the screen, then show and redraw every member of `group`.
    pub fn show_group(&mut self, group: &str) -> Result<Option<Frame>, StateError> {
        let names = self.members(group)?;
        self.clear_all();
        for name in &names {
            if let Some(buffer) = self.buffers.by_name_mut(name) {
                buffer.show();
            }
        }
        self.refresh_many(&names)
    }

    pub fn hide_group(&mut self, group: &str) -> Result<(), StateError> {
        for name in self.members(group)? {
            self.hide_interface(&name)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Cursors
    // ---------------------------------------------------------------------

    fn bounds(&self, name: &str) -> Result<CursorBounds<'_>, StateError> {
        let geometry = self.geometries.by_name(name).ok_or_else(|| unknown(name))?;
        let border = self.borders.by_name(name).ok_or_else(|| unknown(name))?;
        let (content_height, content_width) = self
            .buffers
            .by_name(name)
            .and_then(|b| b.back().or(b.front()))
            .map_or((0, 0), |c| (c.height(), c.width()));
        Ok(CursorBounds {
            canvas: self.canvas,
            geometry,
            border,
            content_height,
            content_width,
        })
    }

    /// Compute the next cursor from the current one and commit it.
    fn update_cursor(
        &mut self,
        name: &str,
        next: impl FnOnce(&Cursor, &CursorBounds<'_>) -> Cursor,
    ) -> Result<Cursor, StateError> {
        let cursor = {
            let bounds = self.bounds(name)?;
            let current = self.cursors.by_name(name).ok_or_else(|| unknown(name))?;
            next(current, &bounds)
        };
        self.cursors.store(name, cursor.clone());
        Ok(cursor)
    }

    pub fn move_cursor(&mut self, name: &str, mv: CursorMove) -> Result<Cursor, StateError> {
        let cursor = self.update_cursor(name, |c, b| c.moved(mv, b))?;
        trace!(
            target: "state.cursor",
            region = name,
            direction = mv.as_str(),
            y = cursor.y,
            x = cursor.x,
            oy = cursor.oy,
            ox = cursor.ox,
            "cursor_moved"
        );
        Ok(cursor)
    }

    /// Place the cursor at `(y, x)` relative to the interior origin.
    pub fn reposition_cursor(&mut self, name: &str, y: u16, x: u16) -> Result<Cursor, StateError> {
        self.update_cursor(name, |c, b| c.repositioned(y, x, b))
    }

    pub fn reset_cursor(&mut self, name: &str) -> Result<Cursor, StateError> {
        self.update_cursor(name, |c, b| c.reset(b))
    }

    pub fn show_cursor(&mut self, name: &str) -> Result<Cursor, StateError> {
        self.update_cursor(name, |c, _| c.shown())
    }

    pub fn hide_cursor(&mut self, name: &str) -> Result<Cursor, StateError> {
        self.update_cursor(name, |c, _| c.hidden())
    }

    pub fn toggle_cursor(&mut self, name: &str) -> Result<Cursor, StateError> {
        self.update_cursor(name, |c, _| c.toggled())
    }

    /// Keep the cursor at the same spot relative to its interior after the
    /// region's geometry changed from `old`.
    fn follow_geometry(&mut self, name: &str, old: &Geometry) -> Result<Cursor, StateError> {
        let old_interior = self
            .borders
            .by_name(name)
            .ok_or_else(|| unknown(name))?
            .interior(old);
        self.update_cursor(name, |c, b| {
            c.repositioned(
                c.y.saturating_sub(old_interior.y),
                c.x.saturating_sub(old_interior.x),
                b,
            )
        })
    }

    // ---------------------------------------------------------------------
    // Geometry
    // ---------------------------------------------------------------------

    /// Move the region by `(dy, dx)`. Refused (returns false) when any edge
    /// would leave the canvas or the region is maximised.
    pub fn move_geometry(&mut self, name: &str, dy: i32, dx: i32) -> Result<bool, StateError> {
        let canvas = self.canvas;
        let geometry = self.geometries.by_name_mut(name).ok_or_else(|| unknown(name))?;
        let old = geometry.clone();
        if !geometry.move_by(dy, dx, canvas) {
            return Ok(false);
        }
        self.follow_geometry(name, &old)?;
        self.vacate(&old);
        self.refresh(name)?;
        Ok(true)
    }

    pub fn maximise(&mut self, name: &str) -> Result<Option<Frame>, StateError> {
        let canvas = self.canvas;
        let geometry = self.geometries.by_name_mut(name).ok_or_else(|| unknown(name))?;
        let old = geometry.clone();
        geometry.maximise(canvas);
        self.follow_geometry(name, &old)?;
        self.refresh(name)
    }

    /// Restore the region's own bounds, blank what it covered and redraw
    /// everything it may have hidden.
    pub fn unmaximise(&mut self, name: &str) -> Result<Option<Frame>, StateError> {
        let canvas = self.canvas;
        let geometry = self.geometries.by_name_mut(name).ok_or_else(|| unknown(name))?;
        let old = geometry.clone();
        geometry.unmaximise(canvas);
        self.follow_geometry(name, &old)?;
        self.vacate(&old);
        self.refresh_all()
    }

    /// Adopt a new canvas size: every geometry is re-resolved and every
    /// cursor re-clamped. Nothing is drawn.
    pub fn resize(&mut self, canvas: Canvas) {
        self.canvas = canvas;
        for (_, geometry) in self.geometries.iter_mut() {
            geometry.reresolve(canvas);
        }
        for name in self.regions.names() {
            if let Err(err) = self.update_cursor(&name, |c, b| c.shifted(0, 0, b)) {
                warn!(target: "state", region = name.as_str(), error = %err, "cursor_reclamp_failed");
            }
        }
        debug!(target: "state", height = canvas.height, width = canvas.width, "canvas_resized");
    }

    // ---------------------------------------------------------------------
    // Focus
    // ---------------------------------------------------------------------

    pub fn focused(&self) -> Option<&str> {
        self.focus.current()
    }

    /// Name of the focused region, or `NoFocus`.
    pub fn focused_name(&self) -> Result<String, StateError> {
        self.focus
            .current()
            .map(str::to_string)
            .ok_or(StateError::NoFocus)
    }

    pub fn focus_by_name(&mut self, name: &str) -> Result<(), StateError> {
        if !self.focus.focus(name) {
            return Err(unknown(name));
        }
        debug!(target: "state.focus", region = name, "focus_changed");
        Ok(())
    }

    pub fn focus_next(&mut self) -> Option<String> {
        let name = self.focus.next().map(str::to_string);
        debug!(target: "state.focus", region = name.as_deref(), "focus_next");
        name
    }

    pub fn focus_prev(&mut self) -> Option<String> {
        let name = self.focus.prev().map(str::to_string);
        debug!(target: "state.focus", region = name.as_deref(), "focus_prev");
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_geometry::GeometrySpec;

    fn spec(name: &str, y: i32, x: i32) -> RegionSpec {
        RegionSpec::new(name).geometry(GeometrySpec {
            y: Some(y),
            x: Some(x),
            height: Some(3),
            width: Some(5),
            ..GeometrySpec::default()
        })
    }

    #[test]
    fn define_stores_every_part() {
        let mut engine = Engine::headless(Canvas::new(24, 80));
        engine.define(&spec("a", 1, 1).lines(&["x"])).unwrap();
        assert!(engine.contains("a"));
        assert!(engine.geometry("a").is_some());
        assert!(engine.cursor("a").is_some());
        assert!(engine.buffer("a").is_some_and(Buffer::has_pending));
        assert_eq!(engine.focused(), Some("a"));
    }

    #[test]
    fn redefine_keeps_buffer_front() {
        let mut engine = Engine::headless(Canvas::new(24, 80));
        engine.define(&spec("a", 1, 1).lines(&["first"])).unwrap();
        engine.refresh("a").unwrap();
        engine.define(&spec("a", 2, 2)).unwrap();
        let buffer = engine.buffer("a").unwrap();
        assert!(buffer.front().is_some());
        assert!(!buffer.has_pending());
        assert_eq!(engine.geometry("a").unwrap().y, 2);
    }

    #[test]
    fn unknown_region_is_an_error() {
        let mut engine = Engine::headless(Canvas::new(24, 80));
        assert_eq!(
            engine.refresh("ghost").unwrap_err(),
            StateError::UnknownRegion("ghost".into())
        );
        assert_eq!(
            engine.refresh_group("none").unwrap_err(),
            StateError::UnknownGroup("none".into())
        );
    }

    #[test]
    fn reset_forgets_everything() {
        let mut engine = Engine::headless(Canvas::new(24, 80));
        engine.define(&spec("a", 1, 1)).unwrap();
        engine.reset();
        assert!(engine.names().is_empty());
        assert_eq!(engine.focused(), None);
        assert_eq!(engine.focused_name().unwrap_err(), StateError::NoFocus);
    }

    #[test]
    fn groups_in_first_seen_order() {
        let mut engine = Engine::headless(Canvas::new(24, 80));
        engine.define(&spec("a", 1, 1).group("g2")).unwrap();
        engine.define(&spec("b", 5, 1).group("g1")).unwrap();
        engine.define(&spec("c", 9, 1).group("g2")).unwrap();
        assert_eq!(engine.groups(), vec!["g2", "g1"]);
        assert_eq!(engine.group_members("g2"), vec!["a", "c"]);
    }
}
