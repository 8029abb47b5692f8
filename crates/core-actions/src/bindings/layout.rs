//! Geometry, focus and resize events.

use super::{cascade, done, value};
use crate::args;
use core_events::{BindOptions, Dispatcher, Value};
use core_geometry::Canvas;
use core_state::Engine;
use std::time::Duration;
use tracing::debug;

pub(crate) fn install(d: &Dispatcher<Engine>, resize_delay: Duration) {
    // Reply: whether the region moved.
    for (event, dy, dx) in [
        ("_geometry_up_", -1, 0),
        ("_geometry_down_", 1, 0),
        ("_geometry_left_", 0, -1),
        ("_geometry_right_", 0, 1),
    ] {
        d.bind(event, move |_, engine, args| {
            let name = args::region(engine, args, 0)?;
            value(engine.move_geometry(&name, dy, dx)?)
        });
    }

    d.bind("_maximise_", |_, engine, args| {
        let name = args::region(engine, args, 0)?;
        engine.maximise(&name)?;
        done()
    });

    d.bind("_unmaximise_", |_, engine, args| {
        let name = args::region(engine, args, 0)?;
        engine.unmaximise(&name)?;
        done()
    });

    d.bind("_focus_by_name_", |d, engine, args| {
        let name = args::required_str(args, 0, "name")?.to_string();
        engine.focus_by_name(&name)?;
        cascade(d, engine, "_refresh_cursor_", &[Value::from(name)])
    });

    d.bind("_focus_next_", |d, engine, _| match engine.focus_next() {
        Some(name) => cascade(d, engine, "_refresh_cursor_", &[Value::from(name)]),
        None => done(),
    });

    d.bind("_focus_prev_", |d, engine, _| match engine.focus_prev() {
        Some(name) => cascade(d, engine, "_refresh_cursor_", &[Value::from(name)]),
        None => done(),
    });

    // Args: rows, columns.
    let options = BindOptions {
        delay: Some(resize_delay).filter(|d| !d.is_zero()),
    };
    d.bind_with("_resize_", options, |d, engine, args| {
        let rows = args::required_u16(args, 0, "rows")?;
        let columns = args::required_u16(args, 1, "columns")?;
        debug!(target: "state", rows, columns, "resize_applied");
        engine.resize(Canvas::new(rows, columns));
        cascade(d, engine, "_clear_", &[])?;
        cascade(d, engine, "_refresh_", &[])
    });
}
