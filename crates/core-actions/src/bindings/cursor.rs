//! Cursor events. Moves redraw the region so the viewport follows the
//! scroll offset; visibility changes only reposition the terminal cursor.

use super::{cascade, value};
use crate::args;
use core_events::{Dispatcher, Value};
use core_model::CursorMove;
use core_state::Engine;

pub(crate) fn install(d: &Dispatcher<Engine>) {
    for (event, mv) in [
        ("_cursor_up_", CursorMove::Up),
        ("_cursor_down_", CursorMove::Down),
        ("_cursor_left_", CursorMove::Left),
        ("_cursor_right_", CursorMove::Right),
        ("_cursor_origin_", CursorMove::Origin),
    ] {
        d.bind(event, move |d, engine, args| {
            let name = args::region(engine, args, 0)?;
            engine.move_cursor(&name, mv)?;
            cascade(d, engine, "_refresh_", &[Value::from(name)])
        });
    }

    d.bind("_cursor_reset_", |d, engine, args| {
        let name = args::region(engine, args, 0)?;
        engine.reset_cursor(&name)?;
        cascade(d, engine, "_refresh_", &[Value::from(name)])
    });

    d.bind("_cursor_reposition_", |d, engine, args| {
        let name = args::required_str(args, 0, "name")?.to_string();
        let y = args::required_u16(args, 1, "y")?;
        let x = args::required_u16(args, 2, "x")?;
        engine.reposition_cursor(&name, y, x)?;
        cascade(d, engine, "_refresh_", &[Value::from(name)])
    });

    // "y,x" on screen.
    d.bind("_cursor_position_", |_, engine, args| {
        let name = args::region(engine, args, 0)?;
        let cursor = engine
            .cursor(&name)
            .ok_or_else(|| anyhow::anyhow!("unknown region `{name}`"))?;
        value(format!("{},{}", cursor.y, cursor.x))
    });

    for event in ["_show_cursor_", "_cursor_show_"] {
        d.bind(event, |d, engine, args| {
            let name = args::region(engine, args, 0)?;
            engine.show_cursor(&name)?;
            cascade(d, engine, "_refresh_cursor_", &[Value::from(name)])
        });
    }

    for event in ["_hide_cursor_", "_cursor_hide_"] {
        d.bind(event, |d, engine, args| {
            let name = args::region(engine, args, 0)?;
            engine.hide_cursor(&name)?;
            cascade(d, engine, "_refresh_cursor_", &[Value::from(name)])
        });
    }

    d.bind("_cursor_toggle_", |d, engine, args| {
        let name = args::region(engine, args, 0)?;
        engine.toggle_cursor(&name)?;
        cascade(d, engine, "_refresh_cursor_", &[Value::from(name)])
    });
}
