//! Drawing and visibility events.

use super::{cascade, done, refresh_event, value};
use crate::args;
use core_events::Dispatcher;
use core_render::ClearOptions;
use core_state::Engine;

pub(crate) fn install(d: &Dispatcher<Engine>) {
    d.bind("_initialize_", |d, engine, _| cascade(d, engine, "_refresh_", &[]));

    // With a region, its own (possibly debounced) refresh event runs when
    // bound; without one every region is redrawn as a single frame.
    d.bind("_refresh_", |d, engine, args| {
        match args::optional_str(args, 0) {
            Some(name) => {
                let event = refresh_event(name);
                if d.is_registered(&event) {
                    return cascade(d, engine, &event, &[]);
                }
                engine.refresh(name)?;
            }
            None => {
                engine.refresh_all()?;
            }
        }
        done()
    });

    d.bind("_refresh_group_", |_, engine, args| {
        engine.refresh_group(args::required_str(args, 0, "group")?)?;
        done()
    });

    d.bind("_refresh_cursor_", |_, engine, args| {
        let name = args::region(engine, args, 0)?;
        engine.refresh_cursor(&name)?;
        done()
    });

    d.bind("_clear_", |_, engine, args| {
        match args::optional_str(args, 0) {
            Some(name) => {
                engine.clear(name, ClearOptions::default())?;
            }
            None => {
                engine.clear_all();
            }
        }
        done()
    });

    d.bind("_clear_group_", |_, engine, args| {
        engine.clear_group(args::required_str(args, 0, "group")?, ClearOptions::default())?;
        done()
    });

    d.bind("_show_group_", |_, engine, args| {
        engine.show_group(args::required_str(args, 0, "group")?)?;
        done()
    });

    d.bind("_hide_group_", |_, engine, args| {
        engine.hide_group(args::required_str(args, 0, "group")?)?;
        done()
    });

    d.bind("_show_interface_", |_, engine, args| {
        let name = args::region(engine, args, 0)?;
        engine.show_interface(&name)?;
        done()
    });

    d.bind("_hide_interface_", |_, engine, args| {
        let name = args::region(engine, args, 0)?;
        engine.hide_interface(&name)?;
        done()
    });

    d.bind("_toggle_interface_", |_, engine, args| {
        let name = args::region(engine, args, 0)?;
        value(engine.toggle_interface(&name)?)
    });
}
