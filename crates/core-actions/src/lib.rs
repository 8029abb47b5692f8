//! System event bindings.
//!
//! [`install`] binds every built-in `_name_` event on a `Dispatcher<Engine>`:
//! drawing (`_refresh_`, `_clear_`, visibility), cursors, geometry, focus,
//! resize, key routing, mode/exit control and remote control. Hosts add
//! their own events next to these with `Dispatcher::bind`; the built-ins
//! cascade into host events where the design calls for it (`_command_`
//! triggers `command`, an unbound key triggers the event named after it,
//! `_cleanup_` triggers `cleanup`).
//!
//! Region arguments are optional wherever an operation acts on one region:
//! without one the focused region is used.

mod args;
mod bindings;

pub use bindings::refresh_event;

use core_events::{BindOptions, Dispatcher};
use core_input::Keymap;
use core_model::RegionSpec;
use core_state::Engine;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Debounce applied to `_resize_` unless configured otherwise.
pub const DEFAULT_RESIZE_DELAY: Duration = Duration::from_millis(150);

#[derive(Debug, Clone)]
pub struct Options {
    pub keymap: Keymap,
    pub resize_delay: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            keymap: Keymap::defaults(),
            resize_delay: DEFAULT_RESIZE_DELAY,
        }
    }
}

/// Bind every system event. Calling it twice appends duplicate handlers.
pub fn install(dispatcher: &Dispatcher<Engine>, options: &Options) {
    bindings::render::install(dispatcher);
    bindings::cursor::install(dispatcher);
    bindings::layout::install(dispatcher, options.resize_delay);
    bindings::control::install(dispatcher, Arc::new(options.keymap.clone()));
    bindings::remote::install(dispatcher);
    debug!(target: "events.dispatch", events = dispatcher.names().len(), "system_events_installed");
}

/// Define (or redefine) a region and bind its own refresh event,
/// `_refresh_<name>_`, debounced by the region's delay.
pub fn define(
    dispatcher: &Dispatcher<Engine>,
    engine: &mut Engine,
    spec: &RegionSpec,
) -> anyhow::Result<()> {
    engine.define(spec)?;
    let event = refresh_event(&spec.name);
    let delay = Some(spec.delay).filter(|d| !d.is_zero());
    if dispatcher.is_registered(&event) {
        dispatcher.set_delay(&event, delay);
        return Ok(());
    }
    let name = spec.name.clone();
    dispatcher.bind_with(event, BindOptions { delay }, move |_, engine, _| {
        engine.refresh(&name)?;
        Ok(core_events::Reply::None)
    });
    Ok(())
}
