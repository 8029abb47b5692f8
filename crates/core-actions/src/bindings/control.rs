//! Key routing, commands, logging and loop control.

use super::{cascade, done};
use crate::args;
use core_events::{Dispatcher, Signal, Value, signal};
use core_input::Keymap;
use core_state::Engine;
use std::sync::Arc;
use tracing::{debug, trace, warn};

pub(crate) fn install(d: &Dispatcher<Engine>, keymap: Arc<Keymap>) {
    // Keys bound for the focused region (or globally) run their event; any
    // other key triggers the event named after the key, with the key as
    // its argument. Reserved `_name_` keys are never re-fired.
    d.bind("_keypress_", move |d, engine, args| {
        let key = args::required_str(args, 0, "key")?;
        match keymap.lookup(engine.focused(), key) {
            Some(action) => {
                trace!(target: "input.keys", key, event = action.event.as_str(), "key_bound");
                cascade(d, engine, &action.event, &action.args)
            }
            None if is_system_event(key) => {
                warn!(target: "input.keys", key, "reserved_key_ignored");
                done()
            }
            None => {
                trace!(target: "input.keys", key, "key_unbound");
                cascade(d, engine, key, &[Value::from(key)])
            }
        }
    });

    d.bind("_command_", |d, engine, args| {
        let command = args::required_str(args, 0, "command")?;
        debug!(target: "input.keys", len = command.len(), "command_received");
        cascade(d, engine, "command", &[Value::from(command)])
    });

    d.bind("_log_", |_, _, args| {
        let message = args::required_str(args, 0, "message")?;
        debug!(target: "runtime.log", message, "log_event");
        done()
    });

    d.bind("_mode_switch_", |_, _, _| signal(Signal::ModeSwitch));

    // Cleanup runs first; a signal it raises wins over the exit.
    d.bind("_exit_", |d, engine, _| {
        let outcome = d.trigger(engine, "_cleanup_", &[])?;
        match outcome.signal {
            Some(raised) => signal(raised),
            None => signal(Signal::Exit),
        }
    });

    d.bind("_cleanup_", |d, engine, _| {
        if engine.remote_running() {
            cascade(d, engine, "_remote_stop_", &[])?;
        }
        debug!(target: "runtime.shutdown", "cleanup");
        cascade(d, engine, "cleanup", &[])
    });
}

/// System event names are wrapped in underscores (`_refresh_`).
fn is_system_event(name: &str) -> bool {
    name.len() > 2 && name.starts_with('_') && name.ends_with('_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_event_names_are_recognised() {
        assert!(is_system_event("_keypress_"));
        assert!(is_system_event("_refresh_main_"));
        assert!(!is_system_event("_"));
        assert!(!is_system_event("__"));
        assert!(!is_system_event("a"));
        assert!(!is_system_event("_private"));
        assert!(!is_system_event("ctrl_c"));
    }
}
