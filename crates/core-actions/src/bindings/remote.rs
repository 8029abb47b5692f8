//! Remote-control events. The transport lives in `core-remote`; these
//! handlers are what its requests turn into on the main loop.

use super::{cascade, done, value};
use crate::args;
use core_events::{Dispatcher, RemoteStatus, Value};
use core_state::Engine;
use tracing::info;

pub(crate) fn install(d: &Dispatcher<Engine>) {
    // Args: data, optional type. Type `command` injects a cooked-mode
    // line; anything else is a key name.
    d.bind("_remote_input_", |d, engine, args| {
        let data = args::required_str(args, 0, "data")?.to_string();
        let event = match args::optional_str(args, 1) {
            Some("command") => "_command_",
            _ => "_keypress_",
        };
        cascade(d, engine, event, &[Value::from(data)])
    });

    d.bind("_remote_retrieve_output_", |_, engine, _| {
        value(engine.last_output())
    });

    d.bind("_remote_start_", |_, engine, _| {
        engine.set_remote_running(true);
        info!(target: "remote", status = RemoteStatus::Running.as_str(), "remote_status_changed");
        done()
    });

    d.bind("_remote_stop_", |_, engine, _| {
        engine.set_remote_running(false);
        info!(target: "remote", status = RemoteStatus::Stopped.as_str(), "remote_status_changed");
        done()
    });

    d.bind("_remote_status_", |_, engine, _| {
        let status = if engine.remote_running() {
            RemoteStatus::Running
        } else {
            RemoteStatus::Stopped
        };
        value(status.as_str())
    });
}
