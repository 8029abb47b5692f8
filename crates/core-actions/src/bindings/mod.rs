//! Handlers grouped by concern. Each submodule's `install` binds its events.

pub(crate) mod control;
pub(crate) mod cursor;
pub(crate) mod layout;
pub(crate) mod remote;
pub(crate) mod render;

use anyhow::Result;
use core_events::{Dispatcher, Reply, Value};
use core_state::Engine;

/// Name of the per-region refresh event bound by [`crate::define`].
pub fn refresh_event(region: &str) -> String {
    format!("_refresh_{region}_")
}

/// Trigger a follow-up event and pass its signal (or last value) through.
pub(crate) fn cascade(
    dispatcher: &Dispatcher<Engine>,
    engine: &mut Engine,
    event: &str,
    args: &[Value],
) -> Result<Reply> {
    Ok(dispatcher.trigger(engine, event, args)?.into())
}

pub(crate) fn done() -> Result<Reply> {
    Ok(Reply::None)
}

pub(crate) fn value(value: impl Into<Value>) -> Result<Reply> {
    Ok(Reply::Value(value.into()))
}
