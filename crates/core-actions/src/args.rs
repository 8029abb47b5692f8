//! Argument extraction for system events.

use anyhow::{Result, anyhow};
use core_events::Value;
use core_state::Engine;

/// The region named by `args[index]`, or the focused region.
pub(crate) fn region(engine: &Engine, args: &[Value], index: usize) -> Result<String> {
    match args.get(index).and_then(Value::as_str) {
        Some(name) => Ok(name.to_string()),
        None => Ok(engine.focused_name()?),
    }
}

pub(crate) fn optional_str(args: &[Value], index: usize) -> Option<&str> {
    args.get(index).and_then(Value::as_str)
}

pub(crate) fn required_str<'a>(args: &'a [Value], index: usize, what: &str) -> Result<&'a str> {
    optional_str(args, index).ok_or_else(|| anyhow!("missing argument `{what}`"))
}

pub(crate) fn required_u16(args: &[Value], index: usize, what: &str) -> Result<u16> {
    let value = args
        .get(index)
        .and_then(Value::as_int)
        .ok_or_else(|| anyhow!("missing argument `{what}`"))?;
    u16::try_from(value).map_err(|_| anyhow!("argument `{what}` out of range: {value}"))
}
