//! Terminal input for termpane.
//!
//! - `keys`: byte sequences and crossterm key events -> key names.
//! - `keymap`: key name -> system event table.
//! - the async input task, which turns the crossterm event stream into
//!   `Event::Input` values on the main loop channel.

mod async_service;
pub mod keymap;
pub mod keys;

pub use async_service::{AsyncInputShutdown, InputMode};
pub use keymap::{KeyAction, Keymap};
pub use keys::{decode, decode_all, key_name, printable};

use async_service::spawn_async_event_task;
use core_events::Event;
use tokio::task::JoinHandle;

/// Spawn the async input service backed by `crossterm::EventStream`.
///
/// Returns the `JoinHandle` for the background task alongside a shutdown handle
/// that can be used to request immediate termination. `mode` is consulted on
/// every key, so flipping it takes effect immediately.
pub fn spawn_async_input(
    sender: tokio::sync::mpsc::Sender<Event>,
    mode: InputMode,
) -> (JoinHandle<()>, AsyncInputShutdown) {
    spawn_async_event_task(sender, mode)
}

pub(crate) mod metrics {
    use std::sync::atomic::AtomicU64;

    pub static ASYNC_INPUT_STARTS: AtomicU64 = AtomicU64::new(0);
    pub static ASYNC_INPUT_STOP_SIGNAL: AtomicU64 = AtomicU64::new(0);
    pub static ASYNC_INPUT_STOP_CHANNEL: AtomicU64 = AtomicU64::new(0);
    pub static ASYNC_INPUT_STOP_STREAM: AtomicU64 = AtomicU64::new(0);
    pub static ASYNC_INPUT_STOP_ERROR: AtomicU64 = AtomicU64::new(0);
    pub static CHANNEL_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);
    pub static KEYPRESS_TOTAL: AtomicU64 = AtomicU64::new(0);
    pub static KEYPRESS_REPEAT: AtomicU64 = AtomicU64::new(0);
    pub static LINES_TOTAL: AtomicU64 = AtomicU64::new(0);
    pub static PASTE_SESSIONS: AtomicU64 = AtomicU64::new(0);
    pub static PASTE_BYTES: AtomicU64 = AtomicU64::new(0);
}

/// Process-wide input counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputMetricsSnapshot {
    pub task_starts: u64,
    pub keypresses: u64,
    pub repeats: u64,
    pub lines: u64,
    pub pastes: u64,
    pub paste_bytes: u64,
    pub send_failures: u64,
}

pub fn metrics_snapshot() -> InputMetricsSnapshot {
    use std::sync::atomic::Ordering::Relaxed;
    InputMetricsSnapshot {
        task_starts: metrics::ASYNC_INPUT_STARTS.load(Relaxed),
        keypresses: metrics::KEYPRESS_TOTAL.load(Relaxed),
        repeats: metrics::KEYPRESS_REPEAT.load(Relaxed),
        lines: metrics::LINES_TOTAL.load(Relaxed),
        pastes: metrics::PASTE_SESSIONS.load(Relaxed),
        paste_bytes: metrics::PASTE_BYTES.load(Relaxed),
        send_failures: metrics::CHANNEL_SEND_FAILURES.load(Relaxed),
    }
}
