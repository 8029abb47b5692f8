//! Event plumbing for termpane.
//!
//! - `dispatcher`: the name-keyed handler registry (`Dispatcher<C>`) with
//!   debounce support; every state change in the engine goes through it.
//! - `value`: handler arguments, replies, control-flow signals.
//! - this module: the `Event` enum consumed by the main loop and the async
//!   sources that feed it.

pub mod dispatcher;
pub mod value;

pub use dispatcher::{
    BindOptions, Dispatcher, DispatcherMetricsSnapshot, Handler, MAX_TRIGGER_DEPTH, signal,
};
pub use value::{Outcome, Reply, Signal, Value};

use std::fmt;
use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Capacity of the main loop channel. Producers await when it is full.
pub const EVENT_CHANNEL_CAP: usize = 1024;

/// Top-level event enum consumed by the main loop.
#[derive(Debug)]
pub enum Event {
    Input(InputEvent),
    /// A debounce timer expired; run the named event if `generation` is
    /// still the newest.
    Deferred { name: String, generation: u64 },
    Remote(RemoteRequest),
    /// Periodic tick from [`TickEventSource`].
    Tick,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Decoded key name (`a`, `up`, `ctrl_c`, `escape`, ...).
    Key(String),
    /// Whole line read in cooked mode.
    Line(String),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteStatus {
    Running,
    Stopped,
}

impl RemoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteStatus::Running => "running",
            RemoteStatus::Stopped => "stopped",
        }
    }
}

impl fmt::Display for RemoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a remote client asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCommand {
    /// Inject input; `kind` selects how `data` is interpreted (`key` by
    /// default, `command` for a cooked-mode line).
    Input { data: String, kind: Option<String> },
    Output,
    Start,
    Stop,
    Status,
}

impl RemoteCommand {
    /// The system event that serves this command.
    pub fn event_name(&self) -> &'static str {
        match self {
            RemoteCommand::Input { .. } => "_remote_input_",
            RemoteCommand::Output => "_remote_retrieve_output_",
            RemoteCommand::Start => "_remote_start_",
            RemoteCommand::Stop => "_remote_stop_",
            RemoteCommand::Status => "_remote_status_",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteReply {
    Done,
    Output(Vec<u8>),
    Status(RemoteStatus),
    Failed(String),
}

/// A remote command travelling to the main loop with its reply slot.
#[derive(Debug)]
pub struct RemoteRequest {
    pub command: RemoteCommand,
    pub reply: oneshot::Sender<RemoteReply>,
}

impl RemoteRequest {
    pub fn new(command: RemoteCommand) -> (Self, oneshot::Receiver<RemoteReply>) {
        let (reply, rx) = oneshot::channel();
        (Self { command, reply }, rx)
    }
}

/// Background producer of loop events.
///
/// Implementors spawn one task that pushes `Event`s into the shared channel
/// and stops once a send fails (consumer gone).
pub trait AsyncEventSource: Send + 'static {
    /// Stable identifier used in logs.
    fn name(&self) -> &'static str;
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

#[derive(Default)]
pub struct EventSourceRegistry {
    sources: Vec<Box<dyn AsyncEventSource>>,
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S: AsyncEventSource>(&mut self, src: S) {
        self.sources.push(Box::new(src));
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Spawn every registered source with its own clone of `tx`. The
    /// registry is drained, so a second call spawns nothing.
    ///
    /// During shutdown drop the last `Sender` before awaiting the returned
    /// handles so the sources observe the closed channel.
    pub fn spawn_all(&mut self, tx: &Sender<Event>) -> Vec<JoinHandle<()>> {
        let mut out = Vec::with_capacity(self.sources.len());
        for src in self.sources.drain(..) {
            let name = src.name();
            tracing::info!(target: "runtime.events", source = name, "spawning_event_source");
            out.push(src.spawn(tx.clone()));
        }
        out
    }
}

/// Emits `Event::Tick` every interval.
pub struct TickEventSource {
    interval: std::time::Duration,
}

impl TickEventSource {
    pub fn new(interval: std::time::Duration) -> Self {
        Self { interval }
    }
}

impl AsyncEventSource for TickEventSource {
    fn name(&self) -> &'static str {
        "tick"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let dur = self.interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(dur);
            loop {
                interval.tick().await;
                if tx.send(Event::Tick).await.is_err() {
                    break;
                }
            }
        })
    }
}
