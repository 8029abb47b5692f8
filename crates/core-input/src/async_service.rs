use crate::keys::{key_name, printable};
use crate::metrics::{
    ASYNC_INPUT_STARTS, ASYNC_INPUT_STOP_CHANNEL, ASYNC_INPUT_STOP_ERROR, ASYNC_INPUT_STOP_SIGNAL,
    ASYNC_INPUT_STOP_STREAM, CHANNEL_SEND_FAILURES, KEYPRESS_REPEAT, KEYPRESS_TOTAL, LINES_TOTAL,
    PASTE_BYTES, PASTE_SESSIONS,
};
use core_events::{Event, InputEvent};
use crossterm::event::{Event as CEvent, EventStream, KeyEvent as CKeyEvent, KeyEventKind as CKind};
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering::Relaxed};
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::StreamExt;
use tracing::{debug, info, trace, warn};

#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Debug)]
struct ShutdownListener {
    notify: Arc<Notify>,
}

impl ShutdownListener {
    fn new_pair() -> (AsyncInputShutdown, Self) {
        let notify = Arc::new(Notify::new());
        (
            AsyncInputShutdown {
                notify: notify.clone(),
            },
            ShutdownListener { notify },
        )
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Whether keys are forwarded one by one (raw) or assembled into lines
/// (cooked). Shared between the main loop, which flips it on a mode
/// switch, and the input task, which reads it per key.
#[derive(Clone, Debug, Default)]
pub struct InputMode {
    cooked: Arc<AtomicBool>,
}

impl InputMode {
    pub fn raw() -> Self {
        Self::default()
    }

    pub fn cooked() -> Self {
        let mode = Self::default();
        mode.set_cooked(true);
        mode
    }

    pub fn is_cooked(&self) -> bool {
        self.cooked.load(Relaxed)
    }

    pub fn set_cooked(&self, cooked: bool) {
        self.cooked.store(cooked, Relaxed);
    }

    /// Flip the mode, returning whether it is now cooked.
    pub fn toggle(&self) -> bool {
        !self.cooked.fetch_xor(true, Relaxed)
    }
}

/// Spawn a Tokio task reading `crossterm::EventStream`.
pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
    mode: InputMode,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let (shutdown, listener) = ShutdownListener::new_pair();
    let handle = task::spawn(async move {
        let span = tracing::debug_span!(target: "input.thread", "input_async_task");
        let _enter = span.enter();

        if let Err(join_err) = task::spawn_blocking(enable_bracketed_paste).await {
            debug!(target: "input.paste", ?join_err, "enable_failed_join");
        }

        let stream = EventStream::new();
        AsyncEventStreamTask::new(sender, stream, listener, mode)
            .run()
            .await;

        if let Err(join_err) = task::spawn_blocking(disable_bracketed_paste).await {
            debug!(target: "input.paste", ?join_err, "disable_failed_join");
        }
    });

    (handle, shutdown)
}

fn enable_bracketed_paste() {
    if let Err(e) = write!(io::stdout(), "\x1b[?2004h") {
        debug!(target: "input.paste", ?e, "enable_failed");
    }
    let _ = io::stdout().flush();
}

fn disable_bracketed_paste() {
    if let Err(e) = write!(io::stdout(), "\x1b[?2004l") {
        debug!(target: "input.paste", ?e, "disable_failed");
    }
    let _ = io::stdout().flush();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    Running,
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::Running => "running",
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }
}

struct AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    sender: Sender<Event>,
    stream: S,
    shutdown: ShutdownListener,
    mode: InputMode,
    line: String,
    exit_reason: ExitReason,
    stream_error: Option<io::ErrorKind>,
}

impl<S> AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    fn new(sender: Sender<Event>, stream: S, shutdown: ShutdownListener, mode: InputMode) -> Self {
        Self {
            sender,
            stream,
            shutdown,
            mode,
            line: String::new(),
            exit_reason: ExitReason::Running,
            stream_error: None,
        }
    }

    pub async fn run(mut self) {
        info!(target: "input.thread", "async_input_task_started");
        ASYNC_INPUT_STARTS.fetch_add(1, Relaxed);
        self.exit_reason = ExitReason::StreamEnded;
        loop {
            let maybe_result = tokio::select! {
                biased;
                _ = self.shutdown.wait() => {
                    self.exit_reason = ExitReason::ShutdownSignal;
                    break;
                }
                result = self.stream.next() => result,
            };

            let Some(result) = maybe_result else {
                break;
            };

            let keep_going = match result {
                Ok(CEvent::Key(key)) => self.handle_key_event(key).await,
                Ok(CEvent::Resize(w, h)) => {
                    trace!(target: "input.event", w, h, "resize");
                    self.send_event(Event::Input(InputEvent::Resize(w, h)))
                        .await
                }
                Ok(CEvent::Paste(data)) => self.handle_paste(data).await,
                Ok(_) => true,
                Err(err) => {
                    self.exit_reason = ExitReason::StreamError;
                    self.stream_error = Some(err.kind());
                    false
                }
            };
            if !keep_going {
                break;
            }
        }

        let reason = match self.exit_reason {
            ExitReason::Running => ExitReason::StreamEnded,
            other => other,
        };

        match reason {
            ExitReason::ShutdownSignal => {
                ASYNC_INPUT_STOP_SIGNAL.fetch_add(1, Relaxed);
            }
            ExitReason::ChannelClosed => {
                ASYNC_INPUT_STOP_CHANNEL.fetch_add(1, Relaxed);
            }
            ExitReason::StreamEnded => {
                ASYNC_INPUT_STOP_STREAM.fetch_add(1, Relaxed);
            }
            ExitReason::StreamError => {
                ASYNC_INPUT_STOP_ERROR.fetch_add(1, Relaxed);
            }
            ExitReason::Running => {}
        }

        if matches!(reason, ExitReason::StreamError) {
            if let Some(kind) = self.stream_error {
                warn!(target: "input.thread", error_kind = ?kind, "async_input_task_stream_error");
            } else {
                warn!(target: "input.thread", "async_input_task_stream_error");
            }
        }

        if matches!(reason, ExitReason::StreamEnded | ExitReason::StreamError)
            && self.sender.send(Event::Shutdown).await.is_err()
        {
            CHANNEL_SEND_FAILURES.fetch_add(1, Relaxed);
        }

        info!(target: "input.thread", reason = reason.as_str(), "async_input_task_stopped");
    }

    async fn handle_key_event(&mut self, key: CKeyEvent) -> bool {
        if !matches!(key.kind, CKind::Press | CKind::Repeat) {
            return true;
        }
        let Some(name) = key_name(&key) else {
            trace!(target: "input.keys", code = ?key.code, "unmapped_key");
            return true;
        };
        let repeat = matches!(key.kind, CKind::Repeat);
        if self.mode.is_cooked() {
            return self.handle_cooked(name).await;
        }
        self.emit_key(name, repeat).await
    }

    /// Line assembly: printable keys extend the line, `enter` submits it,
    /// `backspace` edits it. Anything else still goes out as a key so mode
    /// switch and exit keep working.
    async fn handle_cooked(&mut self, name: String) -> bool {
        if let Some(ch) = printable(&name) {
            self.line.push(ch);
            return true;
        }
        match name.as_str() {
            "enter" => self.emit_line().await,
            "backspace" => {
                self.line.pop();
                true
            }
            _ => self.emit_key(name, false).await,
        }
    }

    async fn handle_paste(&mut self, data: String) -> bool {
        trace!(target: "input.paste", len = data.len(), "paste_event");
        PASTE_SESSIONS.fetch_add(1, Relaxed);
        PASTE_BYTES.fetch_add(data.len() as u64, Relaxed);
        let cooked = self.mode.is_cooked();
        for ch in data.chars() {
            let keep_going = match ch {
                '\r' | '\n' if cooked => self.emit_line().await,
                _ if cooked => {
                    self.line.push(ch);
                    true
                }
                '\r' | '\n' => self.emit_key("enter".to_string(), false).await,
                ' ' => self.emit_key("space".to_string(), false).await,
                '\t' => self.emit_key("tab".to_string(), false).await,
                _ => self.emit_key(ch.to_string(), false).await,
            };
            if !keep_going {
                return false;
            }
        }
        trace!(target: "input.paste", "paste_event_end");
        true
    }

    async fn emit_key(&mut self, name: String, repeat: bool) -> bool {
        trace!(target: "input.event", kind = "keypress", repeat, key = name.as_str());
        let sent = self.send_event(Event::Input(InputEvent::Key(name))).await;
        if sent {
            KEYPRESS_TOTAL.fetch_add(1, Relaxed);
            if repeat {
                KEYPRESS_REPEAT.fetch_add(1, Relaxed);
            }
        }
        sent
    }

    async fn emit_line(&mut self) -> bool {
        let line = std::mem::take(&mut self.line);
        trace!(target: "input.event", kind = "line", len = line.len());
        let sent = self.send_event(Event::Input(InputEvent::Line(line))).await;
        if sent {
            LINES_TOTAL.fetch_add(1, Relaxed);
        }
        sent
    }

    async fn send_event(&mut self, event: Event) -> bool {
        match self.sender.send(event).await {
            Ok(_) => true,
            Err(_) => {
                CHANNEL_SEND_FAILURES.fetch_add(1, Relaxed);
                if !matches!(self.exit_reason, ExitReason::ShutdownSignal) {
                    self.exit_reason = ExitReason::ChannelClosed;
                }
                false
            }
        }
    }
}
