//! termpane entrypoint.
use anyhow::{Result, anyhow};
use clap::Parser;
use core_actions::Options;
use core_config::{BackendName, Config, ModeName};
use core_events::{
    Dispatcher, EVENT_CHANNEL_CAP, Event, EventSourceRegistry, InputEvent, Outcome, RemoteReply,
    RemoteRequest, Reply, Signal, TickEventSource, Value,
};
use core_geometry::{Border, Canvas, GeometrySpec};
use core_input::{AsyncInputShutdown, InputMode, Keymap};
use core_model::{Content, RegionSpec};
use core_remote::{ChannelRemote, RemoteControl, reply_for, trigger_args};
use core_render::{
    NullRenderer, RenderDispatcher, SharedOutput, TerminalRenderer, esc, shared_output,
    shared_stdout,
};
use core_state::Engine;
use core_terminal::{
    CrosstermBackend, HeadlessBackend, TerminalBackend, TerminalGuard, TerminalMode,
};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

const TITLE: &str = "termpane";
const STATUS_REGION: &str = "status";
const HEADLESS_SIZE: (u16, u16) = (80, 24);
const TICK_INTERVAL: Duration = Duration::from_millis(250);
const JOIN_TIMEOUT: Duration = Duration::from_millis(200);

#[derive(Parser, Debug)]
#[command(name = "termpane", version, about = "Terminal pane engine")]
struct Args {
    /// Configuration file path (overrides discovery of `termpane.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// Log file path (overrides the configured one).
    #[arg(long = "log")]
    log: Option<PathBuf>,
    /// Start with cooked (line) input instead of raw keys.
    #[arg(long)]
    cooked: bool,
    /// Leave the terminal alone and render into memory.
    #[arg(long)]
    headless: bool,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self, log_path: &Path, filter: &str) -> Result<()> {
        if log_path.exists() {
            let _ = std::fs::remove_file(log_path);
        }
        let dir = log_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let file = log_path
            .file_name()
            .ok_or_else(|| anyhow!("log path {} has no file name", log_path.display()))?;

        let file_appender = tracing_appender::rolling::never(dir, file);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
        if tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

/// How the runtime was asked to present itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Presentation {
    headless: bool,
    fixed_canvas: bool,
}

enum LoopControl {
    Continue,
    Break { reason: ShutdownReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    ExitSignal,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::ExitSignal => "exit_signal",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

fn write_raw(output: &SharedOutput, bytes: &str) -> Result<()> {
    let mut out = output
        .lock()
        .map_err(|_| anyhow!("terminal output lock poisoned"))?;
    out.write_all(bytes.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Renderer set for the configured backends. Headless runs never write to
/// the terminal; they capture instead.
fn build_renderer(
    config: &Config,
    output: SharedOutput,
    headless: bool,
) -> (RenderDispatcher, bool) {
    let mut renderer = RenderDispatcher::new(output);
    let mut capture = headless || config.file.remote.enabled;
    for backend in &config.file.render.backends {
        match backend {
            BackendName::Terminal if headless => capture = true,
            BackendName::Terminal => renderer.add(TerminalRenderer::new()),
            BackendName::Null => renderer.add(NullRenderer),
            BackendName::Capture => capture = true,
        }
    }
    (renderer, capture)
}

/// Layout used when the configuration declares no regions: a bordered
/// pane over everything but the last row, which holds a status line.
fn demo_layout(canvas: Canvas) -> Vec<RegionSpec> {
    let rows = i32::from(canvas.height);
    let main = RegionSpec::new("main")
        .geometry(GeometrySpec {
            y: Some(1),
            x: Some(1),
            height: Some((rows - 1).max(1)),
            ..GeometrySpec::default()
        })
        .border(Border::enabled().with_title(TITLE))
        .lines(&[
            "arrow keys move the cursor",
            "tab cycles focus",
            "escape switches between raw and cooked input",
            "q exits",
        ]);
    let status = RegionSpec::new(STATUS_REGION)
        .geometry(GeometrySpec {
            y: Some(rows.max(1)),
            height: Some(1),
            ..GeometrySpec::default()
        })
        .style(&["reverse"])
        .cursor_visible(false)
        .lines(&["raw mode"]);
    vec![main, status]
}

/// Host events the built-ins cascade into.
fn bind_host_events(dispatcher: &Dispatcher<Engine>) {
    dispatcher.bind("command", |d, engine, args| {
        let line = args.first().map(Value::to_string).unwrap_or_default();
        info!(target: "runtime.command", len = line.len(), "command_line");
        if !engine.contains(STATUS_REGION) {
            return Ok(Reply::None);
        }
        engine.enqueue(STATUS_REGION, Content::from_text(&[format!("> {line}")]))?;
        Ok(d.trigger(engine, "_refresh_", &[Value::from(STATUS_REGION)])?.into())
    });
    dispatcher.bind("cleanup", |_, engine, _| {
        info!(target: "runtime", regions = engine.names().len(), "cleanup");
        Ok(Reply::None)
    });
}

/// Everything assembled at startup that the loop owns.
struct RuntimeContext<'a, B: TerminalBackend> {
    engine: Engine,
    dispatcher: Dispatcher<Engine>,
    terminal: TerminalGuard<'a, B>,
    output: SharedOutput,
    presentation: Presentation,
}

fn bootstrap<'a, B: TerminalBackend>(
    backend: &'a mut B,
    config: &Config,
    headless: bool,
) -> Result<RuntimeContext<'a, B>> {
    backend.set_title(TITLE)?;
    let terminal = backend.enter_guard()?;
    let (columns, rows) = terminal.size()?;
    let fixed = config.fixed_canvas();
    let canvas = fixed.unwrap_or(Canvas::from_terminal_size(columns, rows));

    let output = if headless {
        shared_output(std::io::sink())
    } else {
        shared_stdout()
    };
    let (renderer, capture) = build_renderer(config, output.clone(), headless);
    let mut engine = Engine::new(canvas, renderer);
    if capture {
        engine.attach_capture();
    }

    let dispatcher = Dispatcher::new();
    core_actions::install(
        &dispatcher,
        &Options {
            keymap: Keymap::defaults(),
            resize_delay: config.file.events.resize_delay(),
        },
    );
    bind_host_events(&dispatcher);

    config.validate(canvas)?;
    let mut specs = config.region_specs();
    let demo = specs.is_empty();
    if demo {
        specs = demo_layout(canvas);
    }
    for spec in &specs {
        core_actions::define(&dispatcher, &mut engine, spec)?;
    }

    info!(
        target: "runtime.startup",
        config = ?config.path,
        height = canvas.height,
        width = canvas.width,
        regions = specs.len(),
        demo,
        headless,
        backends = ?engine.renderer().names(),
        mode = terminal.mode().as_str(),
        "bootstrap_complete"
    );

    Ok(RuntimeContext {
        engine,
        dispatcher,
        terminal,
        output,
        presentation: Presentation {
            headless,
            fixed_canvas: fixed.is_some(),
        },
    })
}

struct Runtime<'a, B: TerminalBackend> {
    engine: Engine,
    dispatcher: Dispatcher<Engine>,
    terminal: TerminalGuard<'a, B>,
    output: SharedOutput,
    presentation: Presentation,
    input_mode: InputMode,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    source_handles: Vec<JoinHandle<()>>,
    input_task: Option<JoinHandle<()>>,
    input_shutdown: Option<AsyncInputShutdown>,
}

impl<'a, B: TerminalBackend> Runtime<'a, B> {
    fn new(
        context: RuntimeContext<'a, B>,
        tx: mpsc::Sender<Event>,
        rx: mpsc::Receiver<Event>,
    ) -> Self {
        let RuntimeContext {
            engine,
            dispatcher,
            terminal,
            output,
            presentation,
        } = context;
        let input_mode = InputMode::raw();
        input_mode.set_cooked(terminal.mode() == TerminalMode::Cooked);
        dispatcher.attach_timer(tx.clone());
        Self {
            engine,
            dispatcher,
            terminal,
            output,
            presentation,
            input_mode,
            rx,
            tx: Some(tx),
            source_handles: Vec::new(),
            input_task: None,
            input_shutdown: None,
        }
    }

    fn spawn_tasks(&mut self, remote_enabled: bool) {
        let Some(tx) = self.tx.clone() else {
            return;
        };
        let (input_task, input_shutdown) =
            core_input::spawn_async_input(tx.clone(), self.input_mode.clone());
        self.input_task = Some(input_task);
        self.input_shutdown = Some(input_shutdown);

        let mut registry = EventSourceRegistry::new();
        registry.register(TickEventSource::new(TICK_INTERVAL));
        self.source_handles = registry.spawn_all(&tx);

        if remote_enabled {
            let remote = ChannelRemote::new(tx);
            self.source_handles.push(tokio::spawn(async move {
                match remote.start().await {
                    Ok(()) => info!(target: "remote", controller = remote.name(), "remote_enabled"),
                    Err(err) => warn!(target: "remote", error = %err, "remote_start_failed"),
                }
            }));
        }
    }

    async fn run(mut self) -> Result<()> {
        if !self.presentation.headless {
            write_raw(&self.output, &esc::screen_init())?;
        }
        let initial = self.dispatcher.trigger(&mut self.engine, "_initialize_", &[]);
        let mut shutdown_reason = match self.apply("_initialize_", initial) {
            LoopControl::Break { reason } => Some(reason),
            LoopControl::Continue => None,
        };

        if shutdown_reason.is_none() {
            let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
            let _enter_loop = loop_span.enter();
            while let Some(event) = self.rx.recv().await {
                if let LoopControl::Break { reason } = self.handle_event(event) {
                    shutdown_reason = Some(reason);
                    break;
                }
            }
        }

        self.rx.close();
        self.finalize_shutdown(shutdown_reason.unwrap_or(ShutdownReason::ChannelClosed))
            .await;
        if !self.presentation.headless {
            write_raw(&self.output, &esc::screen_exit(self.engine.canvas().height))?;
        }
        self.terminal.release()
    }

    fn handle_event(&mut self, event: Event) -> LoopControl {
        match event {
            Event::Input(InputEvent::Key(key)) => {
                self.trigger("_keypress_", &[Value::from(key)])
            }
            Event::Input(InputEvent::Line(line)) => {
                self.trigger("_command_", &[Value::from(line)])
            }
            Event::Input(InputEvent::Resize(columns, rows)) => self.handle_resize(columns, rows),
            Event::Deferred { name, generation } => {
                let result = self
                    .dispatcher
                    .fire_deferred(&mut self.engine, &name, generation);
                self.apply(&name, result)
            }
            Event::Remote(request) => self.handle_remote(request),
            Event::Tick => {
                trace!(target: "runtime", "tick");
                self.trigger("tick", &[])
            }
            Event::Shutdown => {
                info!(target: "runtime", "shutdown_requested");
                match self.trigger("_exit_", &[]) {
                    LoopControl::Continue => LoopControl::Break {
                        reason: ShutdownReason::ShutdownEvent,
                    },
                    brk => brk,
                }
            }
        }
    }

    fn handle_resize(&mut self, columns: u16, rows: u16) -> LoopControl {
        if self.presentation.fixed_canvas {
            debug!(target: "runtime", columns, rows, "resize_ignored_fixed_canvas");
            return LoopControl::Continue;
        }
        self.trigger(
            "_resize_",
            &[Value::from(i64::from(rows)), Value::from(i64::from(columns))],
        )
    }

    fn handle_remote(&mut self, request: RemoteRequest) -> LoopControl {
        let RemoteRequest { command, reply } = request;
        let event = command.event_name();
        let result = self
            .dispatcher
            .trigger(&mut self.engine, event, &trigger_args(&command));
        let signal = result.as_ref().ok().and_then(|outcome| outcome.signal);
        let answer = reply_for(&command, result);
        if let RemoteReply::Failed(reason) = &answer {
            warn!(target: "remote", event, reason = reason.as_str(), "remote_request_failed");
        }
        if reply.send(answer).is_err() {
            debug!(target: "remote", event, "remote_reply_dropped");
        }
        self.apply_signal(event, signal)
    }

    fn trigger(&mut self, name: &str, args: &[Value]) -> LoopControl {
        let result = self.dispatcher.trigger(&mut self.engine, name, args);
        self.apply(name, result)
    }

    fn apply(&mut self, name: &str, result: Result<Outcome>) -> LoopControl {
        match result {
            Ok(outcome) => self.apply_signal(name, outcome.signal),
            Err(err) => {
                error!(
                    target: "runtime.events",
                    event = name,
                    error = %format!("{err:#}"),
                    "event_failed"
                );
                LoopControl::Continue
            }
        }
    }

    fn apply_signal(&mut self, name: &str, signal: Option<Signal>) -> LoopControl {
        match signal {
            None => LoopControl::Continue,
            Some(Signal::ModeSwitch) => {
                self.switch_mode();
                LoopControl::Continue
            }
            Some(Signal::Exit) => {
                info!(target: "runtime", event = name, "exit_signalled");
                LoopControl::Break {
                    reason: ShutdownReason::ExitSignal,
                }
            }
        }
    }

    fn switch_mode(&mut self) {
        let mode = match self.terminal.switch_mode() {
            Ok(mode) => mode,
            Err(err) => {
                error!(target: "runtime", error = %err, "mode_switch_failed");
                return;
            }
        };
        self.input_mode.set_cooked(mode == TerminalMode::Cooked);
        info!(target: "runtime", mode = mode.as_str(), "mode_switched");
        if self.engine.contains(STATUS_REGION) {
            let text = format!("{} mode", mode.as_str());
            if let Err(err) = self
                .engine
                .enqueue(STATUS_REGION, Content::from_text(&[text]))
            {
                warn!(target: "runtime", error = %err, "status_update_failed");
            }
        }
        let _ = self.trigger("_refresh_", &[]);
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");
        self.dispatcher.detach_timer();
        if let Some(tx) = self.tx.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "dropping_runtime_sender"
            );
            drop(tx);
        }

        while let Some(handle) = self.source_handles.pop() {
            match tokio::time::timeout(JOIN_TIMEOUT, handle).await {
                Ok(Ok(_)) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_stopped"
                ),
                Ok(Err(err)) if err.is_cancelled() => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_cancelled"
                ),
                Ok(Err(err)) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "event_source_task_error"
                ),
                Err(_) => warn!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_timeout"
                ),
            }
        }

        if let Some(shutdown) = self.input_shutdown.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "input_task_shutdown_signal"
            );
            shutdown.signal();
        }

        if let Some(handle) = self.input_task.take() {
            match handle.await {
                Ok(_) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_joined"
                ),
                Err(err) if err.is_cancelled() => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_cancelled"
                ),
                Err(err) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "input_task_join_failed"
                ),
            }
        }

        let metrics = self.dispatcher.metrics_snapshot();
        let input = core_input::metrics_snapshot();
        info!(
            target: "runtime.shutdown",
            triggers = metrics.triggers,
            deferred_fired = metrics.deferred_fired,
            deferred_stale = metrics.deferred_stale,
            keypresses = input.keypresses,
            lines = input.lines,
            "event_totals"
        );
        log_shutdown_stage(reason, "complete");
    }
}

async fn run_with<B: TerminalBackend>(
    backend: &mut B,
    config: &Config,
    headless: bool,
) -> Result<()> {
    let context = bootstrap(backend, config, headless)?;
    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let mut runtime = Runtime::new(context, tx, rx);
    runtime.spawn_tasks(config.file.remote.enabled);
    runtime.run().await
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = core_config::load_from(args.config.clone())?;

    let mut startup = AppStartup::new();
    let log_path = args.log.clone().unwrap_or_else(|| config.file.log.path.clone());
    startup.configure_logging(&log_path, &config.file.log.filter)?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let mode = if args.cooked || config.file.terminal.mode == ModeName::Cooked {
        TerminalMode::Cooked
    } else {
        TerminalMode::Raw
    };

    let result = if args.headless {
        let (columns, rows) = config
            .fixed_canvas()
            .map_or(HEADLESS_SIZE, |canvas| (canvas.width, canvas.height));
        let mut backend = HeadlessBackend::new(columns, rows);
        backend.set_mode(mode)?;
        run_with(&mut backend, &config, true).await
    } else {
        let mut backend = CrosstermBackend::with_mode(mode);
        run_with(&mut backend, &config, false).await
    };

    if let Err(err) = &result {
        error!(target: "runtime", error = %format!("{err:#}"), "fatal");
    }
    info!(target: "runtime", "exit");
    drop(startup);
    result
}
