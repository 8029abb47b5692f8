//! Name-keyed handler registry with synchronous dispatch and debounce.
//!
//! `trigger` runs every handler bound to a name in registration order on the
//! caller's thread. Handlers receive the dispatcher itself, so an event can
//! cascade into further triggers. The handler list is cloned out of the
//! registry before any handler runs; handlers may bind or unbind freely.
//!
//! A name bound with a delay is debounced once a timer sink is attached:
//! each trigger stores the latest arguments, bumps the name's generation and
//! restarts a timer. When the timer expires it posts `Event::Deferred` to the
//! main loop, which calls [`Dispatcher::fire_deferred`]. Only the newest
//! generation runs, so N triggers closer together than the delay produce one
//! invocation at `last_trigger + delay`, always on the main loop.
//!
//! Cascades are bounded: a trigger nested deeper than [`MAX_TRIGGER_DEPTH`]
//! fails with an error instead of recursing until the stack overflows.

use crate::Event;
use crate::value::{Outcome, Reply, Signal, Value};
use anyhow::{Context, Result, bail};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering::Relaxed};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Deepest allowed nesting of triggers issued from inside handlers.
pub const MAX_TRIGGER_DEPTH: usize = 64;

pub type Handler<C> =
    Arc<dyn Fn(&Dispatcher<C>, &mut C, &[Value]) -> Result<Reply> + Send + Sync>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindOptions {
    /// Debounce window; `None` or zero dispatches immediately.
    pub delay: Option<Duration>,
}

impl BindOptions {
    pub fn delayed(delay: Duration) -> Self {
        Self { delay: Some(delay) }
    }
}

struct Binding<C> {
    handlers: Vec<Handler<C>>,
    delay: Option<Duration>,
}

impl<C> Default for Binding<C> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
            delay: None,
        }
    }
}

struct Pending {
    generation: u64,
    args: Vec<Value>,
    timer: Option<JoinHandle<()>>,
}

#[derive(Debug, Default)]
struct DispatcherMetrics {
    triggers: AtomicU64,
    handler_runs: AtomicU64,
    deferred_scheduled: AtomicU64,
    deferred_fired: AtomicU64,
    deferred_stale: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherMetricsSnapshot {
    pub triggers: u64,
    pub handler_runs: u64,
    pub deferred_scheduled: u64,
    pub deferred_fired: u64,
    pub deferred_stale: u64,
}

impl DispatcherMetrics {
    fn snapshot(&self) -> DispatcherMetricsSnapshot {
        DispatcherMetricsSnapshot {
            triggers: self.triggers.load(Relaxed),
            handler_runs: self.handler_runs.load(Relaxed),
            deferred_scheduled: self.deferred_scheduled.load(Relaxed),
            deferred_fired: self.deferred_fired.load(Relaxed),
            deferred_stale: self.deferred_stale.load(Relaxed),
        }
    }
}

pub struct Dispatcher<C> {
    bindings: RwLock<BTreeMap<String, Binding<C>>>,
    pending: Mutex<HashMap<String, Pending>>,
    timer: Mutex<Option<Sender<Event>>>,
    generation: AtomicU64,
    depth: AtomicUsize,
    metrics: DispatcherMetrics,
}

/// Holds one level of trigger nesting; released on drop.
struct DepthGuard<'a>(&'a AtomicUsize);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Relaxed);
    }
}

impl<C> std::fmt::Debug for Dispatcher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("events", &self.names())
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}

impl<C> Default for Dispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<C> Dispatcher<C> {
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(BTreeMap::new()),
            pending: Mutex::new(HashMap::new()),
            timer: Mutex::new(None),
            generation: AtomicU64::new(0),
            depth: AtomicUsize::new(0),
            metrics: DispatcherMetrics::default(),
        }
    }

    /// Append `handler` to `name`'s list.
    pub fn bind<F>(&self, name: impl Into<String>, handler: F)
    where
        F: Fn(&Dispatcher<C>, &mut C, &[Value]) -> Result<Reply> + Send + Sync + 'static,
    {
        self.bind_with(name, BindOptions::default(), handler);
    }

    /// Append `handler` and set the name's debounce delay. The delay applies
    /// to the name as a whole; the last `bind_with` carrying one wins.
    pub fn bind_with<F>(&self, name: impl Into<String>, options: BindOptions, handler: F)
    where
        F: Fn(&Dispatcher<C>, &mut C, &[Value]) -> Result<Reply> + Send + Sync + 'static,
    {
        let name = name.into();
        trace!(target: "events.dispatch", event = name.as_str(), "bind");
        let mut bindings = self.bindings.write().unwrap_or_else(PoisonError::into_inner);
        let binding = bindings.entry(name).or_default();
        binding.handlers.push(Arc::new(handler));
        if options.delay.is_some() {
            binding.delay = options.delay;
        }
    }

    /// Change the debounce delay of an already bound name.
    pub fn set_delay(&self, name: &str, delay: Option<Duration>) -> bool {
        let mut bindings = self.bindings.write().unwrap_or_else(PoisonError::into_inner);
        match bindings.get_mut(name) {
            Some(binding) => {
                binding.delay = delay;
                true
            }
            None => false,
        }
    }

    /// Drop every handler for `name` and cancel its pending debounce.
    pub fn unbind(&self, name: &str) -> bool {
        let removed = self
            .bindings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
            .is_some();
        if let Some(pending) = lock(&self.pending).remove(name)
            && let Some(timer) = pending.timer
        {
            timer.abort();
        }
        trace!(target: "events.dispatch", event = name, removed, "unbind");
        removed
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn handler_count(&self, name: &str) -> usize {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map_or(0, |b| b.handlers.len())
    }

    /// Bound event names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Route debounce expiries to the main loop through `tx`.
    pub fn attach_timer(&self, tx: Sender<Event>) {
        *lock(&self.timer) = Some(tx);
    }

    /// Release the timer sink so the channel can close, aborting timers in
    /// flight. Later debounced triggers run inline.
    pub fn detach_timer(&self) {
        lock(&self.timer).take();
        self.cancel_pending();
    }

    pub fn cancel_pending(&self) {
        for (name, pending) in lock(&self.pending).drain() {
            if let Some(timer) = pending.timer {
                timer.abort();
            }
            trace!(target: "events.debounce", event = name.as_str(), "pending_cancelled");
        }
    }

    pub fn has_pending(&self, name: &str) -> bool {
        lock(&self.pending).contains_key(name)
    }

    pub fn metrics_snapshot(&self) -> DispatcherMetricsSnapshot {
        self.metrics.snapshot()
    }

    fn lookup(&self, name: &str) -> Option<(Vec<Handler<C>>, Option<Duration>)> {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(|b| (b.handlers.clone(), b.delay))
    }

    /// Run `name`'s handlers with `args`, or arm its debounce timer.
    ///
    /// Unbound names are a no-op. A handler error aborts the remaining
    /// handlers and is returned with the event name attached. A handler
    /// replying with a signal also stops the remaining handlers; the signal
    /// is carried in the outcome.
    pub fn trigger(&self, ctx: &mut C, name: &str, args: &[Value]) -> Result<Outcome> {
        self.metrics.triggers.fetch_add(1, Relaxed);
        let Some((handlers, delay)) = self.lookup(name) else {
            trace!(target: "events.dispatch", event = name, "unbound_event");
            return Ok(Outcome::default());
        };
        if let Some(delay) = delay.filter(|d| !d.is_zero()) {
            if self.schedule(name, args, delay) {
                return Ok(Outcome {
                    deferred: true,
                    ..Outcome::default()
                });
            }
            debug!(target: "events.debounce", event = name, "no_timer_sink_running_inline");
        }
        self.run(ctx, name, &handlers, args)
    }

    /// Run a debounced event whose timer expired. Stale generations (a newer
    /// trigger re-armed the timer) are ignored.
    pub fn fire_deferred(&self, ctx: &mut C, name: &str, generation: u64) -> Result<Outcome> {
        let args = {
            let mut pending = lock(&self.pending);
            if pending.get(name).map(|p| p.generation) != Some(generation) {
                self.metrics.deferred_stale.fetch_add(1, Relaxed);
                trace!(target: "events.debounce", event = name, generation, "stale_deferred");
                return Ok(Outcome::default());
            }
            pending.remove(name).map(|p| p.args).unwrap_or_default()
        };
        self.metrics.deferred_fired.fetch_add(1, Relaxed);
        debug!(target: "events.debounce", event = name, generation, "deferred_fired");
        match self.lookup(name) {
            Some((handlers, _)) => self.run(ctx, name, &handlers, &args),
            None => Ok(Outcome::default()),
        }
    }

    fn run(&self, ctx: &mut C, name: &str, handlers: &[Handler<C>], args: &[Value]) -> Result<Outcome> {
        let depth = self.depth.fetch_add(1, Relaxed) + 1;
        let _guard = DepthGuard(&self.depth);
        if depth > MAX_TRIGGER_DEPTH {
            warn!(target: "events.dispatch", event = name, depth, "trigger_depth_exceeded");
            bail!("`{name}` nested deeper than {MAX_TRIGGER_DEPTH} triggers");
        }
        trace!(target: "events.dispatch", event = name, handlers = handlers.len(), args = args.len(), depth, "trigger");
        let mut outcome = Outcome::default();
        for handler in handlers {
            self.metrics.handler_runs.fetch_add(1, Relaxed);
            let reply = handler(self, ctx, args)
                .with_context(|| format!("handler for `{name}` failed"))?;
            match reply {
                Reply::None => {}
                Reply::Value(value) => outcome.values.push(value),
                Reply::Signal(signal) => {
                    debug!(target: "events.dispatch", event = name, signal = signal.as_str(), "signal_raised");
                    outcome.signal = Some(signal);
                    break;
                }
            }
        }
        Ok(outcome)
    }

    /// Arm (or re-arm) the debounce timer for `name`. Returns false when no
    /// timer sink or runtime is available.
    fn schedule(&self, name: &str, args: &[Value], delay: Duration) -> bool {
        let Some(tx) = lock(&self.timer).clone() else {
            return false;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return false;
        };
        let generation = self.generation.fetch_add(1, Relaxed) + 1;
        let deadline = tokio::time::Instant::now() + delay;
        let event_name = name.to_string();
        let timer = runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = tx
                .send(Event::Deferred {
                    name: event_name,
                    generation,
                })
                .await;
        });
        let previous = lock(&self.pending).insert(
            name.to_string(),
            Pending {
                generation,
                args: args.to_vec(),
                timer: Some(timer),
            },
        );
        if let Some(timer) = previous.and_then(|p| p.timer) {
            timer.abort();
        }
        self.metrics.deferred_scheduled.fetch_add(1, Relaxed);
        trace!(
            target: "events.debounce",
            event = name,
            generation,
            delay_ms = delay.as_millis() as u64,
            "debounce_armed"
        );
        true
    }
}

/// `Signal` short-hand for handlers.
pub fn signal(signal: Signal) -> Result<Reply> {
    Ok(Reply::Signal(signal))
}
