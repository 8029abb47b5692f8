//! Concurrent frame fan-out to every registered backend.
//!
//! Each `render` call spawns one scoped thread per backend and joins all of
//! them before returning, so the frame borrow never outlives the call.
//! Backends contend for the shared output through its mutex. A failing or
//! panicking backend is recorded in the report and logged; it never stops
//! the other backends from finishing the same frame.

use crate::backend::{RenderReport, Renderer, SharedOutput, shared_stdout};
use crate::frame::Frame;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};
use std::time::Instant;
use tracing::{error, trace, warn};

/// Per-frame result across backends.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub rendered: Vec<(String, RenderReport)>,
    pub failed: Vec<(String, String)>,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Default)]
struct DispatchMetrics {
    frames: AtomicU64,
    backend_renders: AtomicU64,
    backend_failures: AtomicU64,
    last_dispatch_ns: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchMetricsSnapshot {
    pub frames: u64,
    pub backend_renders: u64,
    pub backend_failures: u64,
    pub last_dispatch_ns: u64,
}

impl DispatchMetrics {
    fn snapshot(&self) -> DispatchMetricsSnapshot {
        DispatchMetricsSnapshot {
            frames: self.frames.load(Relaxed),
            backend_renders: self.backend_renders.load(Relaxed),
            backend_failures: self.backend_failures.load(Relaxed),
            last_dispatch_ns: self.last_dispatch_ns.load(Relaxed),
        }
    }
}

pub struct RenderDispatcher {
    backends: BTreeMap<String, Arc<dyn Renderer>>,
    output: SharedOutput,
    metrics: DispatchMetrics,
}

impl std::fmt::Debug for RenderDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderDispatcher")
            .field("backends", &self.names())
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}

impl Default for RenderDispatcher {
    fn default() -> Self {
        Self::new(shared_stdout())
    }
}

impl RenderDispatcher {
    pub fn new(output: SharedOutput) -> Self {
        Self {
            backends: BTreeMap::new(),
            output,
            metrics: DispatchMetrics::default(),
        }
    }

    pub fn output(&self) -> &SharedOutput {
        &self.output
    }

    /// Register a backend under its own name, replacing any backend already
    /// registered under that name.
    pub fn add<R: Renderer + 'static>(&mut self, renderer: R) {
        self.add_shared(Arc::new(renderer));
    }

    pub fn add_shared(&mut self, renderer: Arc<dyn Renderer>) {
        let name = renderer.name().to_string();
        trace!(target: "render.dispatch", backend = name.as_str(), "backend_added");
        self.backends.insert(name, renderer);
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.backends.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.backends.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.backends.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn reset(&mut self) {
        self.backends.clear();
    }

    pub fn metrics_snapshot(&self) -> DispatchMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Send `frame` to every backend concurrently; returns once all finished.
    pub fn render(&self, frame: &Frame) -> DispatchReport {
        let started = Instant::now();
        let output = &self.output;
        let mut report = DispatchReport::default();
        std::thread::scope(|scope| {
            let handles: Vec<_> = self
                .backends
                .iter()
                .map(|(name, backend)| {
                    let handle = scope.spawn(move || backend.render(frame, output));
                    (name.as_str(), handle)
                })
                .collect();
            for (name, handle) in handles {
                match handle.join() {
                    Ok(Ok(r)) => report.rendered.push((name.to_string(), r)),
                    Ok(Err(err)) => {
                        warn!(target: "render.dispatch", backend = name, error = %err, "backend_failed");
                        report.failed.push((name.to_string(), err.to_string()));
                    }
                    Err(_) => {
                        error!(target: "render.dispatch", backend = name, "backend_panicked");
                        report.failed.push((name.to_string(), "backend panicked".to_string()));
                    }
                }
            }
        });
        let elapsed = started.elapsed().as_nanos() as u64;
        self.metrics.frames.fetch_add(1, Relaxed);
        self.metrics
            .backend_renders
            .fetch_add(report.rendered.len() as u64, Relaxed);
        self.metrics
            .backend_failures
            .fetch_add(report.failed.len() as u64, Relaxed);
        self.metrics.last_dispatch_ns.store(elapsed, Relaxed);
        trace!(
            target: "render.dispatch",
            backends = self.backends.len(),
            failed = report.failed.len(),
            elapsed_ns = elapsed,
            "frame_dispatched"
        );
        report
    }
}
