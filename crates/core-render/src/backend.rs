//! Render backends.
//!
//! A backend turns a finished frame into output. Backends that write to the
//! shared terminal device must hold the output lock for the whole frame so
//! bytes from concurrent backends never interleave mid-sequence.

use crate::compressor::{Compressor, encode_uncompressed};
use crate::frame::Frame;
use anyhow::{Result, anyhow};
use std::io::Write;
use std::sync::{Arc, Mutex};

/// The single output device shared by every backend.
pub type SharedOutput = Arc<Mutex<Box<dyn Write + Send>>>;

pub fn shared_output<W: Write + Send + 'static>(writer: W) -> SharedOutput {
    Arc::new(Mutex::new(Box::new(writer)))
}

pub fn shared_stdout() -> SharedOutput {
    shared_output(std::io::stdout())
}

/// Outcome of one backend render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderReport {
    pub bytes: usize,
}

pub trait Renderer: Send + Sync {
    /// Stable identifier used as the dispatcher key and in logs.
    fn name(&self) -> &str;
    fn render(&self, frame: &Frame, output: &SharedOutput) -> Result<RenderReport>;
}

/// Writes compressed (or, for debugging, uncompressed) escape sequences to
/// the shared output.
#[derive(Debug, Clone)]
pub struct TerminalRenderer {
    compress: bool,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self { compress: true }
    }

    pub fn uncompressed() -> Self {
        Self { compress: false }
    }
}

impl Renderer for TerminalRenderer {
    fn name(&self) -> &str {
        "terminal"
    }

    fn render(&self, frame: &Frame, output: &SharedOutput) -> Result<RenderReport> {
        let bytes = if self.compress {
            Compressor::encode(frame)
        } else {
            encode_uncompressed(frame).into_bytes()
        };
        let mut out = output
            .lock()
            .map_err(|_| anyhow!("terminal output lock poisoned"))?;
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(RenderReport { bytes: bytes.len() })
    }
}

/// Discards every frame.
#[derive(Debug, Clone, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn name(&self) -> &str {
        "null"
    }

    fn render(&self, _frame: &Frame, _output: &SharedOutput) -> Result<RenderReport> {
        Ok(RenderReport::default())
    }
}

#[derive(Debug, Default)]
struct Captured {
    frame: Option<Frame>,
    bytes: Vec<u8>,
    frames: u64,
}

/// Keeps the last frame and its compressed bytes in memory instead of
/// writing them anywhere. Clones share the same capture, so a handle can be
/// kept for remote retrieval while another is registered with the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct CaptureRenderer {
    inner: Arc<Mutex<Captured>>,
}

impl CaptureRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.inner.lock().ok().and_then(|c| c.frame.clone())
    }

    pub fn last_output(&self) -> Vec<u8> {
        self.inner
            .lock()
            .map(|c| c.bytes.clone())
            .unwrap_or_default()
    }

    pub fn frames_seen(&self) -> u64 {
        self.inner.lock().map(|c| c.frames).unwrap_or(0)
    }
}

impl Renderer for CaptureRenderer {
    fn name(&self) -> &str {
        "capture"
    }

    fn render(&self, frame: &Frame, _output: &SharedOutput) -> Result<RenderReport> {
        let bytes = Compressor::encode(frame);
        let len = bytes.len();
        let mut captured = self
            .inner
            .lock()
            .map_err(|_| anyhow!("capture lock poisoned"))?;
        captured.frame = Some(frame.clone());
        captured.bytes = bytes;
        captured.frames += 1;
        Ok(RenderReport { bytes: len })
    }
}
