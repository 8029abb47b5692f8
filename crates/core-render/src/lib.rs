//! Output pipeline: viewport -> frame -> compressed escape stream -> backends.
//!
//! Components:
//! - `viewport`: the visible `height x width` window over region content.
//! - `buffer`: per-region double buffer (front displayed, back pending).
//! - `frame`: region frame composition (border ring + viewport + cursor mark).
//! - `clear`: blank frames for clearing a region's area.
//! - `compressor`: stateful escape-sequence encoder eliding repeated
//!   colour/style sequences.
//! - `backend`: the `Renderer` trait plus terminal, null and capture backends.
//! - `dispatcher`: per-frame concurrent fan-out to all backends.
//! - `esc`: raw control sequences.

pub mod backend;
pub mod buffer;
pub mod clear;
pub mod compressor;
pub mod dispatcher;
pub mod esc;
pub mod frame;
pub mod viewport;

pub use backend::{
    CaptureRenderer, NullRenderer, RenderReport, Renderer, SharedOutput, TerminalRenderer,
    shared_output, shared_stdout,
};
pub use buffer::{Buffer, Refresh};
pub use clear::{ClearOptions, clear_region};
pub use compressor::{CompressionStats, Compressor, encode_uncompressed};
pub use dispatcher::{DispatchMetricsSnapshot, DispatchReport, RenderDispatcher};
pub use frame::{CursorMark, Frame, RegionView};
pub use viewport::{Viewport, visible};
