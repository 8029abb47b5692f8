//! Concurrent fan-out: every backend sees every frame and output from
//! backends sharing the device never interleaves within a frame.

use anyhow::{Result, anyhow};
use core_model::{Cell, Colour, Position, Style};
use core_render::{
    CaptureRenderer, Compressor, Frame, RenderDispatcher, RenderReport, Renderer, SharedOutput,
    TerminalRenderer, shared_output,
};
use std::io::Write;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Device(Arc<Mutex<Vec<u8>>>);

impl Device {
    fn bytes(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }
}

impl Write for Device {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Writes its tag one byte at a time while holding the device lock.
struct Tagged {
    name: String,
    tag: u8,
    repeat: usize,
}

impl Renderer for Tagged {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, _frame: &Frame, output: &SharedOutput) -> Result<RenderReport> {
        let mut out = output.lock().map_err(|_| anyhow!("poisoned"))?;
        for _ in 0..self.repeat {
            out.write_all(&[self.tag])?;
            std::thread::yield_now();
        }
        Ok(RenderReport { bytes: self.repeat })
    }
}

fn frame() -> Frame {
    Frame::new(vec![
        (1..=5)
            .map(|x| Cell::new("k", Colour::default(), Style::empty(), Position::new(1, x)))
            .collect(),
    ])
}

#[test]
fn writes_from_backends_stay_contiguous() {
    let device = Device::default();
    let mut dispatcher = RenderDispatcher::new(shared_output(device.clone()));
    for (i, tag) in [b'a', b'b', b'c', b'd'].into_iter().enumerate() {
        dispatcher.add(Tagged {
            name: format!("tagged-{i}"),
            tag,
            repeat: 64,
        });
    }
    for _ in 0..10 {
        let report = dispatcher.render(&frame());
        assert!(report.is_clean());
        assert_eq!(report.rendered.len(), 4);
    }
    let bytes = device.bytes();
    assert_eq!(bytes.len(), 4 * 64 * 10);
    for run in bytes.chunks(64) {
        assert!(run.iter().all(|b| *b == run[0]), "interleaved run: {run:?}");
    }
}

#[test]
fn terminal_and_capture_receive_the_same_frame() {
    let device = Device::default();
    let capture = CaptureRenderer::new();
    let mut dispatcher = RenderDispatcher::new(shared_output(device.clone()));
    dispatcher.add(TerminalRenderer::new());
    dispatcher.add(capture.clone());

    let report = dispatcher.render(&frame());
    assert!(report.is_clean());
    assert_eq!(device.bytes(), Compressor::encode(&frame()));
    assert_eq!(capture.last_output(), device.bytes());
    assert_eq!(dispatcher.metrics_snapshot().backend_renders, 2);
}
