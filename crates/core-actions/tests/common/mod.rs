#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{Options, install};
use core_events::{Dispatcher, Outcome, Reply, Value};
use core_geometry::{Canvas, GeometrySpec};
use core_model::RegionSpec;
use core_state::Engine;
use std::sync::{Arc, Mutex};

pub const ELEMENTS: [&str; 6] = ["barium", "carbon", "helium", "iodine", "nickel", "osmium"];

pub fn boxed(y: i32, x: i32, yn: i32, xn: i32) -> GeometrySpec {
    GeometrySpec {
        y: Some(y),
        x: Some(x),
        yn: Some(yn),
        xn: Some(xn),
        ..GeometrySpec::default()
    }
}

/// Headless engine on a 24x80 canvas with every system event installed.
pub fn setup() -> (Dispatcher<Engine>, Engine) {
    setup_with(Options::default())
}

pub fn setup_with(options: Options) -> (Dispatcher<Engine>, Engine) {
    let dispatcher = Dispatcher::new();
    install(&dispatcher, &options);
    (dispatcher, Engine::headless(Canvas::new(24, 80)))
}

/// `setup` plus a 3x3 `elements` region holding six words.
pub fn setup_elements() -> (Dispatcher<Engine>, Engine) {
    let (dispatcher, mut engine) = setup();
    core_actions::define(
        &dispatcher,
        &mut engine,
        &RegionSpec::new("elements")
            .geometry(boxed(1, 1, 3, 3))
            .lines(&ELEMENTS),
    )
    .unwrap();
    (dispatcher, engine)
}

pub fn trigger(
    dispatcher: &Dispatcher<Engine>,
    engine: &mut Engine,
    event: &str,
    args: &[&str],
) -> Outcome {
    let args: Vec<Value> = args.iter().map(|a| Value::from(*a)).collect();
    dispatcher
        .trigger(engine, event, &args)
        .unwrap_or_else(|err| panic!("{event} failed: {err:#}"))
}

/// Text rows of the last frame the capture backend saw.
pub fn screen(engine: &Engine) -> Vec<String> {
    engine
        .capture()
        .and_then(|c| c.last_frame())
        .map(|f| f.text_rows())
        .unwrap_or_default()
}

/// Bind `event` to a handler that records the arguments of every call.
pub fn record(dispatcher: &Dispatcher<Engine>, event: &str) -> Arc<Mutex<Vec<Vec<Value>>>> {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = calls.clone();
    dispatcher.bind(event, move |_, _, args| {
        sink.lock().unwrap().push(args.to_vec());
        Ok(Reply::None)
    });
    calls
}
