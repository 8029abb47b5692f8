mod common;

use common::{boxed, screen, setup, setup_elements, trigger};
use core_actions::{define, refresh_event};
use core_events::{EVENT_CHANNEL_CAP, Event};
use core_geometry::Canvas;
use core_model::RegionSpec;
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn resize_burst_applies_the_last_size_once() {
    let (d, mut engine) = setup_elements();
    let (tx, mut rx) = mpsc::channel(EVENT_CHANNEL_CAP);
    d.attach_timer(tx);

    let started = Instant::now();
    for (rows, cols) in [("20", "70"), ("15", "60"), ("10", "40")] {
        let outcome = trigger(&d, &mut engine, "_resize_", &[rows, cols]);
        assert!(outcome.deferred);
        tokio::time::advance(Duration::from_millis(50)).await;
    }
    assert_eq!(engine.canvas(), Canvas::new(24, 80));

    let Some(Event::Deferred { name, generation }) = rx.recv().await else {
        panic!("expected a deferred event");
    };
    assert_eq!(name, "_resize_");
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(250), "fired after {elapsed:?}");

    d.fire_deferred(&mut engine, &name, generation).unwrap();
    assert_eq!(engine.canvas(), Canvas::new(10, 40));
    assert_eq!(screen(&engine), vec!["bar", "car", "hel"]);

    d.detach_timer();
    assert!(rx.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn region_delay_debounces_its_refresh() {
    let (d, mut engine) = setup();
    define(
        &d,
        &mut engine,
        &RegionSpec::new("slow")
            .geometry(boxed(1, 1, 1, 5))
            .delay(Duration::from_millis(100))
            .lines(&["hello"]),
    )
    .unwrap();
    let (tx, mut rx) = mpsc::channel(EVENT_CHANNEL_CAP);
    d.attach_timer(tx);

    trigger(&d, &mut engine, "_refresh_", &["slow"]);
    trigger(&d, &mut engine, "_refresh_", &["slow"]);
    assert!(d.has_pending(&refresh_event("slow")));
    assert_eq!(engine.capture().unwrap().frames_seen(), 0);

    let Some(Event::Deferred { name, generation }) = rx.recv().await else {
        panic!("expected a deferred event");
    };
    d.fire_deferred(&mut engine, &name, generation).unwrap();
    assert_eq!(screen(&engine), vec!["hello"]);
    assert_eq!(engine.capture().unwrap().frames_seen(), 1);
    assert_eq!(d.metrics_snapshot().deferred_scheduled, 2);
}

#[test]
fn without_a_timer_sink_resize_runs_inline() {
    let (d, mut engine) = setup_elements();
    let outcome = trigger(&d, &mut engine, "_resize_", &["12", "30"]);
    assert!(!outcome.deferred);
    assert_eq!(engine.canvas(), Canvas::new(12, 30));
}

#[test]
fn redefining_a_region_updates_its_delay() {
    let (d, mut engine) = setup();
    let spec = RegionSpec::new("pane").geometry(boxed(1, 1, 2, 2));
    define(&d, &mut engine, &spec).unwrap();
    define(&d, &mut engine, &spec.clone().delay(Duration::from_millis(30))).unwrap();
    assert_eq!(d.handler_count(&refresh_event("pane")), 1);
}
