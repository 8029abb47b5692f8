mod common;

use common::{boxed, record, screen, setup, setup_elements, trigger};
use core_actions::define;
use core_events::{Signal, Value};
use core_model::RegionSpec;
use pretty_assertions::assert_eq;

#[test]
fn initialize_draws_every_region() {
    let (d, mut engine) = setup_elements();
    trigger(&d, &mut engine, "_initialize_", &[]);
    assert_eq!(screen(&engine), vec!["bar", "car", "hel"]);
}

#[test]
fn cursor_moves_scroll_the_viewport() {
    let (d, mut engine) = setup_elements();
    trigger(&d, &mut engine, "_initialize_", &[]);
    for _ in 0..3 {
        trigger(&d, &mut engine, "_cursor_down_", &[]);
        trigger(&d, &mut engine, "_cursor_right_", &["elements"]);
    }
    assert_eq!(screen(&engine), vec!["arb", "eli", "odi"]);

    let position = trigger(&d, &mut engine, "_cursor_position_", &[]);
    assert_eq!(position.last_value(), Some(&Value::from("3,3")));

    trigger(&d, &mut engine, "_cursor_origin_", &[]);
    let position = trigger(&d, &mut engine, "_cursor_position_", &["elements"]);
    assert_eq!(position.last_value(), Some(&Value::from("1,1")));
}

#[test]
fn cursor_reposition_requires_all_arguments() {
    let (d, mut engine) = setup_elements();
    let err = d
        .trigger(&mut engine, "_cursor_reposition_", &[Value::from("elements")])
        .unwrap_err();
    assert!(format!("{err:#}").contains("missing argument `y`"));

    trigger(&d, &mut engine, "_cursor_reposition_", &["elements", "2", "3"]);
    let cursor = engine.cursor("elements").unwrap();
    assert_eq!((cursor.y, cursor.x), (2, 3));
}

#[test]
fn cursor_visibility_aliases_share_behaviour() {
    let (d, mut engine) = setup_elements();
    trigger(&d, &mut engine, "_cursor_show_", &[]);
    assert!(engine.cursor("elements").unwrap().visible);
    trigger(&d, &mut engine, "_hide_cursor_", &[]);
    assert!(!engine.cursor("elements").unwrap().visible);
    trigger(&d, &mut engine, "_show_cursor_", &[]);
    assert!(engine.cursor("elements").unwrap().visible);
    trigger(&d, &mut engine, "_cursor_hide_", &[]);
    assert!(!engine.cursor("elements").unwrap().visible);
}

#[test]
fn toggle_interface_reports_visibility() {
    let (d, mut engine) = setup_elements();
    let hidden = trigger(&d, &mut engine, "_toggle_interface_", &[]);
    assert_eq!(hidden.last_value(), Some(&Value::Bool(false)));
    assert!(!engine.is_visible("elements"));
    let shown = trigger(&d, &mut engine, "_toggle_interface_", &["elements"]);
    assert_eq!(shown.last_value(), Some(&Value::Bool(true)));
    assert_eq!(screen(&engine), vec!["bar", "car", "hel"]);
}

#[test]
fn geometry_moves_report_refusal() {
    let (d, mut engine) = setup_elements();
    let up = trigger(&d, &mut engine, "_geometry_up_", &[]);
    assert_eq!(up.last_value(), Some(&Value::Bool(false)));
    let right = trigger(&d, &mut engine, "_geometry_right_", &[]);
    assert_eq!(right.last_value(), Some(&Value::Bool(true)));
    assert_eq!(engine.geometry("elements").unwrap().left(), 2);
}

#[test]
fn maximise_and_restore() {
    let (d, mut engine) = setup_elements();
    trigger(&d, &mut engine, "_maximise_", &[]);
    assert_eq!(engine.geometry("elements").unwrap().height(), 24);
    trigger(&d, &mut engine, "_unmaximise_", &[]);
    assert_eq!(engine.geometry("elements").unwrap().height(), 3);
}

#[test]
fn focus_cycles_and_rejects_unknown_names() {
    let (d, mut engine) = setup_elements();
    define(
        &d,
        &mut engine,
        &RegionSpec::new("status").geometry(boxed(24, 1, 24, 80)),
    )
    .unwrap();
    assert_eq!(engine.focused(), Some("elements"));
    trigger(&d, &mut engine, "_focus_next_", &[]);
    assert_eq!(engine.focused(), Some("status"));
    trigger(&d, &mut engine, "_focus_prev_", &[]);
    assert_eq!(engine.focused(), Some("elements"));
    trigger(&d, &mut engine, "_focus_by_name_", &["status"]);
    assert_eq!(engine.focused(), Some("status"));
    assert!(
        d.trigger(&mut engine, "_focus_by_name_", &[Value::from("nowhere")])
            .is_err()
    );
}

#[test]
fn groups_are_shown_and_hidden_together() {
    let (d, mut engine) = setup();
    for (name, y) in [("left", 1), ("right", 5)] {
        define(
            &d,
            &mut engine,
            &RegionSpec::new(name)
                .group("panes")
                .geometry(boxed(y, 1, y + 1, 4))
                .lines(&["abcd", "efgh"]),
        )
        .unwrap();
    }
    trigger(&d, &mut engine, "_hide_group_", &["panes"]);
    assert!(!engine.is_visible("left"));
    assert!(!engine.is_visible("right"));
    trigger(&d, &mut engine, "_show_group_", &["panes"]);
    assert!(engine.is_visible("left") && engine.is_visible("right"));
    assert_eq!(screen(&engine), vec!["abcd", "efgh", "abcd", "efgh"]);
    assert!(d.trigger(&mut engine, "_show_group_", &[]).is_err());
}

#[test]
fn clear_without_region_blanks_the_canvas() {
    let (d, mut engine) = setup_elements();
    trigger(&d, &mut engine, "_initialize_", &[]);
    trigger(&d, &mut engine, "_clear_", &[]);
    let rows = screen(&engine);
    assert_eq!(rows.len(), 24);
    assert!(rows.iter().all(|r| r.chars().all(|c| c == ' ') && r.len() == 80));

    trigger(&d, &mut engine, "_clear_", &["elements"]);
    assert_eq!(screen(&engine), vec!["   ", "   ", "   "]);
}

#[test]
fn operations_without_focus_fail() {
    let (d, mut engine) = setup();
    let err = d.trigger(&mut engine, "_cursor_down_", &[]).unwrap_err();
    assert!(format!("{err:#}").contains("_cursor_down_"));
}

#[test]
fn command_and_log_events() {
    let (d, mut engine) = setup_elements();
    let commands = record(&d, "command");
    trigger(&d, &mut engine, "_command_", &["echo hi"]);
    trigger(&d, &mut engine, "_log_", &["hello"]);
    assert_eq!(*commands.lock().unwrap(), vec![vec![Value::from("echo hi")]]);
    assert!(d.trigger(&mut engine, "_log_", &[]).is_err());
}

#[test]
fn exit_runs_cleanup_then_signals() {
    let (d, mut engine) = setup_elements();
    let cleanups = record(&d, "cleanup");
    engine.set_remote_running(true);
    let outcome = trigger(&d, &mut engine, "_exit_", &[]);
    assert_eq!(outcome.signal, Some(Signal::Exit));
    assert_eq!(cleanups.lock().unwrap().len(), 1);
    assert!(!engine.remote_running());
}

#[test]
fn mode_switch_is_a_signal() {
    let (d, mut engine) = setup_elements();
    let outcome = trigger(&d, &mut engine, "_mode_switch_", &[]);
    assert_eq!(outcome.signal, Some(Signal::ModeSwitch));
}

#[test]
fn region_overhanging_the_canvas_never_addresses_off_screen() {
    let (d, mut engine) = setup();
    define(
        &d,
        &mut engine,
        &RegionSpec::new("overhang")
            .geometry(boxed(23, 75, 30, 90))
            .lines(&["edge of the screen", "second line"]),
    )
    .unwrap();
    trigger(&d, &mut engine, "_refresh_", &["overhang"]);

    let frame = engine.capture().and_then(|c| c.last_frame()).unwrap();
    let max_y = frame.cells().map(|c| c.position.y).max();
    let max_x = frame.cells().map(|c| c.position.x).max();
    assert_eq!((max_y, max_x), (Some(24), Some(80)));
    assert_eq!(screen(&engine), vec!["edge o", "second"]);

    let output = String::from_utf8_lossy(&engine.last_output()).into_owned();
    assert!(!output.contains("\x1b[30;90H"), "{output:?}");
    assert!(!output.contains("\x1b[25;"), "{output:?}");

    trigger(&d, &mut engine, "_clear_", &["overhang"]);
    let cleared = engine.capture().and_then(|c| c.last_frame()).unwrap();
    assert!(cleared.cells().all(|c| c.position.y <= 24 && c.position.x <= 80));
}
