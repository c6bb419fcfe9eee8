//! Integration tests: placing, converting, editing and resizing measurements.

mod common;

use common::{RecordingHost, down, drag, router, up};
use pretty_assertions::assert_eq;
use sk_core::{Color, Point, Unit};
use sk_editor::input::{InputEvent, Modifiers};
use sk_editor::{RouterState, ToolKind};

#[test]
fn conversion_table_labels() {
    let mut r = router();
    let mut host = RecordingHost::default();
    r.set_tool(ToolKind::Measure);

    drag(&mut r, &mut host, &[(10.0, 40.0), (200.0, 40.0), (388.0, 40.0)]);
    assert_eq!(r.measurements()[0].label(), "10.0 cm");

    r.set_unit(Unit::In);
    drag(&mut r, &mut host, &[(10.0, 200.0), (106.0, 200.0)]);
    assert_eq!(r.measurements()[1].label(), "1.0 in");
}

#[test]
fn unit_change_keeps_endpoints() {
    let mut r = router();
    let mut host = RecordingHost::default();
    r.set_tool(ToolKind::Measure);
    drag(&mut r, &mut host, &[(10.0, 40.0), (388.0, 40.0)]);
    let before = r.measurements()[0].clone();

    for unit in Unit::ALL {
        r.set_unit(unit);
        let after = &r.measurements()[0];
        assert_eq!((after.start, after.end), (before.start, before.end));
        assert_eq!(after.unit, unit);
    }
    r.set_unit(Unit::Mm);
    assert_eq!(r.measurements()[0].label(), "100.0 mm");
}

#[test]
fn undo_removes_latest_measurement() {
    let mut r = router();
    let mut host = RecordingHost::default();
    r.set_tool(ToolKind::Measure);
    drag(&mut r, &mut host, &[(10.0, 40.0), (200.0, 40.0)]);
    drag(&mut r, &mut host, &[(10.0, 200.0), (300.0, 200.0)]);
    let first = r.measurements()[0].id;

    r.undo();
    let ids: Vec<_> = r.measurements().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![first]);
    r.redo();
    assert_eq!(r.measurements().len(), 2);
}

#[test]
fn measurements_never_reach_the_base_raster() {
    let mut r = router();
    let mut host = RecordingHost::default();
    r.set_tool(ToolKind::Measure);
    drag(&mut r, &mut host, &[(10.0, 40.0), (200.0, 40.0)]);
    assert!(r.base().pixels().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    assert!(r.view().pixels().pixels().any(|p| p.0 != [255, 255, 255, 255]));
    // The saved image carries the overlay
    assert!(r.flatten().pixels().as_raw() == r.view().pixels().as_raw());
}

#[test]
fn resize_rescales_raster_and_measurements() {
    let mut r = router();
    let mut host = RecordingHost::default();
    drag(&mut r, &mut host, &[(20.0, 100.0), (200.0, 100.0)]);
    r.set_tool(ToolKind::Measure);
    drag(&mut r, &mut host, &[(10.0, 40.0), (110.0, 40.0)]);
    let label = r.measurements()[0].label();

    let response = r.resize_to_container(800.0);
    assert!(response.changed);
    assert_eq!((r.base().width(), r.base().height()), (800, 528));
    assert_eq!((r.view().width(), r.view().height()), (800, 528));
    let m = &r.measurements()[0];
    assert_eq!((m.start, m.end), (Point::new(20.0, 80.0), Point::new(220.0, 80.0)));
    assert_eq!(m.label(), label);
    // The stroke moved with the content
    assert!(r.base().pixels().get_pixel(240, 200).0[0] < 64);
    assert_eq!(r.base().pixels().get_pixel(240, 100).0, [255, 255, 255, 255]);

    // Same device size again is a no-op
    assert!(!r.resize_to_container(800.9).changed);
}

#[test]
fn debounced_resize_applies_latest_width() {
    let mut r = router();
    r.observe_resize(500.0, 0.0);
    r.observe_resize(600.0, 100.0);
    assert!(!r.tick(200.0).changed);
    assert!(r.tick(260.0).changed);
    assert_eq!(r.base().width(), 600);
}

#[test]
fn clicking_a_label_opens_the_editor() {
    let mut r = router();
    let mut host = RecordingHost::default();
    r.set_tool(ToolKind::Measure);
    drag(&mut r, &mut host, &[(100.0, 100.0), (300.0, 100.0)]);
    let id = r.measurements()[0].id;

    let response = r.handle(down(1, 205.0, 110.0), &mut host);
    let edit = response.edit.unwrap();
    assert_eq!(edit.id, id.to_string());
    assert_eq!(edit.value, "5.3");
    assert_eq!((edit.x, edit.y), (200.0, 100.0));
    assert_eq!(r.state(), RouterState::EditingLabel { id });

    // Releasing the click does not place a measurement
    r.handle(up(1, 205.0, 110.0), &mut host);
    assert_eq!(r.measurements().len(), 1);

    let response = r.handle(
        InputEvent::LabelCommit {
            text: "12 cm".into(),
        },
        &mut host,
    );
    assert!(response.edit_closed);
    assert_eq!(r.state(), RouterState::Idle);
    assert_eq!(r.measurements()[0].label(), "12 cm");
    assert_eq!(r.history().len(), 3);
}

#[test]
fn empty_label_edit_is_a_cancel() {
    let mut r = router();
    let mut host = RecordingHost::default();
    r.set_tool(ToolKind::Measure);
    drag(&mut r, &mut host, &[(100.0, 100.0), (300.0, 100.0)]);
    r.handle(down(1, 200.0, 100.0), &mut host);

    let response = r.handle(InputEvent::LabelCommit { text: "  ".into() }, &mut host);
    assert!(response.edit_closed);
    assert!(!response.changed);
    assert_eq!(r.measurements()[0].label(), "5.3 cm");
    assert_eq!(r.history().len(), 2);
}

#[test]
fn escape_closes_label_editor() {
    let mut r = router();
    let mut host = RecordingHost::default();
    r.set_tool(ToolKind::Measure);
    drag(&mut r, &mut host, &[(100.0, 100.0), (300.0, 100.0)]);
    r.handle(down(1, 200.0, 100.0), &mut host);

    let response = r.handle(InputEvent::key("Escape", Modifiers::NONE), &mut host);
    assert!(response.edit_closed);
    assert_eq!(r.state(), RouterState::Idle);
}

// ─── Restyling and pixel ratio ──────────────────────────────────────────

fn ink(r: &sk_editor::InputRouter) -> usize {
    r.view().pixels().pixels().filter(|p| p.0 != [255, 255, 255, 255]).count()
}

#[test]
fn measurement_colour_change_repaints_the_overlay() {
    let mut r = router();
    let mut host = RecordingHost::default();
    r.set_tool(ToolKind::Measure);
    drag(&mut r, &mut host, &[(10.0, 40.0), (200.0, 40.0)]);
    assert_eq!(r.view().pixels().get_pixel(10, 40).0, [0, 0, 255, 255]);

    let response = r.set_measurement_color(Color::rgb(0, 160, 0));
    assert!(response.changed);
    assert_eq!(r.view().pixels().get_pixel(10, 40).0, [0, 160, 0, 255]);
    assert_eq!(r.view().pixels().get_pixel(200, 40).0, [0, 160, 0, 255]);
    assert!(r.view().pixels().pixels().all(|p| p.0 != [0, 0, 255, 255]));
    assert!(r.base().pixels().pixels().all(|p| p.0 == [255, 255, 255, 255]));
}

#[test]
fn font_size_change_repaints_labels() {
    let mut r = router();
    let mut host = RecordingHost::default();
    r.set_tool(ToolKind::Measure);
    drag(&mut r, &mut host, &[(10.0, 100.0), (200.0, 100.0)]);
    let before = ink(&r);

    assert!(r.set_font_size(40.0).changed);
    assert_eq!(r.config().measurement.font_size, 40.0);
    assert!(ink(&r) > before);

    // Back to the original size paints the original overlay
    r.set_font_size(16.0);
    assert_eq!(ink(&r), before);
}

#[test]
fn pixel_ratio_change_doubles_device_size_and_endpoints() {
    let mut r = router();
    let mut host = RecordingHost::default();
    r.set_tool(ToolKind::Measure);
    drag(&mut r, &mut host, &[(10.0, 40.0), (110.0, 40.0)]);

    let response = r.set_device_pixel_ratio(2.0);
    assert!(response.changed);
    assert_eq!((r.base().width(), r.base().height()), (800, 528));
    assert_eq!((r.view().width(), r.view().height()), (800, 528));
    assert_eq!(r.base().css_size(), (400.0, 264.0));
    let m = &r.measurements()[0];
    assert_eq!((m.start, m.end), (Point::new(20.0, 80.0), Point::new(220.0, 80.0)));
    assert_eq!(r.view().pixels().get_pixel(20, 80).0, [0, 0, 255, 255]);

    // Client coordinates now land on twice the raster distance
    drag(&mut r, &mut host, &[(10.0, 100.0), (110.0, 100.0)]);
    let m = &r.measurements()[1];
    assert_eq!((m.start, m.end), (Point::new(20.0, 200.0), Point::new(220.0, 200.0)));

    // Same ratio again is a no-op
    assert!(!r.set_device_pixel_ratio(2.0).changed);
}
