//! Integration tests: gesture routing, shortcuts, clear and save.

mod common;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use common::{RecordingHost, down, drag, moved, router, up};
use pretty_assertions::assert_eq;
use sk_core::Color;
use sk_editor::input::{InputEvent, Modifiers, PointerInput};
use sk_editor::persist::{FAILED_MESSAGE, SAVED_MESSAGE};
use sk_editor::router::CLEAR_PROMPT;
use sk_editor::{NoticeLevel, RouterState, ToolKind};

#[test]
fn second_pointer_cannot_join_a_gesture() {
    let mut r = router();
    let mut host = RecordingHost::default();
    r.handle(down(1, 20.0, 50.0), &mut host);
    assert_eq!(r.state(), RouterState::Drawing { pointer: 1 });

    let second = InputEvent::PointerDown(PointerInput::touch(2, 20.0, 200.0));
    assert!(!r.handle(second, &mut host).consumed);
    let before = r.view().pixels().clone();
    r.handle(moved(2, 300.0, 200.0), &mut host);
    assert!(r.view().pixels().as_raw() == before.as_raw());
    r.handle(up(2, 300.0, 200.0), &mut host);
    assert_eq!(r.state(), RouterState::Drawing { pointer: 1 });
    assert_eq!(r.history().len(), 1);

    r.handle(moved(1, 200.0, 50.0), &mut host);
    r.handle(up(1, 200.0, 50.0), &mut host);
    assert_eq!(r.state(), RouterState::Idle);
    assert_eq!(r.history().len(), 2);
}

#[test]
fn pointer_cancel_ends_the_stroke() {
    let mut r = router();
    let mut host = RecordingHost::default();
    r.handle(down(1, 20.0, 50.0), &mut host);
    r.handle(moved(1, 200.0, 50.0), &mut host);
    let cancel = InputEvent::PointerCancel(PointerInput::mouse(1, 200.0, 50.0));
    r.handle(cancel, &mut host);
    assert_eq!(r.state(), RouterState::Idle);
    assert_eq!(r.history().len(), 2);
}

#[test]
fn eraser_paints_background() {
    let mut r = router();
    let mut host = RecordingHost::default();
    drag(&mut r, &mut host, &[(20.0, 100.0), (300.0, 100.0)]);
    r.set_pen_width(10.0);
    r.set_tool(ToolKind::Eraser);
    assert_eq!(r.tool_preview().color, Color::WHITE);
    assert_eq!(r.tool_preview().size, 40.0);
    drag(&mut r, &mut host, &[(10.0, 100.0), (310.0, 100.0)]);
    assert!(r.base().pixels().pixels().all(|p| p.0 == [255, 255, 255, 255]));
}

#[test]
fn pen_colour_and_client_mapping() {
    let mut r = router();
    let mut host = RecordingHost::default();
    r.set_pen_color(Color::rgb(255, 0, 0));
    // Canvas shown at half size, offset on the page
    r.set_client_rect(sk_render::ClientRect::new(100.0, 50.0, 200.0, 132.0));
    drag(&mut r, &mut host, &[(110.0, 100.0), (200.0, 100.0)]);
    // Client (150, 100) → raster (100, 100)
    assert_eq!(r.base().pixels().get_pixel(100, 100).0, [255, 0, 0, 255]);
}

#[test]
fn keyboard_undo_redo() {
    let mut r = router();
    let mut host = RecordingHost::default();
    drag(&mut r, &mut host, &[(20.0, 100.0), (300.0, 100.0)]);

    let response = r.handle(InputEvent::key("z", Modifiers::CTRL), &mut host);
    assert!(response.consumed);
    assert_eq!(r.history().index(), Some(0));

    let shift = Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::NONE
    };
    r.handle(InputEvent::key("Z", shift), &mut host);
    assert_eq!(r.history().index(), Some(1));
    r.handle(InputEvent::key("z", Modifiers::CTRL), &mut host);
    r.handle(InputEvent::key("y", Modifiers::CTRL), &mut host);
    assert_eq!(r.history().index(), Some(1));
}

#[test]
fn clear_requires_confirmation() {
    let mut r = router();
    let mut host = RecordingHost::default();
    drag(&mut r, &mut host, &[(20.0, 100.0), (300.0, 100.0)]);

    let response = r.handle(InputEvent::key("c", Modifiers::CTRL), &mut host);
    assert_eq!(host.prompts, vec![CLEAR_PROMPT.to_string()]);
    assert!(!response.changed);
    assert_eq!(r.history().len(), 2);

    let mut host = RecordingHost::confirming();
    r.set_tool(ToolKind::Measure);
    drag(&mut r, &mut host, &[(20.0, 40.0), (300.0, 40.0)]);
    let response = r.clear(&mut host);
    assert!(response.changed);
    assert!(r.measurements().is_empty());
    assert!(r.view().pixels().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    assert_eq!(r.history().len(), 4);
    // Clearing is itself undoable
    r.undo();
    assert_eq!(r.measurements().len(), 1);
}

#[test]
fn escape_cancels_measurement_drag() {
    let mut r = router();
    let mut host = RecordingHost::default();
    r.set_tool(ToolKind::Measure);
    let before = r.view().pixels().clone();
    r.handle(down(1, 20.0, 40.0), &mut host);
    r.handle(moved(1, 300.0, 40.0), &mut host);
    assert!(r.view().pixels().as_raw() != before.as_raw());

    r.handle(InputEvent::key("Escape", Modifiers::NONE), &mut host);
    assert_eq!(r.state(), RouterState::Idle);
    assert!(r.view().pixels().as_raw() == before.as_raw());
    r.handle(up(1, 300.0, 40.0), &mut host);
    assert!(r.measurements().is_empty());
    assert_eq!(r.history().len(), 1);
}

#[test]
fn undo_mid_gesture_abandons_it() {
    let mut r = router();
    let mut host = RecordingHost::default();
    drag(&mut r, &mut host, &[(20.0, 100.0), (300.0, 100.0)]);
    r.handle(down(1, 20.0, 200.0), &mut host);
    r.handle(moved(1, 300.0, 200.0), &mut host);
    r.undo();
    assert_eq!(r.state(), RouterState::Idle);
    assert!(r.view().pixels().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    r.handle(up(1, 300.0, 200.0), &mut host);
    assert_eq!(r.history().len(), 2);
}

#[test]
fn save_writes_base64_png_and_notifies() {
    let mut r = router();
    let mut host = RecordingHost::default();
    drag(&mut r, &mut host, &[(20.0, 100.0), (300.0, 100.0)]);

    r.handle(InputEvent::key("s", Modifiers::CTRL), &mut host);
    assert_eq!(host.records.len(), 1);
    let (field, value) = &host.records[0];
    assert_eq!(field, "sketch_image");
    let bytes = STANDARD.decode(value).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let image = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert!(image.as_raw() == r.view().pixels().as_raw());

    assert_eq!(host.notices.len(), 1);
    assert_eq!(host.notices[0].level, NoticeLevel::Success);
    assert_eq!(host.notices[0].message, SAVED_MESSAGE);
}

#[test]
fn failed_save_notifies_danger() {
    let mut r = router();
    let mut host = RecordingHost {
        reject_update: true,
        ..RecordingHost::default()
    };
    assert!(r.save(&mut host).is_err());
    assert_eq!(host.notices[0].level, NoticeLevel::Danger);
    assert_eq!(host.notices[0].message, FAILED_MESSAGE);
}

#[test]
fn toggling_measure_mid_stroke_records_the_stroke() {
    let mut r = router();
    let mut host = RecordingHost::default();
    r.handle(down(1, 20.0, 100.0), &mut host);
    r.handle(moved(1, 300.0, 100.0), &mut host);

    let response = r.handle(InputEvent::key("m", Modifiers::CTRL), &mut host);
    assert_eq!(response.tool, ToolKind::Measure);
    assert_eq!(r.state(), RouterState::Idle);
    assert_eq!(r.history().len(), 2);
    assert!(response.controls.can_undo);

    // The release after the switch belongs to no gesture
    r.handle(up(1, 300.0, 100.0), &mut host);
    assert_eq!(r.history().len(), 2);

    r.undo();
    assert!(r.base().pixels().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    assert!(r.view().pixels().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    r.redo();
    assert!(r.base().pixels().get_pixel(160, 100).0[0] < 64);
}

#[test]
fn resize_mid_stroke_records_the_stroke() {
    let mut r = router();
    let mut host = RecordingHost::default();
    r.handle(down(1, 20.0, 100.0), &mut host);
    r.handle(moved(1, 300.0, 100.0), &mut host);

    assert!(r.resize_to_container(800.0).changed);
    assert_eq!(r.state(), RouterState::Idle);
    assert_eq!(r.history().len(), 2);
    assert!(r.history().can_undo());
    assert!(r.base().pixels().get_pixel(320, 200).0[0] < 64);

    r.handle(up(1, 300.0, 100.0), &mut host);
    assert_eq!(r.history().len(), 2);

    r.undo();
    assert_eq!(r.base().width(), 800);
    assert!(r.base().pixels().pixels().all(|p| p.0 == [255, 255, 255, 255]));
}
