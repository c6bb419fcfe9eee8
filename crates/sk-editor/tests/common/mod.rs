//! Shared test host and gesture helpers.

#![allow(dead_code)]

use sk_core::SketchConfig;
use sk_editor::input::{InputEvent, PointerInput};
use sk_editor::{Host, InputRouter, Notice, Response};

/// Records everything the router asks of its host.
#[derive(Default)]
pub struct RecordingHost {
    pub notices: Vec<Notice>,
    pub prompts: Vec<String>,
    pub answer: bool,
    pub records: Vec<(String, String)>,
    pub reject_update: bool,
}

impl RecordingHost {
    pub fn confirming() -> Self {
        Self {
            answer: true,
            ..Self::default()
        }
    }
}

impl Host for RecordingHost {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.prompts.push(message.to_string());
        self.answer
    }

    fn update_record(&mut self, field: &str, value: &str) -> Result<(), String> {
        if self.reject_update {
            return Err("record is read-only".into());
        }
        self.records.push((field.to_string(), value.to_string()));
        Ok(())
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A 400×264 canvas at dpr 1, so client and raster coordinates coincide.
pub fn router() -> InputRouter {
    init_logging();
    InputRouter::new(SketchConfig::default(), 400.0, 264.0)
}

pub fn down(id: i32, x: f64, y: f64) -> InputEvent {
    InputEvent::PointerDown(PointerInput::mouse(id, x, y))
}

pub fn moved(id: i32, x: f64, y: f64) -> InputEvent {
    InputEvent::PointerMove(PointerInput::mouse(id, x, y).with_button(-1))
}

pub fn up(id: i32, x: f64, y: f64) -> InputEvent {
    InputEvent::PointerUp(PointerInput::mouse(id, x, y))
}

/// Press, move through `points`, release at the last one.
pub fn drag(router: &mut InputRouter, host: &mut RecordingHost, points: &[(f64, f64)]) -> Response {
    let (x0, y0) = points[0];
    router.handle(down(1, x0, y0), host);
    for &(x, y) in &points[1..] {
        router.handle(moved(1, x, y), host);
    }
    let &(xn, yn) = points.last().unwrap();
    router.handle(up(1, xn, yn), host)
}
