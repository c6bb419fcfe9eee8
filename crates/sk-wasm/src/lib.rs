//! WASM bridge for the sketch canvas: exposes the editor to the form
//! widget's JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. Every event handler returns
//! the router's `Response` as JSON so the page can repaint, sync the
//! toolbar and show or hide the inline label editor.

mod host;
mod logger;
mod present;

use host::JsHost;
use js_sys::Function;
use sk_core::{Color, SketchConfig, Unit};
use sk_editor::input::{InputEvent, Modifiers, PointerInput, PointerKind};
use sk_editor::lifecycle::{DetachHandle, ListenerScope};
use sk_editor::{InputRouter, ToolKind};
use sk_render::ClientRect;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, EventTarget};

/// The WASM-facing canvas controller.
#[wasm_bindgen]
pub struct SketchCanvas {
    router: InputRouter,
    host: JsHost,
    listeners: ListenerScope,
}

#[wasm_bindgen]
impl SketchCanvas {
    /// Create a canvas controller sized from its container width.
    /// `config_json` may be empty; invalid config falls back to defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(container_width: f64, device_pixel_ratio: f64, config_json: &str) -> Self {
        logger::init();
        let mut config = if config_json.trim().is_empty() {
            SketchConfig::default()
        } else {
            SketchConfig::from_json(config_json).unwrap_or_else(|e| {
                log::warn!("{e}; using defaults");
                SketchConfig::default()
            })
        };
        config.device_pixel_ratio = device_pixel_ratio;
        Self {
            router: InputRouter::for_container(config, container_width),
            host: JsHost::default(),
            listeners: ListenerScope::new(),
        }
    }

    /// Wire the page callbacks: notifications, confirm dialog, record update.
    pub fn set_host(&mut self, notify: Option<Function>, confirm: Option<Function>, update_record: Option<Function>) {
        self.host = JsHost::new(notify, confirm, update_record);
    }

    /// Console verbosity: `"off"`, `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    pub fn set_log_level(&self, level: &str) -> bool {
        logger::set_level(level)
    }

    // ─── Geometry ────────────────────────────────────────────────────────

    /// Device pixel width the `<canvas>` element must have.
    pub fn device_width(&self) -> u32 {
        self.router.view().width()
    }

    pub fn device_height(&self) -> u32 {
        self.router.view().height()
    }

    /// CSS width the `<canvas>` element should be styled with.
    pub fn css_width(&self) -> f64 {
        self.router.view().css_size().0
    }

    pub fn css_height(&self) -> f64 {
        self.router.view().css_size().1
    }

    /// Report the canvas' `getBoundingClientRect()`.
    pub fn set_client_rect(&mut self, left: f64, top: f64, width: f64, height: f64) {
        self.router.set_client_rect(ClientRect::new(left, top, width, height));
    }

    /// Feed a `ResizeObserver` notification; applied after the quiet period.
    pub fn observe_resize(&mut self, container_width: f64, now_ms: f64) {
        self.router.observe_resize(container_width, now_ms);
    }

    /// Drive timers. Call from `requestAnimationFrame` or a short interval.
    pub fn tick(&mut self, now_ms: f64) -> String {
        to_json(&self.router.tick(now_ms))
    }

    pub fn set_device_pixel_ratio(&mut self, dpr: f64) -> String {
        to_json(&self.router.set_device_pixel_ratio(dpr))
    }

    /// Present the view surface.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        present::blit(ctx, self.router.view())
    }

    // ─── Input ───────────────────────────────────────────────────────────

    pub fn handle_pointer_down(&mut self, pointer_id: i32, pointer_type: &str, button: i16, client_x: f64, client_y: f64) -> String {
        let p = pointer(pointer_id, pointer_type, button, client_x, client_y);
        self.dispatch(InputEvent::PointerDown(p))
    }

    pub fn handle_pointer_move(&mut self, pointer_id: i32, pointer_type: &str, client_x: f64, client_y: f64) -> String {
        let p = pointer(pointer_id, pointer_type, -1, client_x, client_y);
        self.dispatch(InputEvent::PointerMove(p))
    }

    pub fn handle_pointer_up(&mut self, pointer_id: i32, pointer_type: &str, button: i16, client_x: f64, client_y: f64) -> String {
        let p = pointer(pointer_id, pointer_type, button, client_x, client_y);
        self.dispatch(InputEvent::PointerUp(p))
    }

    pub fn handle_pointer_cancel(&mut self, pointer_id: i32, pointer_type: &str, client_x: f64, client_y: f64) -> String {
        let p = pointer(pointer_id, pointer_type, -1, client_x, client_y);
        self.dispatch(InputEvent::PointerCancel(p))
    }

    /// `consumed: true` in the result means the page should `preventDefault()`.
    pub fn handle_wheel(&mut self, delta_y: f64, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        self.dispatch(InputEvent::Wheel {
            delta_y,
            modifiers: modifiers(ctrl, shift, alt, meta),
        })
    }

    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        self.dispatch(InputEvent::key(key, modifiers(ctrl, shift, alt, meta)))
    }

    /// The inline label input was confirmed (Enter, or blur with content).
    pub fn commit_label(&mut self, text: &str) -> String {
        self.dispatch(InputEvent::LabelCommit { text: text.to_string() })
    }

    pub fn cancel_label(&mut self) -> String {
        self.dispatch(InputEvent::LabelCancel)
    }

    fn dispatch(&mut self, event: InputEvent) -> String {
        to_json(&self.router.handle(event, &mut self.host))
    }

    // ─── Toolbar ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> String {
        to_json(&self.router.undo())
    }

    pub fn redo(&mut self) -> String {
        to_json(&self.router.redo())
    }

    pub fn clear(&mut self) -> String {
        to_json(&self.router.clear(&mut self.host))
    }

    /// Save into the bound record. The outcome is reported through the
    /// notify callback; the return value mirrors it.
    pub fn save(&mut self) -> bool {
        self.router.save(&mut self.host).is_ok()
    }

    /// `"pen"`, `"eraser"` or `"measure"`.
    pub fn set_tool(&mut self, name: &str) -> String {
        match ToolKind::from_name(name) {
            Some(tool) => to_json(&self.router.set_tool(tool)),
            None => {
                log::warn!("unknown tool {name:?}");
                to_json(&self.router.status())
            }
        }
    }

    pub fn set_pen_color(&mut self, color: &str) -> bool {
        match parse_color(color) {
            Some(c) => {
                self.router.set_pen_color(c);
                true
            }
            None => false,
        }
    }

    pub fn set_pen_width(&mut self, width: f64) {
        self.router.set_pen_width(width);
    }

    /// Quality slider value, `0..=100`.
    pub fn set_export_quality(&mut self, percent: f64) {
        self.router.set_export_quality_percent(percent);
    }

    pub fn set_unit(&mut self, unit: &str) -> String {
        match unit.parse::<Unit>() {
            Ok(u) => to_json(&self.router.set_unit(u)),
            Err(e) => {
                log::warn!("{e}");
                to_json(&self.router.status())
            }
        }
    }

    pub fn set_measurement_color(&mut self, color: &str) -> String {
        match parse_color(color) {
            Some(c) => to_json(&self.router.set_measurement_color(c)),
            None => to_json(&self.router.status()),
        }
    }

    pub fn set_font_size(&mut self, size: f64) -> String {
        to_json(&self.router.set_font_size(size))
    }

    /// Brush swatch as JSON `{"color":"#RRGGBB","size":12}`.
    pub fn tool_preview(&self) -> String {
        to_json(&self.router.tool_preview())
    }

    /// Undo/redo enabled state as JSON.
    pub fn controls(&self) -> String {
        to_json(&self.router.controls())
    }

    /// Current measurements as JSON.
    pub fn measurements(&self) -> String {
        to_json(&self.router.measurements())
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// `target.addEventListener(event, callback)`, removed again on teardown.
    pub fn listen(&mut self, target: &EventTarget, event: &str, callback: &Function) -> Result<(), JsValue> {
        target.add_event_listener_with_callback(event, callback)?;
        let (target, name, callback) = (target.clone(), event.to_string(), callback.clone());
        self.listeners.attach(
            event,
            DetachHandle::new(move || {
                if let Err(e) = target.remove_event_listener_with_callback(&name, &callback) {
                    log::warn!("failed to detach {name}: {e:?}");
                }
            }),
        );
        Ok(())
    }

    /// Detach every listener, cancel pending work and drop history.
    pub fn teardown(&mut self) {
        let released = self.listeners.release_all();
        self.router.teardown();
        log::debug!("teardown released {released} listener(s)");
    }
}

fn pointer(id: i32, pointer_type: &str, button: i16, x: f64, y: f64) -> PointerInput {
    PointerInput {
        id,
        kind: PointerKind::from_name(pointer_type),
        button,
        client: sk_core::Point::new(x, y),
    }
}

fn modifiers(ctrl: bool, shift: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers { ctrl, shift, alt, meta }
}

fn parse_color(s: &str) -> Option<Color> {
    match sk_core::parse_color(s) {
        Ok(c) => Some(c),
        Err(e) => {
            log::warn!("bad colour {s:?}: {e}");
            None
        }
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn canvas() -> SketchCanvas {
        SketchCanvas::new(400.0, 1.0, "")
    }

    #[test]
    fn sizes_from_container() {
        let c = canvas();
        assert_eq!((c.device_width(), c.device_height()), (400, 264));
        assert_eq!((c.css_width(), c.css_height()), (400.0, 264.0));
        let hi_dpi = SketchCanvas::new(400.0, 2.0, r#"{"penWidth": 5}"#);
        assert_eq!(hi_dpi.device_width(), 800);
    }

    #[test]
    fn stroke_round_trip_reports_controls() {
        let mut c = canvas();
        c.handle_pointer_down(1, "mouse", 0, 10.0, 10.0);
        c.handle_pointer_move(1, "mouse", 100.0, 10.0);
        let up: serde_json::Value = serde_json::from_str(&c.handle_pointer_up(1, "mouse", 0, 100.0, 10.0)).unwrap();
        assert_eq!(up["changed"], true);
        assert_eq!(up["controls"]["canUndo"], true);
        assert_eq!(up["controls"]["canRedo"], false);
        assert_eq!(up["tool"], "pen");

        let undo: serde_json::Value = serde_json::from_str(&c.undo()).unwrap();
        assert_eq!(undo["controls"]["canRedo"], true);
    }

    #[test]
    fn tool_and_unit_by_name() {
        let mut c = canvas();
        let response: serde_json::Value = serde_json::from_str(&c.set_tool("measure")).unwrap();
        assert_eq!(response["tool"], "measure");
        c.set_unit("in");
        c.handle_pointer_down(1, "touch", 0, 10.0, 50.0);
        c.handle_pointer_up(1, "touch", 0, 106.0, 50.0);
        let list: serde_json::Value = serde_json::from_str(&c.measurements()).unwrap();
        assert_eq!(list[0]["unit"], "in");
        assert_eq!(list[0]["pixel_length"], 96.0);
    }

    #[test]
    fn bad_colour_is_rejected() {
        let mut c = canvas();
        assert!(!c.set_pen_color("#12"));
        assert!(c.set_pen_color("#ff8800"));
        let swatch: serde_json::Value = serde_json::from_str(&c.tool_preview()).unwrap();
        assert_eq!(swatch["color"], "#FF8800");
        assert_eq!(swatch["size"], 12.0);
    }
}
