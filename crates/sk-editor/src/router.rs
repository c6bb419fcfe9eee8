//! Input routing: the editor's state machine.
//!
//! The router owns both surfaces, the history and the two engines, and
//! turns `InputEvent`s into drawing, measuring and history operations.
//!
//! Two surfaces are kept:
//! - `base` holds committed stroke pixels only; it is what history stores.
//! - `view` is `base` plus the measurement overlay (and the live drag
//!   preview); it is what the host presents and what gets saved.
//!
//! ```text
//! Idle ──down(pen|eraser)──▶ Drawing ──up──▶ commit ▶ Idle
//! Idle ──down(measure)─────▶ Measuring ──up──▶ commit ▶ Idle
//! Idle ──down on a label───▶ EditingLabel ──commit|cancel──▶ Idle
//! ```

use crate::history::HistoryStack;
use crate::host::Host;
use crate::input::{InputEvent, Modifiers, PointerInput};
use crate::lifecycle::ResizeDebouncer;
use crate::measure::MeasurementEngine;
use crate::persist;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::stroke::{StrokeEngine, paint_segment};
use crate::tools::{ToolKind, ToolPreview, ToolSettings};
use kurbo::Point;
use serde::Serialize;
use sk_core::{Color, Measurement, MeasurementId, SketchConfig, Unit};
use sk_render::paint::compose;
use sk_render::{ClientRect, ExportOptions, ImageCodec, ResizeOutcome, Surface};

pub const CLEAR_PROMPT: &str = "Are you sure you want to clear the canvas?";

/// What the router is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    Idle,
    /// A freehand stroke captured by `pointer`.
    Drawing { pointer: i32 },
    /// A measurement drag captured by `pointer`.
    Measuring { pointer: i32 },
    /// The host shows an inline input for this measurement's value.
    EditingLabel { id: MeasurementId },
}

/// Enabled state of the undo/redo controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlState {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Ask the host to open an inline editor over a measurement label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditRequest {
    pub id: String,
    /// Current value, without unit suffix.
    pub value: String,
    /// Label midpoint in client (CSS) coordinates.
    pub x: f64,
    pub y: f64,
}

/// Outcome of one routed event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// The view surface changed and should be presented again.
    pub changed: bool,
    /// The event was handled; the host should suppress its default action.
    pub consumed: bool,
    pub controls: ControlState,
    pub tool: ToolKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit: Option<EditRequest>,
    /// The inline editor, if open, should be hidden.
    pub edit_closed: bool,
}

pub struct InputRouter {
    config: SketchConfig,
    base: Surface,
    view: Surface,
    history: HistoryStack,
    strokes: StrokeEngine,
    measure: MeasurementEngine,
    tool: ToolKind,
    /// Tool to return to when the measure toggle is pressed again.
    prev_tool: ToolKind,
    settings: ToolSettings,
    state: RouterState,
    client_rect: ClientRect,
    resize: ResizeDebouncer,
    torn_down: bool,
}

impl InputRouter {
    /// Build a router around a `css_width × css_height` canvas, fill it with
    /// the background colour and commit that as the first history entry.
    pub fn new(config: SketchConfig, css_width: f64, css_height: f64) -> Self {
        let config = config.sanitized();
        let dpr = config.device_pixel_ratio;
        let base = Surface::new(css_width, css_height, dpr, config.background);
        let view = Surface::new(css_width, css_height, dpr, config.background);
        let history = HistoryStack::new(config.max_history).with_background(config.background);
        let mut router = Self {
            settings: ToolSettings::from_config(&config),
            measure: MeasurementEngine::new(config.unit, config.measurement),
            resize: ResizeDebouncer::new(config.resize_debounce_ms),
            client_rect: ClientRect::new(0.0, 0.0, css_width, css_height),
            base,
            view,
            history,
            strokes: StrokeEngine::new(),
            tool: ToolKind::Pen,
            prev_tool: ToolKind::Pen,
            state: RouterState::Idle,
            torn_down: false,
            config,
        };
        router.commit();
        router
    }

    /// Build a router sized from its container width.
    pub fn for_container(config: SketchConfig, container_width: f64) -> Self {
        let (w, h) = Surface::container_css_size(container_width);
        Self::new(config, w, h)
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Committed strokes, without measurements.
    pub fn base(&self) -> &Surface {
        &self.base
    }

    /// What the user sees.
    pub fn view(&self) -> &Surface {
        &self.view
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn measurements(&self) -> &[Measurement] {
        self.measure.measurements()
    }

    pub fn state(&self) -> RouterState {
        self.state
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn unit(&self) -> Unit {
        self.measure.unit()
    }

    pub fn controls(&self) -> ControlState {
        ControlState {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        }
    }

    pub fn tool_preview(&self) -> ToolPreview {
        self.settings.preview(self.tool)
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn response(&self, changed: bool) -> Response {
        Response {
            changed,
            consumed: changed,
            controls: self.controls(),
            tool: self.tool,
            edit: None,
            edit_closed: false,
        }
    }

    /// Current controls and tool, with nothing changed.
    pub fn status(&self) -> Response {
        self.response(false)
    }

    // ─── Event dispatch ──────────────────────────────────────────────────

    pub fn handle(&mut self, event: InputEvent, host: &mut dyn Host) -> Response {
        if self.torn_down {
            return self.status();
        }
        match event {
            InputEvent::PointerDown(p) => self.pointer_down(p),
            InputEvent::PointerMove(p) => self.pointer_move(p),
            InputEvent::PointerUp(p) | InputEvent::PointerCancel(p) => self.pointer_up(p),
            InputEvent::Wheel { delta_y, modifiers } => self.wheel(delta_y, modifiers),
            InputEvent::Key { key, modifiers } => self.key(&key, modifiers, host),
            InputEvent::LabelCommit { text } => self.commit_label(&text),
            InputEvent::LabelCancel => self.cancel_label(),
        }
    }

    fn raster_point(&self, p: &PointerInput) -> Point {
        self.base.client_to_raster(p.client, &self.client_rect)
    }

    fn pointer_down(&mut self, p: PointerInput) -> Response {
        if !p.is_primary() {
            return self.status();
        }
        let mut edit_closed = false;
        match self.state {
            RouterState::Idle => {}
            RouterState::EditingLabel { .. } => {
                // Clicking away from the inline editor abandons it
                self.state = RouterState::Idle;
                edit_closed = true;
            }
            RouterState::Drawing { .. } | RouterState::Measuring { .. } => {
                log::trace!("pointer {} ignored: gesture in progress", p.id);
                return self.status();
            }
        }

        let point = self.raster_point(&p);
        let mut response = match self.tool {
            ToolKind::Measure => {
                if let Some(id) = self.measure.hit_test(point) {
                    self.begin_label_edit(id)
                } else {
                    self.measure.begin(&self.view, point);
                    self.state = RouterState::Measuring { pointer: p.id };
                    log::debug!("measuring (pointer {})", p.id);
                    self.response(false)
                }
            }
            ToolKind::Pen | ToolKind::Eraser => {
                self.strokes.begin(point);
                self.state = RouterState::Drawing { pointer: p.id };
                log::debug!("drawing with {} (pointer {})", self.tool.name(), p.id);
                self.response(false)
            }
        };
        response.consumed = true;
        response.edit_closed |= edit_closed;
        response
    }

    fn pointer_move(&mut self, p: PointerInput) -> Response {
        match self.state {
            RouterState::Drawing { pointer } if pointer == p.id => {
                let point = self.raster_point(&p);
                let color = self.settings.stroke_color(self.tool);
                let width = self.settings.width;
                match self.strokes.extend(&mut self.base, point, color, width) {
                    Some(line) => {
                        // Mirror onto the view so the stroke shows without a recompose
                        paint_segment(&mut self.view, line, color, width);
                        self.response(true)
                    }
                    None => self.status(),
                }
            }
            RouterState::Measuring { pointer } if pointer == p.id => {
                let point = self.raster_point(&p);
                self.measure.update(&mut self.view, point);
                self.response(true)
            }
            _ => self.status(),
        }
    }

    fn pointer_up(&mut self, p: PointerInput) -> Response {
        match self.state {
            RouterState::Drawing { pointer } if pointer == p.id => {
                self.strokes.end();
                self.state = RouterState::Idle;
                // Keep the overlay above the new stroke
                self.recompose();
                self.commit();
                self.response(true)
            }
            RouterState::Measuring { pointer } if pointer == p.id => {
                let point = self.raster_point(&p);
                self.state = RouterState::Idle;
                if self.measure.end(&mut self.view, point).is_some() {
                    self.commit();
                }
                self.response(true)
            }
            _ => self.status(),
        }
    }

    fn wheel(&mut self, delta_y: f64, modifiers: Modifiers) -> Response {
        if self.tool != ToolKind::Measure || !modifiers.ctrl {
            return self.status();
        }
        let size = self.measure.adjust_font_size(delta_y);
        self.config.measurement.font_size = size;
        log::debug!("measurement font size {size}");
        self.recompose_unless_dragging();
        let mut response = self.response(true);
        response.consumed = true;
        response
    }

    fn key(&mut self, key: &str, modifiers: Modifiers, host: &mut dyn Host) -> Response {
        let Some(action) = ShortcutMap::resolve(key, modifiers) else {
            return self.status();
        };
        let mut response = match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Save => {
                // Outcome reaches the user through host notices
                let _ = self.save(host);
                self.response(false)
            }
            ShortcutAction::Clear => self.clear(host),
            ShortcutAction::ToggleMeasure => self.toggle_measure(),
            ShortcutAction::Cancel => return self.cancel(),
            // The inline editor sends its text with `LabelCommit`
            ShortcutAction::Confirm => return self.status(),
        };
        response.consumed = true;
        response
    }

    /// Escape: abandon a measurement drag or a label edit.
    fn cancel(&mut self) -> Response {
        match self.state {
            RouterState::Measuring { .. } => {
                self.measure.cancel(&mut self.view);
                self.state = RouterState::Idle;
                // Back to the last committed snapshot
                if let Some(restored) = self.history.restore_current(&mut self.base) {
                    self.measure.replace(restored.measurements);
                }
                self.recompose();
                let mut response = self.response(true);
                response.consumed = true;
                response
            }
            RouterState::EditingLabel { .. } => self.cancel_label(),
            _ => self.status(),
        }
    }

    // ─── Label editing ───────────────────────────────────────────────────

    fn begin_label_edit(&mut self, id: MeasurementId) -> Response {
        let Some(m) = self.measure.get(id) else {
            return self.status();
        };
        let at = self.base.raster_to_client(m.midpoint(), &self.client_rect);
        let request = EditRequest {
            id: id.to_string(),
            value: m.value(),
            x: at.x,
            y: at.y,
        };
        self.state = RouterState::EditingLabel { id };
        log::debug!("editing label {id:?}");
        let mut response = self.response(false);
        response.edit = Some(request);
        response
    }

    fn commit_label(&mut self, text: &str) -> Response {
        let RouterState::EditingLabel { id } = self.state else {
            return self.status();
        };
        self.state = RouterState::Idle;
        let changed = self.measure.edit(id, text);
        if changed {
            self.recompose();
            self.commit();
        }
        let mut response = self.response(changed);
        response.consumed = true;
        response.edit_closed = true;
        response
    }

    fn cancel_label(&mut self) -> Response {
        if !matches!(self.state, RouterState::EditingLabel { .. }) {
            return self.status();
        }
        self.state = RouterState::Idle;
        let mut response = self.response(false);
        response.consumed = true;
        response.edit_closed = true;
        response
    }

    // ─── Commands ────────────────────────────────────────────────────────

    /// End whatever gesture is active without committing it. Callers either
    /// overwrite `base` next or go through [`InputRouter::settle`].
    fn interrupt(&mut self) -> bool {
        let was_editing = matches!(self.state, RouterState::EditingLabel { .. });
        match self.state {
            RouterState::Drawing { .. } => self.strokes.end(),
            RouterState::Measuring { .. } => self.measure.discard(),
            _ => {}
        }
        self.state = RouterState::Idle;
        was_editing
    }

    /// End the active gesture but keep a stroke already painted into `base`,
    /// recording it so it stays undoable.
    fn settle(&mut self) -> bool {
        let drawing = matches!(self.state, RouterState::Drawing { .. });
        let edit_closed = self.interrupt();
        if drawing {
            self.commit();
        }
        edit_closed
    }

    pub fn undo(&mut self) -> Response {
        let edit_closed = self.interrupt();
        let restored = self.history.undo(&mut self.base);
        self.after_restore(restored, edit_closed)
    }

    pub fn redo(&mut self) -> Response {
        let edit_closed = self.interrupt();
        let restored = self.history.redo(&mut self.base);
        self.after_restore(restored, edit_closed)
    }

    fn after_restore(&mut self, restored: Option<crate::history::Restored>, edit_closed: bool) -> Response {
        let changed = match restored {
            Some(restored) => {
                self.measure.replace(restored.measurements);
                true
            }
            None => edit_closed,
        };
        // Always recompose: an interrupted gesture may have left marks
        self.recompose();
        let mut response = self.response(changed);
        response.edit_closed = edit_closed;
        response
    }

    /// Wipe strokes and measurements after the host confirms.
    pub fn clear(&mut self, host: &mut dyn Host) -> Response {
        if !host.confirm(CLEAR_PROMPT) {
            return self.status();
        }
        let edit_closed = self.interrupt();
        self.base.fill(self.config.background);
        self.measure.clear();
        self.recompose();
        self.commit();
        let mut response = self.response(true);
        response.edit_closed = edit_closed;
        response
    }

    /// Save the flattened sketch into the host record.
    pub fn save(&mut self, host: &mut dyn Host) -> Result<(), crate::EditorError> {
        let flat = self.flatten();
        let options = ExportOptions {
            format: self.config.export_format,
            quality: self.config.export_quality,
        };
        persist::save(host, &self.config.field, &flat, &ImageCodec, options)
    }

    /// Strokes plus committed measurements, without any drag preview.
    pub fn flatten(&self) -> Surface {
        let (w, h) = self.base.css_size();
        let mut flat = Surface::new(w, h, self.base.dpr(), self.config.background);
        flat.copy_from(&self.base);
        self.measure.render(&mut flat);
        flat
    }

    fn toggle_measure(&mut self) -> Response {
        let next = if self.tool == ToolKind::Measure {
            self.prev_tool
        } else {
            ToolKind::Measure
        };
        self.set_tool(next)
    }

    pub fn set_tool(&mut self, tool: ToolKind) -> Response {
        if tool == self.tool {
            return self.status();
        }
        let edit_closed = self.settle();
        if self.tool != ToolKind::Measure {
            self.prev_tool = self.tool;
        }
        self.tool = tool;
        log::debug!("tool: {}", tool.name());
        self.recompose();
        let mut response = self.response(true);
        response.edit_closed = edit_closed;
        response
    }

    pub fn set_pen_color(&mut self, color: Color) {
        self.settings.color = color;
        self.config.pen_color = color;
    }

    pub fn set_pen_width(&mut self, width: f64) {
        let width = width.max(1.0);
        self.settings.width = width;
        self.config.pen_width = width;
    }

    /// Export quality as shown in the UI, `0..=100` percent.
    pub fn set_export_quality_percent(&mut self, percent: f64) {
        self.config.export_quality = (percent / 100.0).clamp(0.0, 1.0);
    }

    pub fn set_unit(&mut self, unit: Unit) -> Response {
        self.measure.change_unit(unit);
        self.config.unit = unit;
        self.recompose_unless_dragging();
        self.response(true)
    }

    pub fn set_measurement_color(&mut self, color: Color) -> Response {
        self.measure.set_color(color);
        self.config.measurement.color = color;
        self.recompose_unless_dragging();
        self.response(true)
    }

    pub fn set_font_size(&mut self, size: f64) -> Response {
        self.measure.set_font_size(size);
        self.config.measurement.font_size = self.measure.style().font_size;
        self.recompose_unless_dragging();
        self.response(true)
    }

    // ─── Geometry ────────────────────────────────────────────────────────

    /// Where the canvas element currently sits on the page.
    pub fn set_client_rect(&mut self, rect: ClientRect) {
        self.client_rect = rect;
    }

    /// Note a container size change; applied by [`InputRouter::tick`] once
    /// the size settles.
    pub fn observe_resize(&mut self, container_width: f64, now_ms: f64) {
        if !self.torn_down {
            self.resize.schedule(container_width, now_ms);
        }
    }

    /// Apply a settled resize, if one is due.
    pub fn tick(&mut self, now_ms: f64) -> Response {
        match self.resize.poll(now_ms) {
            Some(width) => self.resize_to_container(width),
            None => self.status(),
        }
    }

    pub fn resize_to_container(&mut self, container_width: f64) -> Response {
        let (w, h) = Surface::container_css_size(container_width);
        let outcome = self.base.resize(w, h, true, self.config.background);
        self.after_resize(outcome)
    }

    pub fn set_device_pixel_ratio(&mut self, dpr: f64) -> Response {
        if !(dpr.is_finite() && dpr > 0.0) {
            return self.status();
        }
        self.config.device_pixel_ratio = dpr;
        let outcome = self.base.set_device_pixel_ratio(dpr, self.config.background);
        self.after_resize(outcome)
    }

    fn after_resize(&mut self, outcome: ResizeOutcome) -> Response {
        if outcome == ResizeOutcome::Unchanged {
            return self.status();
        }
        if let ResizeOutcome::Rescaled { sx, sy } = outcome {
            self.measure.scale(sx, sy);
        }
        // Measurements are rescaled first so a settled stroke is recorded
        // with a matching side-car
        let edit_closed = self.settle();
        let (w, h) = self.base.css_size();
        self.client_rect = ClientRect::new(self.client_rect.left, self.client_rect.top, w, h);
        self.recompose();
        log::debug!("resized to {}x{} ({outcome:?})", self.base.width(), self.base.height());
        let mut response = self.response(true);
        response.edit_closed = edit_closed;
        response
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn recompose(&mut self) {
        compose(&mut self.view, &self.base, self.measure.measurements(), self.measure.style());
    }

    fn recompose_unless_dragging(&mut self) {
        // The drag snapshot is the view as it was; restyling it now would
        // leave a stale preview behind on the next update.
        if !self.measure.is_dragging() {
            self.recompose();
        }
    }

    fn commit(&mut self) {
        if let Err(e) = self.history.commit(&self.base, self.measure.measurements()) {
            log::warn!("failed to record history: {e}");
        }
    }

    /// Release everything. The router ignores events afterwards.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.interrupt();
        self.resize.cancel();
        self.history.clear();
        self.measure.clear();
        self.torn_down = true;
        log::debug!("router torn down");
    }
}
