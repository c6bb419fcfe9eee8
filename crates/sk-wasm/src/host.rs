//! `Host` backed by JavaScript callbacks supplied by the page.

use js_sys::Function;
use sk_editor::{Host, Notice};
use wasm_bindgen::JsValue;

#[derive(Default)]
pub struct JsHost {
    /// `(level: string, message: string) => void`
    notify: Option<Function>,
    /// `(message: string) => boolean`
    confirm: Option<Function>,
    /// `(field: string, value: string) => void`, throwing on failure.
    update_record: Option<Function>,
}

impl JsHost {
    pub fn new(notify: Option<Function>, confirm: Option<Function>, update_record: Option<Function>) -> Self {
        Self {
            notify,
            confirm,
            update_record,
        }
    }
}

impl Host for JsHost {
    fn notify(&mut self, notice: Notice) {
        let Some(notify) = &self.notify else {
            log::info!("[{}] {}", notice.level.name(), notice.message);
            return;
        };
        let level = JsValue::from_str(notice.level.name());
        let message = JsValue::from_str(&notice.message);
        if let Err(e) = notify.call2(&JsValue::NULL, &level, &message) {
            log::error!("notify callback threw: {e:?}");
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        let Some(confirm) = &self.confirm else {
            log::warn!("no confirm callback; refusing \"{message}\"");
            return false;
        };
        match confirm.call1(&JsValue::NULL, &JsValue::from_str(message)) {
            Ok(answer) => answer.is_truthy(),
            Err(e) => {
                log::error!("confirm callback threw: {e:?}");
                false
            }
        }
    }

    fn update_record(&mut self, field: &str, value: &str) -> Result<(), String> {
        let Some(update) = &self.update_record else {
            return Err("no record bound".to_string());
        };
        update
            .call2(&JsValue::NULL, &JsValue::from_str(field), &JsValue::from_str(value))
            .map(|_| ())
            .map_err(|e| format!("{e:?}"))
    }
}
