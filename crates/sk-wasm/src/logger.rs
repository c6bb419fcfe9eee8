//! Routes `log` records and panics to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
struct ConsoleLogger;

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[sketch] {}: {}", record.target(), record.args());
        let line = wasm_bindgen::JsValue::from_str(&line);
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger and panic hook once per module instance.
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("sketch WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
            if log::set_logger(&LOGGER).is_ok() {
                log::set_max_level(LevelFilter::Info);
            }
        });
    }
}

/// Raise or lower console verbosity (`"trace"` … `"off"`).
pub fn set_level(level: &str) -> bool {
    match level.parse::<LevelFilter>() {
        Ok(filter) => {
            log::set_max_level(filter);
            true
        }
        Err(_) => false,
    }
}
