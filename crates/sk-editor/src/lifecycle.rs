//! Listener bookkeeping and resize debouncing.
//!
//! Every listener the widget installs is wrapped in a `DetachHandle` held
//! by a `ListenerScope`; releasing the scope detaches all of them at once,
//! so nothing can fire after teardown.

/// Removes one registered listener when released or dropped.
pub struct DetachHandle {
    detach: Option<Box<dyn FnOnce()>>,
}

impl DetachHandle {
    pub fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// Detach now. Idempotent.
    pub fn release(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for DetachHandle {
    fn drop(&mut self) {
        self.release();
    }
}

/// Owns every listener of one widget instance.
#[derive(Default)]
pub struct ListenerScope {
    handles: Vec<(String, DetachHandle)>,
}

impl ListenerScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, event: &str, handle: DetachHandle) {
        self.handles.push((event.to_string(), handle));
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Detach every listener, most recent first. Returns how many were released.
    pub fn release_all(&mut self) -> usize {
        let count = self.handles.len();
        while let Some((event, mut handle)) = self.handles.pop() {
            log::trace!("detach {event} listener");
            handle.release();
        }
        count
    }
}

impl Drop for ListenerScope {
    fn drop(&mut self) {
        self.release_all();
    }
}

/// Coalesces container resize notifications: the latest width is applied
/// once no new notification arrived for the quiet period.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    quiet_ms: f64,
    pending: Option<Pending>,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    width: f64,
    due_ms: f64,
}

impl ResizeDebouncer {
    pub const DEFAULT_QUIET_MS: f64 = 150.0;

    pub fn new(quiet_ms: f64) -> Self {
        Self {
            quiet_ms,
            pending: None,
        }
    }

    /// Record a new container width observed at `now_ms`, restarting the timer.
    pub fn schedule(&mut self, width: f64, now_ms: f64) {
        self.pending = Some(Pending {
            width,
            due_ms: now_ms + self.quiet_ms,
        });
    }

    /// The width to apply, once the quiet period has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> Option<f64> {
        let pending = self.pending?;
        if now_ms < pending.due_ms {
            return None;
        }
        self.pending = None;
        Some(pending.width)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_QUIET_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn scope_detaches_everything_once() {
        let detached = Rc::new(Cell::new(0));
        let mut scope = ListenerScope::new();
        for event in ["pointerdown", "pointermove", "keydown"] {
            let counter = detached.clone();
            scope.attach(event, DetachHandle::new(move || counter.set(counter.get() + 1)));
        }
        assert_eq!(scope.len(), 3);
        assert_eq!(scope.release_all(), 3);
        assert_eq!(detached.get(), 3);
        assert_eq!(scope.release_all(), 0);
        drop(scope);
        assert_eq!(detached.get(), 3);
    }

    #[test]
    fn dropping_scope_detaches() {
        let detached = Rc::new(Cell::new(false));
        {
            let mut scope = ListenerScope::new();
            let flag = detached.clone();
            scope.attach("wheel", DetachHandle::new(move || flag.set(true)));
        }
        assert!(detached.get());
    }

    #[test]
    fn debounce_keeps_latest_width() {
        let mut debounce = ResizeDebouncer::default();
        debounce.schedule(640.0, 0.0);
        debounce.schedule(700.0, 100.0);
        assert_eq!(debounce.poll(200.0), None);
        assert_eq!(debounce.poll(250.0), Some(700.0));
        assert_eq!(debounce.poll(400.0), None);
    }

    #[test]
    fn cancelled_resize_never_fires() {
        let mut debounce = ResizeDebouncer::new(150.0);
        debounce.schedule(640.0, 0.0);
        debounce.cancel();
        assert!(!debounce.is_pending());
        assert_eq!(debounce.poll(1000.0), None);
    }
}
