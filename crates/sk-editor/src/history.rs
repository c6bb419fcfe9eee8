//! Undo/redo history of encoded surface snapshots.
//!
//! The stack is a linear list with a cursor. Committing after an undo
//! prunes the redo branch; the oldest entry is evicted once the list
//! exceeds its bound. Each entry holds the raster as portable bytes plus
//! the measurement list at that instant, so restoring an entry brings the
//! overlay back in step with the pixels.

use crate::EditorError;
use sk_core::{Color, Measurement};
use sk_render::{ExportOptions, ImageCodec, RasterCodec, Surface};

/// One committed snapshot.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    raster: Vec<u8>,
    width: u32,
    height: u32,
    side_car: Vec<u8>,
}

impl HistoryEntry {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// What a restore brought back besides the pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Restored {
    /// The measurement list recorded with the entry, scaled to the current
    /// surface if the entry was committed at another size.
    pub measurements: Vec<Measurement>,
    /// `false` when decoding failed and the surface was blanked instead.
    pub raster_restored: bool,
}

pub struct HistoryStack {
    entries: Vec<HistoryEntry>,
    /// Cursor into `entries`; `None` when empty.
    index: Option<usize>,
    max_entries: usize,
    codec: Box<dyn RasterCodec>,
    /// Fill colour used when a snapshot cannot be decoded.
    background: Color,
}

impl HistoryStack {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::with_capacity(max_entries.min(64)),
            index: None,
            max_entries: max_entries.max(1),
            codec: Box::new(ImageCodec),
            background: Color::WHITE,
        }
    }

    pub fn with_codec(mut self, codec: impl RasterCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    /// Snapshot the surface and measurements as the new current entry.
    ///
    /// On failure nothing changes: the redo branch is only pruned once the
    /// new entry has been encoded.
    pub fn commit(&mut self, surface: &Surface, measurements: &[Measurement]) -> Result<(), EditorError> {
        let raster = surface.to_portable_bytes(self.codec.as_ref(), ExportOptions::SNAPSHOT)?;
        let side_car = rmp_serde::to_vec_named(measurements).map_err(|e| EditorError::SideCar(e.to_string()))?;
        let entry = HistoryEntry {
            raster,
            width: surface.width(),
            height: surface.height(),
            side_car,
        };

        // Drop the redo branch
        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push(entry);
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }
        self.index = Some(self.entries.len() - 1);
        log::debug!("history commit: len {} cursor {}", self.entries.len(), self.entries.len() - 1);
        Ok(())
    }

    /// Step back one entry and restore it into `surface`.
    /// Returns `None` (and changes nothing) at the oldest entry.
    pub fn undo(&mut self, surface: &mut Surface) -> Option<Restored> {
        let target = self.index?.checked_sub(1)?;
        self.index = Some(target);
        Some(self.restore_at(target, surface))
    }

    /// Step forward one entry and restore it. `None` at the newest entry.
    pub fn redo(&mut self, surface: &mut Surface) -> Option<Restored> {
        let target = self.index? + 1;
        if target >= self.entries.len() {
            return None;
        }
        self.index = Some(target);
        Some(self.restore_at(target, surface))
    }

    /// Re-apply the entry under the cursor.
    pub fn restore_current(&self, surface: &mut Surface) -> Option<Restored> {
        self.index.map(|i| self.restore_at(i, surface))
    }

    fn restore_at(&self, index: usize, surface: &mut Surface) -> Restored {
        let entry = &self.entries[index];
        let raster_restored = match surface.load_portable_bytes(self.codec.as_ref(), &entry.raster) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("history entry {index}: {e}; filling background");
                surface.fill(self.background);
                false
            }
        };

        let mut measurements: Vec<Measurement> = match rmp_serde::from_slice(&entry.side_car) {
            Ok(list) => list,
            Err(e) => {
                log::warn!("history entry {index}: unreadable measurements: {e}");
                Vec::new()
            }
        };
        if entry.dimensions() != (surface.width(), surface.height()) {
            let sx = f64::from(surface.width()) / f64::from(entry.width);
            let sy = f64::from(surface.height()) / f64::from(entry.height);
            for m in &mut measurements {
                m.scale(sx, sy);
            }
        }

        Restored {
            measurements,
            raster_restored,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.index.is_some_and(|i| i + 1 < self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
    }
}
