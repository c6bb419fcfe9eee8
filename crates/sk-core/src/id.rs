//! Measurement identity.
//!
//! A measurement keeps its id for its whole life: through unit changes,
//! value edits, resizes and undo/redo. History side-cars store the id as
//! its plain name, so a restored list resolves back to the same ids and an
//! open label editor can still address its measurement.

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

static NAMES: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Names one placed measurement. Equal names are the same measurement.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeasurementId(Spur);

impl MeasurementId {
    /// The id called `name`, creating it on first use.
    pub fn intern(name: &str) -> Self {
        MeasurementId(NAMES.get_or_intern(name))
    }

    pub fn as_str(&self) -> &str {
        NAMES.resolve(&self.0)
    }

    /// A fresh id for a newly placed measurement (`measure_0`, `measure_1`, ...).
    pub fn generate() -> Self {
        Self::with_prefix("measure")
    }

    /// A fresh `{prefix}_{n}` id no existing measurement uses.
    pub fn with_prefix(prefix: &str) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static NEXT: AtomicU64 = AtomicU64::new(0);
        loop {
            let n = NEXT.fetch_add(1, Ordering::Relaxed);
            let candidate = format!("{prefix}_{n}");
            // Names restored from a saved side-car are already taken
            if NAMES.get(&candidate).is_none() {
                return Self::intern(&candidate);
            }
        }
    }
}

impl fmt::Debug for MeasurementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for MeasurementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MeasurementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MeasurementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(MeasurementId::intern(&s))
    }
}
