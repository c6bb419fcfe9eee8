pub mod config;
pub mod id;
pub mod model;
pub mod parser;
pub mod units;

pub use config::SketchConfig;
pub use id::MeasurementId;
pub use model::*;
pub use parser::{parse_color, parse_unit};
pub use units::Unit;

// Re-export the geometry types so downstream crates share one definition
pub use kurbo::{Line, Point, Vec2};
