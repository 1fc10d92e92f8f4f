pub mod buffer;
pub mod canvas;
pub mod clip;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod interpolate;
pub mod render;
pub mod vector;
pub mod widget;

pub use canvas::{Canvas, Colour, DrawCommand, DrawList};
pub use config::{AppConfig, CurveMode};
pub use engine::{Engine, Key, KeyOutcome, MouseButton, Scheduler};
pub use error::{Error, Result};
pub use interpolate::{CurveKind, HermiteParams};
pub use vector::{Point2D, Vector2D};
