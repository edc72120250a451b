pub mod bounds;
pub mod projection;
pub mod scaling;

pub use bounds::{Bounds, BoundsAccumulator};
pub use projection::Projector;
pub use scaling::Scaler;

/// Point on the host surface
pub type Point = geo::Coord<f64>;
