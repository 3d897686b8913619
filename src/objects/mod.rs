//! Renderable objects.

mod points;

pub use points::{Points, PointsGpu};
