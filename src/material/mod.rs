//! Materials and their render pipelines.

mod firework;

pub use firework::{Blending, CameraUniform, FireworkMaterial, FireworkPipeline, FireworkUniform};
