//! Firework bursts.
//!
//! Each burst is a point cloud of particles on a spherical shell. A shader
//! animates expansion, fall, twinkle and fade from a single progress value,
//! which a tween drives from 0 to 1 before disposing the burst.

mod emitter;
mod particle;
mod particle_system;

pub use emitter::{BurstRanges, RangeF32, RangeU32};
pub use particle::{Firework, FireworkParams, ParticleAttributes};
pub use particle_system::{FireworkSystem, DEFAULT_DURATION};
