//! # Ren Fireworks
//!
//! Click-triggered particle firework bursts over a procedural sky, rendered
//! with wgpu for native windows and WebGPU canvases.
//!
//! ## Modules
//!
//! - **Particles**: burst generation, lifetime tweens and disposal
//! - **Animation**: a generic tween and the group that drives it
//! - **Sky**: Preetham atmospheric scattering behind everything
//! - **Core**: wgpu context, renderer and the engine that owns the demo state
//!
//! ## Example
//!
//! ```ignore
//! use ren_fireworks::prelude::*;
//!
//! let mut engine = EngineBuilder::new()
//!     .config(FireworksConfig::default())
//!     .build(window, 1280.0, 720.0, 2.0, &sprites)
//!     .await?;
//!
//! engine.trigger();
//! loop {
//!     engine.frame()?;
//! }
//! ```

#![warn(missing_docs)]

#[cfg(all(feature = "web", target_arch = "wasm32"))]
use wasm_bindgen::prelude::*;

pub mod animation;
pub mod camera;
pub mod config;
pub mod controls;
pub mod core;
pub mod debug;
pub mod geometry;
pub mod material;
pub mod math;
pub mod objects;
pub mod particles;
pub mod scene;
pub mod sky;
pub mod texture;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

// Re-export commonly used types
pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::animation::*;
    pub use crate::camera::*;
    pub use crate::config::*;
    pub use crate::controls::*;
    pub use crate::core::*;
    pub use crate::debug::*;
    pub use crate::geometry::*;
    pub use crate::material::*;
    pub use crate::math::*;
    pub use crate::objects::*;
    pub use crate::particles::*;
    pub use crate::scene::*;
    pub use crate::sky::*;
    pub use crate::texture::*;
}

/// Browser start hook: readable panics and `log` output in the console.
#[cfg(all(feature = "web", target_arch = "wasm32"))]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("Logger already initialized");
    }
}

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = "Ren Fireworks";
