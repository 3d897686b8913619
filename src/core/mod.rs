//! # Core Module
//!
//! GPU context, the frame renderer, the engine that ties the demo together,
//! and timing utilities.

mod engine;
mod context;
mod renderer;
mod clock;
mod id;

pub use engine::{pixel_size, Engine, EngineBuilder, EngineError};
pub use context::{Context, ContextError};
pub use renderer::{RenderInfo, Renderer};
pub use clock::Clock;
pub use id::Id;

/// GPU-level render options.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Premultiplied-alpha canvas compositing.
    pub alpha: bool,
    /// Power preference for GPU selection.
    pub power_preference: wgpu::PowerPreference,
    /// Present mode (vsync).
    pub present_mode: wgpu::PresentMode,
    /// Clear color, visible only where the sky does not cover.
    pub clear_color: wgpu::Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            alpha: false,
            power_preference: wgpu::PowerPreference::HighPerformance,
            present_mode: wgpu::PresentMode::AutoVsync,
            clear_color: wgpu::Color::BLACK,
        }
    }
}
