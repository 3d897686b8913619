//! Main engine entry point.

use thiserror::Error;

use super::{Clock, Context, ContextError, Id, RenderConfig, Renderer};
use crate::camera::PerspectiveCamera;
use crate::config::{CameraConfig, ConfigError, FireworksConfig};
use crate::controls::OrbitControls;
use crate::debug::{DebugError, DebugPanel};
use crate::particles::FireworkSystem;
use crate::scene::Scene;
use crate::sky::Sky;
use crate::texture::{DecodedImage, TextureError, TexturePool};

/// Startup failures.
#[derive(Error, Debug)]
pub enum EngineError {
    /// GPU setup failed.
    #[error(transparent)]
    Context(#[from] ContextError),
    /// Sprites could not be loaded.
    #[error(transparent)]
    Texture(#[from] TextureError),
    /// Configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Device-pixel size for a CSS size, with the pixel ratio capped at `max_ratio`.
///
/// Non-positive or non-finite ratios count as 1. Each side is at least one pixel.
pub fn pixel_size(css_width: f64, css_height: f64, device_pixel_ratio: f64, max_ratio: f32) -> (u32, u32) {
    let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };
    let ratio = ratio.min(max_ratio as f64);
    let side = |css: f64| {
        if css.is_finite() {
            (css * ratio).round().max(1.0) as u32
        } else {
            1
        }
    };
    (side(css_width), side(css_height))
}

/// Camera placed and aimed as configured.
fn camera_from(config: &CameraConfig, aspect: f32) -> PerspectiveCamera {
    let mut camera = PerspectiveCamera::new(config.fov, aspect, config.near, config.far);
    camera.set_position(config.position);
    camera.look_at(config.target);
    camera
}

/// Orbit controls around the configured target.
fn controls_from(config: &CameraConfig) -> OrbitControls {
    OrbitControls::with_target(config.target).with_damping(config.damping_factor)
}

/// The fireworks engine: GPU state, camera, sky and live bursts.
pub struct Engine {
    /// The wgpu context.
    pub context: Context,
    /// The renderer.
    pub renderer: Renderer,
    /// The clock for timing.
    pub clock: Clock,
    /// The viewing camera.
    pub camera: PerspectiveCamera,
    /// Mouse orbit around the scene.
    pub controls: OrbitControls,
    /// Background sky; its settings are bound to the debug panel.
    pub sky: Sky,
    /// Live sky parameters.
    pub debug: DebugPanel,
    sprites: TexturePool,
    scene: Scene,
    fireworks: FireworkSystem,
    max_pixel_ratio: f32,
}

impl Engine {
    /// Create an engine rendering into `window`.
    ///
    /// `css_width` and `css_height` are in CSS pixels; the surface is sized at
    /// `device_pixel_ratio`, capped by the configuration.
    pub async fn new<W>(
        window: W,
        css_width: f64,
        css_height: f64,
        device_pixel_ratio: f64,
        sprites: &[DecodedImage],
        config: FireworksConfig,
    ) -> Result<Self, EngineError>
    where
        W: Into<wgpu::SurfaceTarget<'static>>,
    {
        Self::with_config(
            window,
            css_width,
            css_height,
            device_pixel_ratio,
            sprites,
            config,
            RenderConfig::default(),
        )
        .await
    }

    /// Create an engine with custom GPU options.
    pub async fn with_config<W>(
        window: W,
        css_width: f64,
        css_height: f64,
        device_pixel_ratio: f64,
        sprites: &[DecodedImage],
        config: FireworksConfig,
        render_config: RenderConfig,
    ) -> Result<Self, EngineError>
    where
        W: Into<wgpu::SurfaceTarget<'static>>,
    {
        config.validate()?;

        let (width, height) = pixel_size(css_width, css_height, device_pixel_ratio, config.max_pixel_ratio);
        let context = Context::new(window, width, height, &render_config).await?;
        let renderer = Renderer::new(&context, render_config);
        let sprites = TexturePool::from_images(&context.device, &context.queue, sprites)?;
        let sky = Sky::new(&context.device, context.surface_format, context.depth_format, config.sky);

        let camera = camera_from(&config.camera, context.aspect_ratio());
        let controls = controls_from(&config.camera);

        let mut scene = Scene::new();
        scene.set_name("Fireworks");
        let mut fireworks = FireworkSystem::from_config(&config, sprites.len());
        fireworks.set_resolution(&mut scene, width as f32, height as f32);

        log::info!("Engine started at {}x{} with {} sprites", width, height, sprites.len());

        Ok(Self {
            context,
            renderer,
            clock: Clock::start_new(),
            camera,
            controls,
            sky,
            debug: DebugPanel::new(),
            sprites,
            scene,
            fireworks,
            max_pixel_ratio: config.max_pixel_ratio,
        })
    }

    /// Advance controls and bursts by the wall-clock delta, then draw.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let delta = self.clock.frame_delta();
        self.update(delta);
        self.render()
    }

    /// Advance controls and bursts by `delta` seconds without drawing.
    pub fn update(&mut self, delta: f32) {
        self.controls.update(&mut self.camera);
        self.fireworks.update(&mut self.scene, delta);
    }

    /// Draw the current state.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let result = self.renderer.render(
            &self.context,
            &self.camera,
            &self.sky,
            &mut self.scene,
            &self.sprites,
        );
        match result {
            Ok(()) => Ok(()),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated; reconfiguring");
                self.context.reconfigure();
                Ok(())
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface texture timed out; skipping frame");
                Ok(())
            }
            Err(e) => {
                log::error!("Surface error: {}", e);
                Err(e)
            }
        }
    }

    /// Resize to a CSS size at the given device pixel ratio.
    ///
    /// Updates the surface, depth buffer, camera aspect and every live burst's
    /// resolution. Particle data is left untouched.
    pub fn resize(&mut self, css_width: f64, css_height: f64, device_pixel_ratio: f64) {
        let (width, height) = pixel_size(css_width, css_height, device_pixel_ratio, self.max_pixel_ratio);
        if width == self.width() && height == self.height() {
            return;
        }

        self.context.resize(width, height);
        self.renderer.resize(&self.context);
        self.camera.set_aspect(width as f32 / height as f32);
        self.fireworks
            .set_resolution(&mut self.scene, width as f32, height as f32);
        log::info!("Resized to {}x{}", width, height);
    }

    /// Spawn one random burst.
    pub fn trigger(&mut self) -> Option<Id> {
        self.fireworks.create_random_firework(&mut self.scene)
    }

    /// Orbit from a pointer drag in device pixels.
    pub fn on_pointer_drag(&mut self, delta_x: f32, delta_y: f32) {
        let height = self.height() as f32;
        self.controls.rotate_by_pixels(delta_x, delta_y, height);
    }

    /// Zoom from a wheel event.
    pub fn on_wheel(&mut self, delta_y: f32) {
        self.controls.zoom_by_wheel(delta_y);
    }

    /// Write a debug parameter; the next frame renders with it.
    pub fn set_parameter(&mut self, name: &str, value: f32) -> Result<f32, DebugError> {
        self.debug.set(&mut self.sky.settings, name, value)
    }

    /// Read a debug parameter.
    pub fn parameter(&self, name: &str) -> Result<f32, DebugError> {
        self.debug.get(&self.sky.settings, name)
    }

    /// Debug parameter names in panel order.
    pub fn parameter_names(&self) -> Vec<&'static str> {
        self.debug.names()
    }

    /// Surface width in device pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.context.width()
    }

    /// Surface height in device pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.context.height()
    }

    /// Live bursts.
    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Burst factory and tween driver.
    #[inline]
    pub fn fireworks(&self) -> &FireworkSystem {
        &self.fireworks
    }

    /// Number of bursts still animating.
    #[inline]
    pub fn live_bursts(&self) -> usize {
        self.fireworks.live_count()
    }

    /// Frames rendered so far.
    #[inline]
    pub fn frame_number(&self) -> u64 {
        self.renderer.info().frame
    }
}

/// Builder for configuring the engine.
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    config: FireworksConfig,
    render: RenderConfig,
}

impl EngineBuilder {
    /// Create a new engine builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an application configuration.
    pub fn config(mut self, config: FireworksConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the burst RNG seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set premultiplied-alpha compositing.
    pub fn alpha(mut self, enabled: bool) -> Self {
        self.render.alpha = enabled;
        self
    }

    /// Set power preference.
    pub fn power_preference(mut self, preference: wgpu::PowerPreference) -> Self {
        self.render.power_preference = preference;
        self
    }

    /// Set present mode.
    pub fn present_mode(mut self, mode: wgpu::PresentMode) -> Self {
        self.render.present_mode = mode;
        self
    }

    /// Set clear color.
    pub fn clear_color(mut self, r: f64, g: f64, b: f64) -> Self {
        self.render.clear_color = wgpu::Color { r, g, b, a: 1.0 };
        self
    }

    /// Build the engine from already decoded sprites.
    pub async fn build<W>(
        self,
        window: W,
        css_width: f64,
        css_height: f64,
        device_pixel_ratio: f64,
        sprites: &[DecodedImage],
    ) -> Result<Engine, EngineError>
    where
        W: Into<wgpu::SurfaceTarget<'static>>,
    {
        Engine::with_config(
            window,
            css_width,
            css_height,
            device_pixel_ratio,
            sprites,
            self.config,
            self.render,
        )
        .await
    }

    /// Build the engine, reading sprites from the configured files.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn build_from_files<W>(
        self,
        window: W,
        css_width: f64,
        css_height: f64,
        device_pixel_ratio: f64,
    ) -> Result<Engine, EngineError>
    where
        W: Into<wgpu::SurfaceTarget<'static>>,
    {
        let sprites = self.config.sprites.decode_files()?;
        self.build(window, css_width, css_height, device_pixel_ratio, &sprites)
            .await
    }
}
