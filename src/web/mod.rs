//! Web bindings for the fireworks demo.
//!
//! This module provides JavaScript-friendly APIs via wasm-bindgen.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, HtmlCanvasElement, Request, RequestInit, RequestMode, Response, Window};

use crate::config::FireworksConfig;
use crate::core::{pixel_size, Engine};
use crate::texture::{decode_image, DecodedImage};

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// GET `url` and return the body bytes.
async fn fetch_bytes(window: &Window, url: &str) -> Result<Vec<u8>, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts)?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()
        .map_err(|_| JsValue::from_str("fetch did not return a Response"))?;

    if !response.ok() {
        return Err(JsValue::from_str(&format!("GET {} failed: HTTP {}", url, response.status())));
    }

    let buffer = JsFuture::from(response.array_buffer()?).await?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Fetch and decode every sprite file in order.
async fn fetch_sprites(window: &Window, config: &FireworksConfig) -> Result<Vec<DecodedImage>, JsValue> {
    let mut images = Vec::with_capacity(config.sprites.count);
    for path in config.sprites.paths() {
        let bytes = fetch_bytes(window, &path).await?;
        images.push(decode_image(&bytes).map_err(js_error)?);
    }
    Ok(images)
}

/// The fireworks demo attached to a canvas.
#[wasm_bindgen]
pub struct FireworksApp {
    engine: Engine,
    canvas: HtmlCanvasElement,
}

#[wasm_bindgen]
impl FireworksApp {
    /// Attach to the canvas with id `canvas_id`.
    ///
    /// `config_json` overrides defaults; missing fields keep their default.
    #[wasm_bindgen]
    pub async fn new(canvas_id: &str, config_json: Option<String>) -> Result<FireworksApp, JsValue> {
        let window = window().ok_or_else(|| JsValue::from_str("No window object"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("No document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("Canvas '{}' not found", canvas_id)))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("Element is not a canvas"))?;

        let config = match config_json {
            Some(json) => FireworksConfig::from_json(&json).map_err(js_error)?,
            None => FireworksConfig::default(),
        };

        let sprites = fetch_sprites(&window, &config).await?;

        let dpr = window.device_pixel_ratio();
        let css_width = canvas.client_width() as f64;
        let css_height = canvas.client_height() as f64;
        let (width, height) = pixel_size(css_width, css_height, dpr, config.max_pixel_ratio);
        canvas.set_width(width);
        canvas.set_height(height);

        let engine = Engine::new(
            wgpu::SurfaceTarget::Canvas(canvas.clone()),
            css_width,
            css_height,
            dpr,
            &sprites,
            config,
        )
        .await
        .map_err(js_error)?;

        Ok(Self { engine, canvas })
    }

    /// Advance and draw one frame. Call from `requestAnimationFrame`.
    #[wasm_bindgen]
    pub fn frame(&mut self) -> Result<(), JsValue> {
        self.engine.frame().map_err(js_error)
    }

    /// Resize to the canvas' CSS size at the current device pixel ratio.
    #[wasm_bindgen]
    pub fn resize(&mut self, css_width: f64, css_height: f64) {
        let dpr = window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        self.engine.resize(css_width, css_height, dpr);
        self.canvas.set_width(self.engine.width());
        self.canvas.set_height(self.engine.height());
    }

    /// Spawn one random burst. Returns false if the live-burst cap rejected it.
    #[wasm_bindgen]
    pub fn on_click(&mut self) -> bool {
        self.engine.trigger().is_some()
    }

    /// Orbit the camera from a pointer drag in CSS pixels.
    #[wasm_bindgen]
    pub fn on_mouse_drag(&mut self, delta_x: f32, delta_y: f32) {
        let dpr = window().map(|w| w.device_pixel_ratio() as f32).unwrap_or(1.0);
        self.engine.on_pointer_drag(delta_x * dpr, delta_y * dpr);
    }

    /// Zoom the camera from a wheel event.
    #[wasm_bindgen]
    pub fn on_mouse_wheel(&mut self, delta: f32) {
        self.engine.on_wheel(delta);
    }

    /// Set a sky parameter. Returns the clamped, snapped value stored.
    #[wasm_bindgen]
    pub fn set_parameter(&mut self, name: &str, value: f32) -> Result<f32, JsValue> {
        self.engine.set_parameter(name, value).map_err(js_error)
    }

    /// Read a sky parameter.
    #[wasm_bindgen]
    pub fn parameter(&self, name: &str) -> Result<f32, JsValue> {
        self.engine.parameter(name).map_err(js_error)
    }

    /// Sky parameter names in panel order.
    #[wasm_bindgen]
    pub fn parameter_names(&self) -> Vec<String> {
        self.engine
            .parameter_names()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Bursts still animating.
    #[wasm_bindgen]
    pub fn live_bursts(&self) -> u32 {
        self.engine.live_bursts() as u32
    }

    /// Frames rendered so far.
    #[wasm_bindgen]
    pub fn frame_number(&self) -> u64 {
        self.engine.frame_number()
    }
}
