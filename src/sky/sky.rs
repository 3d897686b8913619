//! Preetham atmospheric sky drawn behind the scene.
//!
//! Per-frame terms (sun direction and intensity, scattering coefficients)
//! are computed here on the CPU; per-pixel scattering runs in `sky.wgsl`.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use wgpu::util::DeviceExt;

use crate::math::Vector3;

/// Rayleigh coefficients at sea level for 680/550/450 nm.
const TOTAL_RAYLEIGH: [f32; 3] = [5.804_543e-6, 1.356_291_2e-5, 3.026_590_3e-5];
/// Mie constants for the same wavelengths.
const MIE_CONST: [f32; 3] = [1.839_991_9e14, 2.779_802_4e14, 4.079_048e14];
/// Zenith angle past which the sun stops lighting the sky.
const CUTOFF_ANGLE: f32 = 1.611_073_2;
const STEEPNESS: f32 = 1.5;
/// Peak solar intensity.
const EE: f32 = 1000.0;

/// Editable sky parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkySettings {
    /// Atmospheric haziness.
    pub turbidity: f32,
    /// Rayleigh scattering strength.
    pub rayleigh: f32,
    /// Mie scattering coefficient.
    pub mie_coefficient: f32,
    /// Mie forward-scattering anisotropy.
    pub mie_directional_g: f32,
    /// Sun position; only its direction matters.
    pub sun_position: Vector3,
    /// World up.
    pub up: Vector3,
    /// Exposure applied before tone mapping.
    pub exposure: f32,
}

impl Default for SkySettings {
    fn default() -> Self {
        Self {
            turbidity: 10.0,
            rayleigh: 3.0,
            mie_coefficient: 0.005,
            mie_directional_g: 0.95,
            sun_position: Vector3::new(0.3, -0.038, -0.95),
            up: Vector3::UP,
            exposure: 1.0,
        }
    }
}

/// Terms shared by every pixel of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyTerms {
    /// Normalized direction towards the sun.
    pub sun_direction: Vector3,
    /// Sun intensity for the current zenith angle.
    pub sun_e: f32,
    /// 1 with the sun overhead, falling towards 0 below the horizon.
    pub sun_fade: f32,
    /// Rayleigh scattering coefficients.
    pub beta_r: [f32; 3],
    /// Mie scattering coefficients.
    pub beta_m: [f32; 3],
}

impl SkySettings {
    /// Every parameter is finite.
    pub fn is_finite(&self) -> bool {
        [
            self.turbidity,
            self.rayleigh,
            self.mie_coefficient,
            self.mie_directional_g,
            self.exposure,
        ]
        .iter()
        .all(|v| v.is_finite())
            && self.sun_position.is_finite()
            && self.up.is_finite()
    }

    /// Compute the per-frame scattering terms.
    pub fn terms(&self) -> SkyTerms {
        let sun_direction = if self.sun_position.length_squared() > 0.0 {
            self.sun_position.normalized()
        } else {
            Vector3::UP
        };
        let up = if self.up.length_squared() > 0.0 {
            self.up.normalized()
        } else {
            Vector3::UP
        };

        let sun_e = sun_intensity(sun_direction.dot(&up));
        let sun_fade = 1.0 - (1.0 - (self.sun_position.y / 450_000.0).exp()).clamp(0.0, 1.0);
        let rayleigh_coefficient = self.rayleigh - (1.0 - sun_fade);
        let mie = total_mie(self.turbidity);

        SkyTerms {
            sun_direction,
            sun_e,
            sun_fade,
            beta_r: TOTAL_RAYLEIGH.map(|b| b * rayleigh_coefficient),
            beta_m: mie.map(|m| m * self.mie_coefficient),
        }
    }
}

fn sun_intensity(zenith_angle_cos: f32) -> f32 {
    let angle = zenith_angle_cos.clamp(-1.0, 1.0).acos();
    EE * (1.0 - (-((CUTOFF_ANGLE - angle) / STEEPNESS)).exp()).max(0.0)
}

fn total_mie(turbidity: f32) -> [f32; 3] {
    let c = 0.2 * turbidity * 10e-18;
    MIE_CONST.map(|k| 0.434 * c * k)
}

/// Sky uniform data, mirrored by `SkyUniforms` in the shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SkyUniform {
    /// Inverse of projection times rotation-only view; maps NDC to view rays.
    pub inv_view_proj: [[f32; 4]; 4],
    /// xyz: sun direction, w: sun intensity.
    pub sun_direction: [f32; 4],
    /// xyz: Rayleigh coefficients, w: sun fade.
    pub beta_r: [f32; 4],
    /// xyz: Mie coefficients, w: Mie directional g.
    pub beta_m: [f32; 4],
    /// xyz: world up, w: exposure.
    pub up: [f32; 4],
}

impl SkyUniform {
    /// Pack settings and the camera's ray transform.
    pub fn new(settings: &SkySettings, inv_view_proj: glam::Mat4) -> Self {
        let terms = settings.terms();
        let [dx, dy, dz] = terms.sun_direction.to_array();
        let [rx, ry, rz] = terms.beta_r;
        let [mx, my, mz] = terms.beta_m;
        let [ux, uy, uz] = settings.up.normalized().to_array();
        Self {
            inv_view_proj: inv_view_proj.to_cols_array_2d(),
            sun_direction: [dx, dy, dz, terms.sun_e],
            beta_r: [rx, ry, rz, terms.sun_fade],
            beta_m: [mx, my, mz, settings.mie_directional_g],
            up: [ux, uy, uz, settings.exposure],
        }
    }
}

/// Full-screen sky pass.
pub struct Sky {
    /// Current parameters; edits show up on the next `update`.
    pub settings: SkySettings,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl Sky {
    /// Create the sky pass.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        settings: SkySettings,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sky Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/sky.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Sky Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sky Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sky Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let uniform = SkyUniform::new(&settings, glam::Mat4::IDENTITY);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sky Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sky Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            settings,
            pipeline,
            uniform_buffer,
            bind_group,
        }
    }

    /// Upload the current settings with the camera's ray transform.
    pub fn update(&self, queue: &wgpu::Queue, inv_view_proj: glam::Mat4) {
        let uniform = SkyUniform::new(&self.settings, inv_view_proj);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Draw the full-screen triangle.
    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<SkyUniform>(), 128);
    }

    #[test]
    fn test_default_terms() {
        let terms = SkySettings::default().terms();
        assert!((terms.sun_direction.length() - 1.0).abs() < 1e-5);
        // Sun just below the horizon still lights the sky.
        assert!(terms.sun_e > 0.0 && terms.sun_e < EE);
        assert!(terms.sun_fade > 0.99 && terms.sun_fade <= 1.0);
        assert!(terms.beta_r.iter().all(|b| *b > 0.0));
        assert!(terms.beta_r[2] > terms.beta_r[0]);
        assert!(terms.beta_m.iter().all(|b| *b > 0.0));
    }

    #[test]
    fn test_sun_intensity_bounds() {
        assert!((sun_intensity(1.0) - EE * (1.0 - (-CUTOFF_ANGLE / STEEPNESS).exp())).abs() < 1e-2);
        assert_eq!(sun_intensity(-1.0), 0.0);
        assert!(sun_intensity(1.0) > sun_intensity(0.0));
    }

    #[test]
    fn test_mie_scales_with_turbidity() {
        let low = SkySettings {
            turbidity: 2.0,
            ..SkySettings::default()
        };
        let high = SkySettings::default();
        assert!(high.terms().beta_m[0] > low.terms().beta_m[0]);
    }

    #[test]
    fn test_degenerate_sun_position() {
        let settings = SkySettings {
            sun_position: Vector3::ZERO,
            ..SkySettings::default()
        };
        assert_eq!(settings.terms().sun_direction, Vector3::UP);
    }

    #[test]
    fn test_uniform_packing() {
        let settings = SkySettings::default();
        let u = SkyUniform::new(&settings, glam::Mat4::IDENTITY);
        assert_eq!(u.beta_m[3], 0.95);
        assert_eq!(u.up, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(u.inv_view_proj, glam::Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn test_settings_from_json() {
        let settings: SkySettings =
            serde_json::from_str(r#"{"turbidity": 4.0, "sun_position": {"x": 0.0, "y": 1.0, "z": 0.0}}"#)
                .unwrap();
        assert_eq!(settings.turbidity, 4.0);
        assert_eq!(settings.rayleigh, 3.0);
        assert!(settings.is_finite());
    }
}
