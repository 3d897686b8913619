//! Progress-driven burst material and the pipeline that draws it.

use bytemuck::{Pod, Zeroable};

use crate::core::Id;
use crate::math::{Color, Vector3};
use crate::texture::SpriteId;

/// Per-burst uniform block, mirrored by `FireworkUniforms` in the shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FireworkUniform {
    /// World-space burst origin.
    pub origin: [f32; 3],
    /// Base particle size.
    pub size: f32,
    /// Linear RGB tint.
    pub color: [f32; 3],
    /// Animation progress in `[0, 1]`.
    pub progress: f32,
    /// Output size in device pixels.
    pub resolution: [f32; 2],
    /// 1.0 flips sprite V, 0.0 keeps it.
    pub flip_y: f32,
    /// Padding to 16-byte alignment.
    pub _padding: f32,
}

/// Camera matrices shared by every burst.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    /// World to view.
    pub view: [[f32; 4]; 4],
    /// View to clip.
    pub projection: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view: glam::Mat4::IDENTITY.to_cols_array_2d(),
            projection: glam::Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

/// Color blending applied when drawing a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blending {
    /// `src * alpha + dst`.
    #[default]
    Additive,
    /// Standard alpha blending.
    Normal,
}

impl Blending {
    /// Equivalent wgpu blend state.
    pub fn state(self) -> wgpu::BlendState {
        match self {
            Blending::Additive => {
                let add = wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                };
                wgpu::BlendState {
                    color: add,
                    alpha: add,
                }
            }
            Blending::Normal => wgpu::BlendState::ALPHA_BLENDING,
        }
    }
}

/// Shader parameters of one burst.
#[derive(Debug, Clone)]
pub struct FireworkMaterial {
    id: Id,
    size: f32,
    color: Color,
    progress: f32,
    resolution: [f32; 2],
    sprite: SpriteId,
    flip_y: bool,
    /// Blend mode.
    pub blending: Blending,
    /// Whether drawing writes depth.
    pub depth_write: bool,
    /// Whether the material is alpha blended.
    pub transparent: bool,
    needs_update: bool,
}

impl FireworkMaterial {
    /// Create an additive, depth-write-free material at progress 0.
    pub fn new(size: f32, sprite: SpriteId, color: Color, resolution: [f32; 2]) -> Self {
        Self {
            id: Id::new(),
            size,
            color,
            progress: 0.0,
            resolution,
            sprite,
            flip_y: false,
            blending: Blending::Additive,
            depth_write: false,
            transparent: true,
            needs_update: true,
        }
    }

    /// Get the unique ID.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Base particle size.
    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Tint color.
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Sprite sampled by the fragment stage.
    #[inline]
    pub fn sprite(&self) -> SpriteId {
        self.sprite
    }

    /// Whether sprite V is flipped.
    #[inline]
    pub fn flip_y(&self) -> bool {
        self.flip_y
    }

    /// Current progress.
    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Set progress, clamped to `[0, 1]`.
    pub fn set_progress(&mut self, progress: f32) {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        if progress != self.progress {
            self.progress = progress;
            self.needs_update = true;
        }
    }

    /// Output resolution in device pixels.
    #[inline]
    pub fn resolution(&self) -> [f32; 2] {
        self.resolution
    }

    /// Set the output resolution in device pixels.
    pub fn set_resolution(&mut self, width: f32, height: f32) {
        if self.resolution != [width, height] {
            self.resolution = [width, height];
            self.needs_update = true;
        }
    }

    /// Pack the uniform block for a burst at `origin`.
    pub fn uniform(&self, origin: Vector3) -> FireworkUniform {
        FireworkUniform {
            origin: origin.to_array(),
            size: self.size,
            color: self.color.to_array(),
            progress: self.progress,
            resolution: self.resolution,
            flip_y: if self.flip_y { 1.0 } else { 0.0 },
            _padding: 0.0,
        }
    }

    /// Check whether the uniform block changed since the last upload.
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Mark the uniform block as needing an upload.
    pub fn mark_needs_update(&mut self) {
        self.needs_update = true;
    }

    /// Mark the uniform block as uploaded.
    pub fn clear_needs_update(&mut self) {
        self.needs_update = false;
    }
}

/// Render pipeline and bind group layouts shared by every burst.
pub struct FireworkPipeline {
    pipeline: wgpu::RenderPipeline,
    camera_layout: wgpu::BindGroupLayout,
    material_layout: wgpu::BindGroupLayout,
}

impl FireworkPipeline {
    /// Shader source.
    const SHADER_SOURCE: &'static str = include_str!("../shaders/firework.wgsl");

    /// Build the pipeline.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Firework Shader"),
            source: wgpu::ShaderSource::Wgsl(Self::SHADER_SOURCE.into()),
        });

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Firework Camera Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Firework Material Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Firework Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &material_layout],
            push_constant_ranges: &[],
        });

        // One instance per particle; the quad corner comes from the vertex index.
        let instance_buffers = [
            wgpu::VertexBufferLayout {
                array_stride: 12,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: 4,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: 4,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32,
                }],
            },
        ];

        let material = FireworkMaterial::new(0.0, SpriteId(0), Color::WHITE, [1.0, 1.0]);

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Firework Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &instance_buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(material.blending.state()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: material.depth_write,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            camera_layout,
            material_layout,
        }
    }

    /// Get the render pipeline.
    #[inline]
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    /// Layout of bind group 0 (camera).
    #[inline]
    pub fn camera_layout(&self) -> &wgpu::BindGroupLayout {
        &self.camera_layout
    }

    /// Layout of bind group 1 (uniforms, sprite, sampler).
    #[inline]
    pub fn material_layout(&self) -> &wgpu::BindGroupLayout {
        &self.material_layout
    }
}
