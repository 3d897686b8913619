//! Frame renderer: sky, then every burst in the scene.

use wgpu::util::DeviceExt;

use super::{Context, RenderConfig};
use crate::camera::PerspectiveCamera;
use crate::material::{CameraUniform, FireworkPipeline};
use crate::scene::Scene;
use crate::sky::Sky;
use crate::texture::TexturePool;

/// Render statistics for the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderInfo {
    /// Number of draw calls.
    pub draw_calls: u32,
    /// Number of points rendered.
    pub points: u32,
    /// Frame number.
    pub frame: u64,
}

impl RenderInfo {
    /// Reset the per-frame counters.
    pub fn reset(&mut self) {
        self.draw_calls = 0;
        self.points = 0;
    }

    /// Start counting a new frame.
    pub fn begin_frame(&mut self) {
        self.reset();
        self.frame += 1;
    }

    /// Record one draw of `points` points.
    pub fn record_draw(&mut self, points: u32) {
        self.draw_calls += 1;
        self.points += points;
    }
}

/// Owns the burst pipeline, camera bindings and depth buffer.
pub struct Renderer {
    config: RenderConfig,
    pipeline: FireworkPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    info: RenderInfo,
}

impl Renderer {
    /// Create a new renderer.
    pub fn new(ctx: &Context, config: RenderConfig) -> Self {
        let pipeline = FireworkPipeline::new(&ctx.device, ctx.surface_format, ctx.depth_format);

        let camera_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Uniform Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: pipeline.camera_layout(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let depth_view = ctx
            .create_depth_texture()
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            config,
            pipeline,
            camera_buffer,
            camera_bind_group,
            depth_view,
            info: RenderInfo::default(),
        }
    }

    /// Get render info.
    #[inline]
    pub fn info(&self) -> &RenderInfo {
        &self.info
    }

    /// The burst pipeline.
    #[inline]
    pub fn pipeline(&self) -> &FireworkPipeline {
        &self.pipeline
    }

    /// Set the clear color.
    pub fn set_clear_color(&mut self, color: wgpu::Color) {
        self.config.clear_color = color;
    }

    /// Recreate the depth buffer at the surface size.
    pub fn resize(&mut self, ctx: &Context) {
        self.depth_view = ctx
            .create_depth_texture()
            .create_view(&wgpu::TextureViewDescriptor::default());
    }

    /// Upload new bursts and flush dirty uniforms.
    pub fn prepare(&mut self, ctx: &Context, scene: &mut Scene, pool: &TexturePool) {
        for points in scene.iter_mut() {
            points.upload(&ctx.device, &self.pipeline, pool);
            points.sync(&ctx.queue);
        }
    }

    /// Render one frame.
    pub fn render(
        &mut self,
        ctx: &Context,
        camera: &PerspectiveCamera,
        sky: &Sky,
        scene: &mut Scene,
        pool: &TexturePool,
    ) -> Result<(), wgpu::SurfaceError> {
        self.info.begin_frame();

        let output = ctx.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let camera_uniform = CameraUniform {
            view: camera.view_matrix().to_cols_array_2d(),
            projection: camera.projection_matrix().to_cols_array_2d(),
        };
        ctx.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[camera_uniform]));
        sky.update(&ctx.queue, camera.inverse_ray_matrix());
        self.prepare(ctx, scene, pool);

        let mut encoder = ctx.create_command_encoder();
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.config.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            sky.render(&mut pass);
            self.info.record_draw(0);

            pass.set_pipeline(self.pipeline.pipeline());
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            for points in scene.iter() {
                let drawn = points.draw(&mut pass);
                if drawn > 0 {
                    self.info.record_draw(drawn);
                }
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_info_counts() {
        let mut info = RenderInfo::default();
        info.begin_frame();
        info.record_draw(0);
        info.record_draw(500);
        info.record_draw(700);
        assert_eq!(info.draw_calls, 3);
        assert_eq!(info.points, 1200);
        assert_eq!(info.frame, 1);

        info.begin_frame();
        assert_eq!(info.draw_calls, 0);
        assert_eq!(info.points, 0);
        assert_eq!(info.frame, 2);
    }
}
