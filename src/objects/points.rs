//! Point cloud object: one burst's geometry, material and GPU resources.

use wgpu::util::DeviceExt;

use crate::core::Id;
use crate::geometry::{BufferGeometry, ATTR_POSITION, ATTR_SIZE, ATTR_TIME_MULTIPLIER};
use crate::material::{FireworkMaterial, FireworkPipeline};
use crate::math::Vector3;
use crate::texture::TexturePool;

/// GPU resources owned by a single point cloud.
pub struct PointsGpu {
    /// Per-instance offsets (`vec3`).
    pub position_buffer: wgpu::Buffer,
    /// Per-instance size multipliers.
    pub size_buffer: wgpu::Buffer,
    /// Per-instance time multipliers.
    pub time_buffer: wgpu::Buffer,
    /// `FireworkUniform` block.
    pub uniform_buffer: wgpu::Buffer,
    /// Group 1: uniforms, sprite and sampler.
    pub bind_group: wgpu::BindGroup,
    /// Number of instances to draw.
    pub instance_count: u32,
}

impl PointsGpu {
    fn destroy(self) {
        self.position_buffer.destroy();
        self.size_buffer.destroy();
        self.time_buffer.destroy();
        self.uniform_buffer.destroy();
    }
}

/// A renderable point cloud.
pub struct Points {
    /// Unique identifier.
    id: Id,
    /// Object name.
    name: String,
    /// World-space translation applied to every point.
    position: Vector3,
    /// Visibility flag.
    pub visible: bool,
    geometry: BufferGeometry,
    material: FireworkMaterial,
    gpu: Option<PointsGpu>,
}

impl Points {
    /// Create a point cloud at the origin.
    pub fn new(geometry: BufferGeometry, material: FireworkMaterial) -> Self {
        Self {
            id: Id::new(),
            name: String::new(),
            position: Vector3::ZERO,
            visible: true,
            geometry,
            material,
            gpu: None,
        }
    }

    /// Get the unique ID.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the object name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the object name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// World-space translation.
    #[inline]
    pub fn position(&self) -> Vector3 {
        self.position
    }

    /// Set position.
    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
        // Origin lives in the uniform block.
        self.material.mark_needs_update();
    }

    /// Get the geometry.
    #[inline]
    pub fn geometry(&self) -> &BufferGeometry {
        &self.geometry
    }

    /// Get the material.
    #[inline]
    pub fn material(&self) -> &FireworkMaterial {
        &self.material
    }

    /// Get the material mutably.
    #[inline]
    pub fn material_mut(&mut self) -> &mut FireworkMaterial {
        &mut self.material
    }

    /// Number of points.
    #[inline]
    pub fn count(&self) -> usize {
        self.geometry.count()
    }

    /// GPU resources, once uploaded.
    #[inline]
    pub fn gpu(&self) -> Option<&PointsGpu> {
        self.gpu.as_ref()
    }

    /// Check whether GPU resources exist.
    #[inline]
    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }

    /// Whether the renderer has anything to upload for this cloud.
    pub fn needs_upload(&self) -> bool {
        self.gpu.is_none() && self.count() > 0
    }

    /// Create vertex buffers, the uniform buffer and the bind group.
    ///
    /// Does nothing for empty clouds or clouds already uploaded.
    pub fn upload(&mut self, device: &wgpu::Device, pipeline: &FireworkPipeline, pool: &TexturePool) {
        if !self.needs_upload() {
            return;
        }

        let (Some(positions), Some(sizes), Some(times)) = (
            self.geometry.attribute(ATTR_POSITION),
            self.geometry.attribute(ATTR_SIZE),
            self.geometry.attribute(ATTR_TIME_MULTIPLIER),
        ) else {
            log::warn!("Points {} is missing particle attributes; skipping upload", self.id);
            return;
        };

        let instance_count = positions.count().min(sizes.count()).min(times.count()) as u32;

        let vertex_buffer = |label: &str, bytes: &[u8]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytes,
                usage: wgpu::BufferUsages::VERTEX,
            })
        };
        let position_buffer = vertex_buffer("Points Position Buffer", positions.as_bytes());
        let size_buffer = vertex_buffer("Points Size Buffer", sizes.as_bytes());
        let time_buffer = vertex_buffer("Points Time Buffer", times.as_bytes());

        let uniform = self.material.uniform(self.position);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Firework Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let sprite = pool.get(self.material.sprite());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Firework Bind Group"),
            layout: pipeline.material_layout(),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(sprite.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(pool.sampler().wgpu_sampler()),
                },
            ],
        });

        self.gpu = Some(PointsGpu {
            position_buffer,
            size_buffer,
            time_buffer,
            uniform_buffer,
            bind_group,
            instance_count,
        });
        self.material.clear_needs_update();
    }

    /// Write the uniform block if it changed since the last upload.
    pub fn sync(&mut self, queue: &wgpu::Queue) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        if self.material.needs_update() {
            let uniform = self.material.uniform(self.position);
            queue.write_buffer(&gpu.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
            self.material.clear_needs_update();
        }
    }

    /// Record the draw. The caller binds the pipeline and group 0.
    /// Returns the number of points drawn.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) -> u32 {
        let Some(gpu) = self.gpu.as_ref().filter(|_| self.visible) else {
            return 0;
        };
        pass.set_bind_group(1, &gpu.bind_group, &[]);
        pass.set_vertex_buffer(0, gpu.position_buffer.slice(..));
        pass.set_vertex_buffer(1, gpu.size_buffer.slice(..));
        pass.set_vertex_buffer(2, gpu.time_buffer.slice(..));
        pass.draw(0..4, 0..gpu.instance_count);
        gpu.instance_count
    }

    /// Release GPU buffers and CPU attribute storage.
    pub fn dispose(mut self) {
        if let Some(gpu) = self.gpu.take() {
            gpu.destroy();
        }
        self.geometry.dispose();
        log::debug!("Disposed points {}", self.id);
    }
}

impl std::fmt::Debug for Points {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Points")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("position", &self.position)
            .field("count", &self.count())
            .field("progress", &self.material.progress())
            .field("uploaded", &self.is_uploaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BufferAttribute;
    use crate::math::Color;
    use crate::texture::SpriteId;

    fn cloud(count: usize) -> Points {
        let mut geometry = BufferGeometry::new();
        geometry.set_attribute(ATTR_POSITION, BufferAttribute::new(vec![0.5; count * 3], 3));
        geometry.set_attribute(ATTR_SIZE, BufferAttribute::new(vec![0.5; count], 1));
        geometry.set_attribute(ATTR_TIME_MULTIPLIER, BufferAttribute::new(vec![1.5; count], 1));
        let material = FireworkMaterial::new(0.1, SpriteId(0), Color::WHITE, [100.0, 100.0]);
        Points::new(geometry, material)
    }

    #[test]
    fn test_new_points_are_cpu_only() {
        let points = cloud(12);
        assert_eq!(points.count(), 12);
        assert!(points.visible);
        assert!(!points.is_uploaded());
        assert!(points.needs_upload());
    }

    #[test]
    fn test_empty_cloud_never_uploads() {
        let points = cloud(0);
        assert_eq!(points.count(), 0);
        assert!(!points.needs_upload());
    }

    #[test]
    fn test_set_position() {
        let mut points = cloud(1);
        points.material_mut().clear_needs_update();
        points.set_position(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(points.position(), Vector3::new(1.0, 2.0, 3.0));
        assert!(points.material().needs_update());
        assert_eq!(points.material().uniform(points.position()).origin, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_dispose_headless() {
        let points = cloud(4);
        points.dispose();
    }
}
