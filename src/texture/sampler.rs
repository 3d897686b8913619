//! Texture sampler shared by every sprite.

/// A GPU texture sampler.
pub struct Sampler {
    /// The wgpu sampler.
    sampler: wgpu::Sampler,
}

impl Sampler {
    /// Create a sampler from a raw wgpu descriptor.
    pub fn new(device: &wgpu::Device, desc: &wgpu::SamplerDescriptor<'_>) -> Self {
        Self {
            sampler: device.create_sampler(desc),
        }
    }

    /// Linear filtering, clamped at the edges so sprite borders never wrap.
    pub fn clamped_linear(device: &wgpu::Device) -> Self {
        Self::new(
            device,
            &wgpu::SamplerDescriptor {
                label: Some("Sprite Sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::FilterMode::Nearest,
                ..Default::default()
            },
        )
    }

    /// Get the underlying wgpu sampler.
    #[inline]
    pub fn wgpu_sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}
