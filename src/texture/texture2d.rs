//! 2D texture implementation.

use crate::core::Id;
use thiserror::Error;
use wgpu::util::DeviceExt;

/// Errors raised while loading or decoding textures.
#[derive(Debug, Error)]
pub enum TextureError {
    /// A texture file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Encoded bytes were not a supported image.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    /// A pool was built from zero textures.
    #[error("texture pool is empty")]
    EmptyPool,
}

/// CPU-side RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 rows.
    pub rgba: Vec<u8>,
}

/// Decode PNG or JPEG bytes into RGBA8 pixels.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, TextureError> {
    let img = image::load_from_memory(bytes)?;
    let rgba = img.to_rgba8();
    Ok(DecodedImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

/// A 2D texture.
pub struct Texture2D {
    /// Unique ID.
    id: Id,
    /// Texture width.
    width: u32,
    /// Texture height.
    height: u32,
    /// The GPU texture.
    texture: wgpu::Texture,
    /// Texture view.
    view: wgpu::TextureView,
    /// Texture format.
    format: wgpu::TextureFormat,
}

impl Texture2D {
    /// Create a new texture from RGBA8 data in the given format.
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[u8],
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        label: Option<&str>,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label,
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            id: Id::new(),
            width,
            height,
            texture,
            view,
            format,
        }
    }

    /// Upload decoded pixels. Sprites are masks, so the data stays linear.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &DecodedImage,
        label: Option<&str>,
    ) -> Self {
        Self::from_rgba8(
            device,
            queue,
            &image.rgba,
            image.width,
            image.height,
            wgpu::TextureFormat::Rgba8Unorm,
            label,
        )
    }

    /// Create a texture from encoded image bytes (PNG, JPEG).
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[u8],
        label: Option<&str>,
    ) -> Result<Self, TextureError> {
        let image = decode_image(data)?;
        Ok(Self::from_image(device, queue, &image, label))
    }

    /// Get the unique ID.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get texture width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get texture height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the texture format.
    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Get the underlying wgpu texture.
    #[inline]
    pub fn wgpu_texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    /// Get the texture view.
    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x * 40) as u8, (y * 40) as u8, 0, 255])
        });
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png() {
        let decoded = decode_image(&png_bytes(4, 2)).unwrap();
        assert_eq!(decoded.width, 4);
        assert_eq!(decoded.height, 2);
        assert_eq!(decoded.rgba.len(), 4 * 2 * 4);
        assert_eq!(&decoded.rgba[4..8], &[40, 0, 0, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, TextureError::Decode(_)));
    }
}
