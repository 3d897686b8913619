//! Read-only sprite textures shared by every burst.

use serde::{Deserialize, Serialize};

use super::{decode_image, DecodedImage, Sampler, Texture2D, TextureError};

/// Index of a sprite in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct SpriteId(pub usize);

impl SpriteId {
    /// Raw index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Numbered sprite files, e.g. `particles/1.png` through `particles/10.png`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpritePattern {
    /// Path template; `{}` is replaced by the file number.
    pub pattern: String,
    /// Number of the first file.
    pub first: usize,
    /// Number of files.
    pub count: usize,
}

impl Default for SpritePattern {
    fn default() -> Self {
        Self {
            pattern: "particles/{}.png".to_owned(),
            first: 1,
            count: 10,
        }
    }
}

impl SpritePattern {
    /// Expanded file paths in sprite order.
    pub fn paths(&self) -> Vec<String> {
        (self.first..self.first + self.count)
            .map(|n| self.pattern.replace("{}", &n.to_string()))
            .collect()
    }

    /// Read and decode every file in the pattern.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn decode_files(&self) -> Result<Vec<DecodedImage>, TextureError> {
        self.paths()
            .into_iter()
            .map(|path| {
                let bytes = std::fs::read(&path).map_err(|source| TextureError::Io {
                    path: path.clone(),
                    source,
                })?;
                decode_image(&bytes)
            })
            .collect()
    }
}

/// GPU sprite textures plus the sampler they are read with.
pub struct TexturePool {
    textures: Vec<Texture2D>,
    sampler: Sampler,
}

impl TexturePool {
    /// Upload already decoded sprites.
    pub fn from_images(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        images: &[DecodedImage],
    ) -> Result<Self, TextureError> {
        if images.is_empty() {
            return Err(TextureError::EmptyPool);
        }

        let textures = images
            .iter()
            .enumerate()
            .map(|(i, image)| {
                let label = format!("Sprite {}", i);
                Texture2D::from_image(device, queue, image, Some(&label))
            })
            .collect();

        log::info!("Loaded {} sprite textures", images.len());

        Ok(Self {
            textures,
            sampler: Sampler::clamped_linear(device),
        })
    }

    /// Read, decode and upload every file in `pattern`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_files(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pattern: &SpritePattern,
    ) -> Result<Self, TextureError> {
        let images = pattern.decode_files()?;
        Self::from_images(device, queue, &images)
    }

    /// Get a sprite. Out-of-range IDs wrap around the pool.
    pub fn get(&self, id: SpriteId) -> &Texture2D {
        &self.textures[id.index() % self.textures.len()]
    }

    /// Number of sprites.
    #[inline]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Always false; empty pools are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Shared sampler.
    #[inline]
    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::texture2d::tests::png_bytes;

    #[test]
    fn test_default_pattern_paths() {
        let paths = SpritePattern::default().paths();
        assert_eq!(paths.len(), 10);
        assert_eq!(paths[0], "particles/1.png");
        assert_eq!(paths[9], "particles/10.png");
    }

    #[test]
    fn test_decode_files() {
        let dir = tempfile::tempdir().unwrap();
        for n in 0..3 {
            std::fs::write(dir.path().join(format!("spark_{}.png", n)), png_bytes(2, 2)).unwrap();
        }
        let pattern = SpritePattern {
            pattern: dir.path().join("spark_{}.png").to_string_lossy().into_owned(),
            first: 0,
            count: 3,
        };

        let images = pattern.decode_files().unwrap();
        assert_eq!(images.len(), 3);
        assert!(images.iter().all(|img| img.width == 2 && img.height == 2));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = SpritePattern {
            pattern: dir.path().join("{}.png").to_string_lossy().into_owned(),
            first: 1,
            count: 1,
        };

        match pattern.decode_files() {
            Err(TextureError::Io { path, .. }) => assert!(path.ends_with("1.png")),
            other => panic!("expected Io error, got {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_pattern_from_json() {
        let pattern: SpritePattern = serde_json::from_str(r#"{"count": 4}"#).unwrap();
        assert_eq!(pattern.count, 4);
        assert_eq!(pattern.first, 1);
        assert_eq!(pattern.pattern, "particles/{}.png");
    }
}
