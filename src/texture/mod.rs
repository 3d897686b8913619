//! Sprite textures: decoding, upload and the shared pool.

mod pool;
mod sampler;
mod texture2d;

pub use pool::{SpriteId, SpritePattern, TexturePool};
pub use sampler::Sampler;
pub use texture2d::{decode_image, DecodedImage, Texture2D, TextureError};
