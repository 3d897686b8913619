//! # Scene Module
//!
//! The scene owns every renderable object. Bursts refer to their point
//! cloud only by [`Id`](crate::core::Id) and attach or detach through it.

mod scene;

pub use scene::{Scene, SceneInfo};
