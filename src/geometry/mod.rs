//! Geometry storage.

mod buffer_geometry;

pub use buffer_geometry::{
    BufferAttribute, BufferGeometry, ATTR_POSITION, ATTR_SIZE, ATTR_TIME_MULTIPLIER,
};
