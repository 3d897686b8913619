//! # Math Module
//!
//! Small vector, color and coordinate types used by the scene.
//! Matrices come straight from `glam`; these types convert into it.

mod color;
mod spherical;
mod vector3;

pub use color::Color;
pub use spherical::Spherical;
pub use vector3::Vector3;

/// Common math constants and utilities.
pub mod consts {
    /// Pi constant.
    pub const PI: f32 = std::f32::consts::PI;
    /// Two times Pi.
    pub const TWO_PI: f32 = PI * 2.0;
    /// Small epsilon for floating point comparisons.
    pub const EPSILON: f32 = 1e-6;
}

/// Linear interpolation between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 1.0, 0.5), 0.5);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
    }
}
