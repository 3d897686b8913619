//! Spherical coordinates.

use serde::{Deserialize, Serialize};

/// A point in spherical coordinates.
///
/// `phi` is the polar angle from the +Y axis, `theta` the azimuth around it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Spherical {
    /// Distance from the origin.
    pub radius: f32,
    /// Polar angle in radians, `[0, PI]`.
    pub phi: f32,
    /// Azimuthal angle in radians, `[0, 2 PI)`.
    pub theta: f32,
}

impl Spherical {
    /// Create new spherical coordinates.
    #[inline]
    pub const fn new(radius: f32, phi: f32, theta: f32) -> Self {
        Self { radius, phi, theta }
    }

    /// Restrict `phi` to `(eps, PI - eps)` so the point never sits on a pole.
    pub fn make_safe(&mut self) -> &mut Self {
        const EPS: f32 = 0.000_001;
        self.phi = self.phi.clamp(EPS, std::f32::consts::PI - EPS);
        self
    }

    /// Build from a cartesian offset.
    pub fn from_cartesian(x: f32, y: f32, z: f32) -> Self {
        let radius = (x * x + y * y + z * z).sqrt();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            phi: (y / radius).clamp(-1.0, 1.0).acos(),
            theta: x.atan2(z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3;

    #[test]
    fn test_cartesian_roundtrip() {
        let s = Spherical::new(3.0, 1.1, 0.4);
        let v = Vector3::from_spherical(&s);
        let back = Spherical::from_cartesian(v.x, v.y, v.z);
        assert!((back.radius - 3.0).abs() < 1e-5);
        assert!((back.phi - 1.1).abs() < 1e-5);
        assert!((back.theta - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_make_safe_keeps_off_pole() {
        let mut s = Spherical::new(1.0, 0.0, 0.0);
        s.make_safe();
        assert!(s.phi > 0.0);
    }
}
