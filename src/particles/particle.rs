//! Burst parameters, particle generation and the burst handle.

use rand::Rng;

use crate::core::Id;
use crate::geometry::{
    BufferAttribute, BufferGeometry, ATTR_POSITION, ATTR_SIZE, ATTR_TIME_MULTIPLIER,
};
use crate::math::{consts, Color, Spherical, Vector3};
use crate::scene::Scene;
use crate::texture::SpriteId;

/// Inputs for one burst.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireworkParams {
    /// Number of particles. Zero gives an empty burst.
    pub count: u32,
    /// World-space center.
    pub origin: Vector3,
    /// Base particle size.
    pub size: f32,
    /// Sprite texture.
    pub sprite: SpriteId,
    /// Spread radius.
    pub radius: f32,
    /// Tint.
    pub color: Color,
}

impl FireworkParams {
    /// Replace values the generator cannot use: non-finite origin components
    /// become 0, non-finite or negative size and radius become 0.
    pub fn sanitized(mut self) -> Self {
        if !self.origin.is_finite() {
            log::warn!("Firework origin {:?} is not finite; using zero components", self.origin);
            self.origin = self.origin.finite_or_zero();
        }
        if !(self.size.is_finite() && self.size >= 0.0) {
            log::warn!("Firework size {} is invalid; using 0", self.size);
            self.size = 0.0;
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            log::warn!("Firework radius {} is invalid; using 0", self.radius);
            self.radius = 0.0;
        }
        self.color = self.color.clamp();
        self
    }
}

/// Per-particle arrays of one burst.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleAttributes {
    /// Offsets from the origin, three floats per particle.
    pub positions: Vec<f32>,
    /// Size multipliers in `[0, 1)`.
    pub sizes: Vec<f32>,
    /// Time multipliers in `[1, 2)`.
    pub time_multipliers: Vec<f32>,
}

impl ParticleAttributes {
    /// Sample `count` particles on a shell of thickness `0.25 * radius`
    /// just inside `radius`.
    pub fn generate<R: Rng + ?Sized>(count: usize, radius: f32, rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(count * 3);
        let mut sizes = Vec::with_capacity(count);
        let mut time_multipliers = Vec::with_capacity(count);

        for _ in 0..count {
            let spherical = Spherical::new(
                radius * (0.75 + rng.gen::<f32>() * 0.25),
                rng.gen::<f32>() * consts::PI,
                rng.gen::<f32>() * consts::TWO_PI,
            );
            positions.extend_from_slice(&Vector3::from_spherical(&spherical).to_array());
            sizes.push(rng.gen::<f32>());
            time_multipliers.push(1.0 + rng.gen::<f32>());
        }

        Self {
            positions,
            sizes,
            time_multipliers,
        }
    }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Check whether there are no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Offset of particle `index`.
    pub fn position(&self, index: usize) -> Option<Vector3> {
        let p = self.positions.get(index * 3..index * 3 + 3)?;
        Some(Vector3::new(p[0], p[1], p[2]))
    }

    /// Move the arrays into a geometry.
    pub fn into_geometry(self) -> BufferGeometry {
        let mut geometry = BufferGeometry::new();
        geometry.set_attribute(ATTR_POSITION, BufferAttribute::new(self.positions, 3));
        geometry.set_attribute(ATTR_SIZE, BufferAttribute::new(self.sizes, 1));
        geometry.set_attribute(
            ATTR_TIME_MULTIPLIER,
            BufferAttribute::new(self.time_multipliers, 1),
        );
        geometry
    }
}

/// Disposal capability for one burst.
///
/// Consumed by [`Firework::dispose`], so each burst is released at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct Firework {
    points: Id,
}

impl Firework {
    pub(crate) fn new(points: Id) -> Self {
        Self { points }
    }

    /// ID of the burst's point cloud.
    #[inline]
    pub fn points_id(&self) -> Id {
        self.points
    }

    /// Detach the point cloud from the scene and free its resources.
    /// Returns false if the scene no longer held it.
    pub fn dispose(self, scene: &mut Scene) -> bool {
        let disposed = scene.dispose(self.points);
        if disposed {
            log::debug!("Firework {} finished", self.points);
        } else {
            log::warn!("Firework {} was already gone from the scene", self.points);
        }
        disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_shell_and_multipliers() {
        let mut rng = StdRng::seed_from_u64(42);
        let radius = 1.2;
        let attrs = ParticleAttributes::generate(2000, radius, &mut rng);

        assert_eq!(attrs.len(), 2000);
        assert_eq!(attrs.positions.len(), 6000);
        assert_eq!(attrs.time_multipliers.len(), 2000);

        for i in 0..attrs.len() {
            let d = attrs.position(i).unwrap().length();
            assert!(d >= 0.75 * radius - 1e-4 && d <= radius + 1e-4, "distance {d}");
        }
        assert!(attrs.sizes.iter().all(|s| (0.0..1.0).contains(s)));
        assert!(attrs.time_multipliers.iter().all(|t| (1.0..2.0).contains(t)));
    }

    #[test]
    fn test_generate_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let attrs = ParticleAttributes::generate(0, 1.0, &mut rng);
        assert!(attrs.is_empty());
        assert_eq!(attrs.position(0), None);
        assert_eq!(attrs.into_geometry().count(), 0);
    }

    #[test]
    fn test_into_geometry() {
        let mut rng = StdRng::seed_from_u64(3);
        let geometry = ParticleAttributes::generate(5, 1.0, &mut rng).into_geometry();
        assert_eq!(geometry.count(), 5);
        assert_eq!(geometry.attribute(ATTR_SIZE).unwrap().count(), 5);
        assert_eq!(geometry.attribute(ATTR_TIME_MULTIPLIER).unwrap().count(), 5);
    }

    #[test]
    fn test_sanitized() {
        let params = FireworkParams {
            count: 3,
            origin: Vector3::new(f32::NAN, 1.0, f32::INFINITY),
            size: -0.5,
            sprite: SpriteId(0),
            radius: f32::NAN,
            color: Color::RED,
        }
        .sanitized();

        assert_eq!(params.origin, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(params.size, 0.0);
        assert_eq!(params.radius, 0.0);
        assert_eq!(params.color, Color::RED);
    }

    #[test]
    fn test_sanitized_keeps_valid_params() {
        let params = FireworkParams {
            count: 10,
            origin: Vector3::new(0.5, 0.2, -0.3),
            size: 0.15,
            sprite: SpriteId(4),
            radius: 1.0,
            color: Color::BLUE,
        };
        assert_eq!(params.sanitized(), params);
    }
}
