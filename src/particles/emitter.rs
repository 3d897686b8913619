//! Randomized burst configuration.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Half-open `f32` range `[min, max)` sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeF32 {
    /// Inclusive lower bound.
    pub min: f32,
    /// Exclusive upper bound.
    pub max: f32,
}

impl RangeF32 {
    /// Create a range.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Both bounds finite and `min <= max`.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Draw a value. Degenerate ranges yield `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }
}

/// Half-open `u32` range `[min, max)` sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeU32 {
    /// Inclusive lower bound.
    pub min: u32,
    /// Exclusive upper bound.
    pub max: u32,
}

impl RangeU32 {
    /// Create a range.
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// `min <= max`.
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    /// Draw a value. Degenerate ranges yield `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }
}

/// Ranges the random trigger draws burst parameters from.
/// Colors are always uniform over the RGB cube and sprites uniform over the pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstRanges {
    /// Particles per burst.
    pub count: RangeU32,
    /// Origin X.
    pub x: RangeF32,
    /// Origin Y.
    pub y: RangeF32,
    /// Origin Z.
    pub z: RangeF32,
    /// Base particle size.
    pub size: RangeF32,
    /// Spread radius.
    pub radius: RangeF32,
}

impl Default for BurstRanges {
    fn default() -> Self {
        Self {
            count: RangeU32::new(400, 1400),
            x: RangeF32::new(-1.0, 1.0),
            y: RangeF32::new(0.0, 1.0),
            z: RangeF32::new(-1.0, 1.0),
            size: RangeF32::new(0.1, 0.2),
            radius: RangeF32::new(0.5, 1.5),
        }
    }
}

impl BurstRanges {
    /// Named float ranges, for validation and error reporting.
    pub fn float_ranges(&self) -> [(&'static str, RangeF32); 5] {
        [
            ("bursts.x", self.x),
            ("bursts.y", self.y),
            ("bursts.z", self.z),
            ("bursts.size", self.size),
            ("bursts.radius", self.radius),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sample_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let range = RangeF32::new(-1.0, 1.0);
        let counts = RangeU32::new(400, 1400);
        for _ in 0..1000 {
            let v = range.sample(&mut rng);
            assert!((-1.0..1.0).contains(&v));
            let c = counts.sample(&mut rng);
            assert!((400..1400).contains(&c));
        }
    }

    #[test]
    fn test_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(RangeF32::new(0.3, 0.3).sample(&mut rng), 0.3);
        assert_eq!(RangeF32::new(1.0, 0.0).sample(&mut rng), 1.0);
        assert_eq!(RangeU32::new(5, 5).sample(&mut rng), 5);
    }

    #[test]
    fn test_validity() {
        assert!(RangeF32::new(0.0, 1.0).is_valid());
        assert!(!RangeF32::new(1.0, 0.0).is_valid());
        assert!(!RangeF32::new(f32::NAN, 1.0).is_valid());
        assert!(!RangeU32::new(3, 2).is_valid());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let ranges: BurstRanges =
            serde_json::from_str(r#"{"count": {"min": 10, "max": 20}}"#).unwrap();
        assert_eq!(ranges.count, RangeU32::new(10, 20));
        assert_eq!(ranges.radius, RangeF32::new(0.5, 1.5));
    }
}
