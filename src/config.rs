//! Application configuration, loadable from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::Easing;
use crate::math::Vector3;
use crate::particles::{BurstRanges, DEFAULT_DURATION};
use crate::sky::SkySettings;
use crate::texture::SpritePattern;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed JSON.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A range with `min > max` or non-finite bounds.
    #[error("invalid range `{name}`: [{min}, {max})")]
    InvalidRange {
        /// Field path.
        name: &'static str,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Burst lifetime must be positive and finite.
    #[error("invalid burst duration: {0}")]
    InvalidDuration(f32),

    /// The sprite pattern yields no files.
    #[error("sprite pattern yields no sprites")]
    ZeroSprites,

    /// Pixel ratio cap must be positive and finite.
    #[error("invalid max pixel ratio: {0}")]
    PixelRatio(f32),

    /// Camera projection parameters are unusable.
    #[error("invalid camera: {0}")]
    Camera(&'static str),
}

/// Camera and orbit-control settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Near plane.
    pub near: f32,
    /// Far plane.
    pub far: f32,
    /// Initial position.
    pub position: Vector3,
    /// Orbit target.
    pub target: Vector3,
    /// Orbit damping factor.
    pub damping_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 25.0,
            near: 0.1,
            far: 100.0,
            position: Vector3::new(1.5, 0.0, 6.0),
            target: Vector3::ZERO,
            damping_factor: 0.05,
        }
    }
}

impl CameraConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(ConfigError::Camera("fov must be in (0, 180)"));
        }
        if !(self.near > 0.0 && self.far > self.near && self.far.is_finite()) {
            return Err(ConfigError::Camera("clip planes must satisfy 0 < near < far"));
        }
        if !self.position.is_finite() || !self.target.is_finite() {
            return Err(ConfigError::Camera("position and target must be finite"));
        }
        if !(self.damping_factor > 0.0 && self.damping_factor <= 1.0) {
            return Err(ConfigError::Camera("damping factor must be in (0, 1]"));
        }
        Ok(())
    }
}

/// Everything tunable about the demo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworksConfig {
    /// Ranges for random bursts.
    pub bursts: BurstRanges,
    /// Burst lifetime in seconds.
    pub duration: f32,
    /// Progress curve.
    pub easing: Easing,
    /// Reject triggers beyond this many live bursts. Unbounded when `None`.
    pub max_live_bursts: Option<usize>,
    /// Sprite file locations.
    pub sprites: SpritePattern,
    /// Camera setup.
    pub camera: CameraConfig,
    /// Initial sky parameters.
    pub sky: SkySettings,
    /// Upper bound on device pixel ratio.
    pub max_pixel_ratio: f32,
    /// Fixed RNG seed for reproducible bursts.
    pub seed: Option<u64>,
}

impl Default for FireworksConfig {
    fn default() -> Self {
        Self {
            bursts: BurstRanges::default(),
            duration: DEFAULT_DURATION,
            easing: Easing::Linear,
            max_live_bursts: None,
            sprites: SpritePattern::default(),
            camera: CameraConfig::default(),
            sky: SkySettings::default(),
            max_pixel_ratio: 2.0,
            seed: None,
        }
    }
}

impl FireworksConfig {
    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field for usable values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let count = self.bursts.count;
        if !count.is_valid() {
            return Err(ConfigError::InvalidRange {
                name: "bursts.count",
                min: count.min as f64,
                max: count.max as f64,
            });
        }
        for (name, range) in self.bursts.float_ranges() {
            if !range.is_valid() {
                return Err(ConfigError::InvalidRange {
                    name,
                    min: range.min as f64,
                    max: range.max as f64,
                });
            }
        }
        if !(self.bursts.radius.min >= 0.0 && self.bursts.size.min >= 0.0) {
            let range = if self.bursts.radius.min < 0.0 {
                ("bursts.radius", self.bursts.radius)
            } else {
                ("bursts.size", self.bursts.size)
            };
            return Err(ConfigError::InvalidRange {
                name: range.0,
                min: range.1.min as f64,
                max: range.1.max as f64,
            });
        }

        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(ConfigError::InvalidDuration(self.duration));
        }
        if self.sprites.count == 0 {
            return Err(ConfigError::ZeroSprites);
        }
        if !(self.max_pixel_ratio.is_finite() && self.max_pixel_ratio > 0.0) {
            return Err(ConfigError::PixelRatio(self.max_pixel_ratio));
        }
        self.camera.validate()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::{RangeF32, RangeU32};

    #[test]
    fn test_defaults_validate() {
        let config = FireworksConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.duration, 3.0);
        assert_eq!(config.max_pixel_ratio, 2.0);
        assert_eq!(config.max_live_bursts, None);
        assert_eq!(config.sprites.count, 10);
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = FireworksConfig::from_json("{}").unwrap();
        assert_eq!(config, FireworksConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "duration": 5.0,
            "easing": "quad_out",
            "max_live_bursts": 8,
            "seed": 42,
            "bursts": { "count": { "min": 10, "max": 20 } },
            "sky": { "turbidity": 2.0 }
        }"#;
        let config = FireworksConfig::from_json(json).unwrap();
        assert_eq!(config.duration, 5.0);
        assert_eq!(config.easing, Easing::QuadOut);
        assert_eq!(config.max_live_bursts, Some(8));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.bursts.count, RangeU32::new(10, 20));
        assert_eq!(config.bursts.radius, BurstRanges::default().radius);
        assert_eq!(config.sky.turbidity, 2.0);
        assert_eq!(config.sky.rayleigh, 3.0);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            FireworksConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_bad_ranges_rejected() {
        let mut config = FireworksConfig::default();
        config.bursts.count = RangeU32::new(10, 5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { name: "bursts.count", .. })
        ));

        let mut config = FireworksConfig::default();
        config.bursts.y = RangeF32::new(1.0, 0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { name: "bursts.y", .. })
        ));

        let mut config = FireworksConfig::default();
        config.bursts.radius = RangeF32::new(-1.0, 1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { name: "bursts.radius", .. })
        ));
    }

    #[test]
    fn test_scalar_fields_rejected() {
        let config = FireworksConfig {
            duration: 0.0,
            ..FireworksConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDuration(_))));

        let mut config = FireworksConfig::default();
        config.sprites.count = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroSprites)));

        let config = FireworksConfig {
            max_pixel_ratio: f32::NAN,
            ..FireworksConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::PixelRatio(_))));

        let mut config = FireworksConfig::default();
        config.camera.near = 200.0;
        assert!(matches!(config.validate(), Err(ConfigError::Camera(_))));
    }
}
