//! Firework emitter: spawns self-disposing bursts into the scene.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::emitter::BurstRanges;
use super::particle::{Firework, FireworkParams, ParticleAttributes};
use crate::animation::{Easing, Tween, TweenGroup};
use crate::config::FireworksConfig;
use crate::core::Id;
use crate::material::FireworkMaterial;
use crate::math::{Color, Vector3};
use crate::objects::Points;
use crate::scene::Scene;
use crate::texture::SpriteId;

/// Default burst lifetime in seconds.
pub const DEFAULT_DURATION: f32 = 3.0;

/// Creates bursts and drives their progress tweens.
pub struct FireworkSystem {
    /// Progress tweens, one per live burst.
    tweens: TweenGroup<Scene>,
    rng: StdRng,
    ranges: BurstRanges,
    sprite_count: usize,
    duration: f32,
    easing: Easing,
    max_live_bursts: Option<usize>,
    /// Output size in device pixels handed to new bursts.
    resolution: [f32; 2],
    created: u64,
    rejected: u64,
}

impl FireworkSystem {
    /// Create a system drawing sprites from a pool of `sprite_count` textures.
    pub fn new(sprite_count: usize) -> Self {
        Self {
            tweens: TweenGroup::new(),
            rng: StdRng::from_entropy(),
            ranges: BurstRanges::default(),
            sprite_count: sprite_count.max(1),
            duration: DEFAULT_DURATION,
            easing: Easing::Linear,
            max_live_bursts: None,
            resolution: [1.0, 1.0],
            created: 0,
            rejected: 0,
        }
    }

    /// Create a system from configuration.
    pub fn from_config(config: &FireworksConfig, sprite_count: usize) -> Self {
        let mut system = Self::new(sprite_count)
            .with_ranges(config.bursts)
            .with_duration(config.duration)
            .with_easing(config.easing)
            .with_max_live_bursts(config.max_live_bursts);
        if let Some(seed) = config.seed {
            system = system.with_seed(seed);
        }
        system
    }

    /// Set the random parameter ranges.
    pub fn with_ranges(mut self, ranges: BurstRanges) -> Self {
        self.ranges = ranges;
        self
    }

    /// Set the burst lifetime in seconds.
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    /// Set the progress easing.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Cap the number of simultaneously live bursts.
    pub fn with_max_live_bursts(mut self, max: Option<usize>) -> Self {
        self.max_live_bursts = max;
        self
    }

    /// Use a deterministic random stream.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Spawn one burst.
    ///
    /// The point cloud is added to `scene` immediately and disposed by its
    /// progress tween once progress reaches 1. Returns the point cloud's ID,
    /// or `None` when the live-burst cap is reached.
    pub fn create_firework(&mut self, scene: &mut Scene, params: FireworkParams) -> Option<Id> {
        if let Some(max) = self.max_live_bursts {
            if self.live_count() >= max {
                self.rejected += 1;
                log::warn!("Firework rejected: {} bursts already live (cap {})", self.live_count(), max);
                return None;
            }
        }

        let params = params.sanitized();
        let attributes = ParticleAttributes::generate(params.count as usize, params.radius, &mut self.rng);

        let material = FireworkMaterial::new(params.size, params.sprite, params.color, self.resolution);
        let mut points = Points::new(attributes.into_geometry(), material);
        points.set_name("Firework");
        points.set_position(params.origin);

        let id = scene.add(points);
        let firework = Firework::new(id);

        let tween = Tween::new(0.0, 1.0, self.duration)
            .easing(self.easing)
            .on_update(move |scene: &mut Scene, progress| {
                if let Some(points) = scene.get_mut(id) {
                    points.material_mut().set_progress(progress);
                }
            })
            .on_complete(move |scene: &mut Scene| {
                firework.dispose(scene);
            });
        self.tweens.add(tween);
        self.created += 1;

        log::debug!(
            "Firework {} created: {} particles at {:?}",
            id,
            params.count,
            params.origin
        );

        Some(id)
    }

    /// Spawn one burst with parameters drawn from the configured ranges.
    pub fn create_random_firework(&mut self, scene: &mut Scene) -> Option<Id> {
        let params = self.random_params();
        self.create_firework(scene, params)
    }

    /// Draw burst parameters from the configured ranges.
    pub fn random_params(&mut self) -> FireworkParams {
        let rng = &mut self.rng;
        let ranges = &self.ranges;
        FireworkParams {
            count: ranges.count.sample(rng),
            origin: Vector3::new(ranges.x.sample(rng), ranges.y.sample(rng), ranges.z.sample(rng)),
            size: ranges.size.sample(rng),
            sprite: SpriteId(rng.gen_range(0..self.sprite_count)),
            radius: ranges.radius.sample(rng),
            color: Color::random(rng),
        }
    }

    /// Advance every burst by `delta_time` seconds, disposing finished ones.
    pub fn update(&mut self, scene: &mut Scene, delta_time: f32) {
        self.tweens.update(scene, delta_time);
    }

    /// Set the output resolution for new bursts and every live one.
    pub fn set_resolution(&mut self, scene: &mut Scene, width: f32, height: f32) {
        self.resolution = [width, height];
        for points in scene.iter_mut() {
            points.material_mut().set_resolution(width, height);
        }
    }

    /// Current output resolution.
    #[inline]
    pub fn resolution(&self) -> [f32; 2] {
        self.resolution
    }

    /// Number of bursts still animating.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.tweens.len()
    }

    /// Total bursts created.
    #[inline]
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Total triggers rejected by the cap.
    #[inline]
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Burst lifetime in seconds.
    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Random parameter ranges.
    #[inline]
    pub fn ranges(&self) -> &BurstRanges {
        &self.ranges
    }
}

impl std::fmt::Debug for FireworkSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FireworkSystem")
            .field("live", &self.live_count())
            .field("created", &self.created)
            .field("duration", &self.duration)
            .field("max_live_bursts", &self.max_live_bursts)
            .finish()
    }
}
