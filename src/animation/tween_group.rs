//! Collection of running tweens advanced together once per frame.

use super::Tween;
use crate::core::Id;

/// Drives every active tween against a shared context.
///
/// Completed tweens are dropped at the end of the update that finished them.
pub struct TweenGroup<C> {
    tweens: Vec<Tween<C>>,
    /// Global time scale.
    pub time_scale: f32,
}

impl<C> Default for TweenGroup<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TweenGroup<C> {
    /// Create an empty group.
    pub fn new() -> Self {
        Self {
            tweens: Vec::new(),
            time_scale: 1.0,
        }
    }

    /// Start tracking a tween. Returns its ID.
    pub fn add(&mut self, tween: Tween<C>) -> Id {
        let id = tween.id();
        self.tweens.push(tween);
        id
    }

    /// Advance every tween by `delta_time` seconds.
    pub fn update(&mut self, ctx: &mut C, delta_time: f32) {
        let scaled = delta_time * self.time_scale;
        for tween in &mut self.tweens {
            tween.update(ctx, scaled);
        }
        self.tweens.retain(|t| !t.is_complete());
    }

    /// Get a running tween by ID.
    pub fn get(&self, id: Id) -> Option<&Tween<C>> {
        self.tweens.iter().find(|t| t.id() == id)
    }

    /// Check whether a tween is still running.
    pub fn contains(&self, id: Id) -> bool {
        self.get(id).is_some()
    }

    /// Number of running tweens.
    #[inline]
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    /// Check if no tweens are running.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Drop every tween without running completion handlers.
    pub fn clear(&mut self) {
        self.tweens.clear();
    }
}

impl<C> std::fmt::Debug for TweenGroup<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TweenGroup")
            .field("tweens", &self.tweens.len())
            .field("time_scale", &self.time_scale)
            .finish()
    }
}
