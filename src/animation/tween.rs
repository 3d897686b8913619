//! Single-value tween: drive a field from `from` to `to` over a duration.

use super::Easing;
use crate::core::Id;
use crate::math::lerp;

/// Callback receiving each interpolated value.
pub type UpdateFn<C> = Box<dyn FnMut(&mut C, f32)>;
/// Callback run once when the tween reaches its end value.
pub type CompleteFn<C> = Box<dyn FnOnce(&mut C)>;

/// Playback state of a tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenState {
    /// Still advancing.
    Running,
    /// Reached `to`; the completion handler has run.
    Completed,
}

/// Interpolates a scalar over time and hands each value to a callback.
///
/// `C` is the context the callbacks mutate (the scene, for fireworks).
/// Tweens do not own their target; the `on_update` closure locates it
/// inside the context on every step.
pub struct Tween<C> {
    id: Id,
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    easing: Easing,
    value: f32,
    state: TweenState,
    on_update: Option<UpdateFn<C>>,
    on_complete: Option<CompleteFn<C>>,
}

impl<C> Tween<C> {
    /// Create a linear tween from `from` to `to` lasting `duration` seconds.
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            id: Id::new(),
            from,
            to,
            duration,
            elapsed: 0.0,
            easing: Easing::Linear,
            value: from,
            state: TweenState::Running,
            on_update: None,
            on_complete: None,
        }
    }

    /// Set the easing curve.
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set the per-step callback.
    pub fn on_update(mut self, f: impl FnMut(&mut C, f32) + 'static) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    /// Set the completion callback.
    pub fn on_complete(mut self, f: impl FnOnce(&mut C) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Get the unique ID.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Most recent interpolated value.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Seconds advanced so far.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Normalized time in `[0, 1]`. Zero or invalid durations count as done.
    pub fn progress(&self) -> f32 {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return 1.0;
        }
        (self.elapsed / self.duration).min(1.0)
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> TweenState {
        self.state
    }

    /// Check whether the tween has completed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.state == TweenState::Completed
    }

    /// Advance by `dt` seconds.
    ///
    /// Negative or non-finite deltas advance nothing. The step that reaches
    /// the end reports exactly `to`, then runs the completion handler.
    pub fn update(&mut self, ctx: &mut C, dt: f32) -> TweenState {
        if self.state == TweenState::Completed {
            return self.state;
        }

        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }

        let t = self.progress();
        self.value = if t >= 1.0 {
            self.to
        } else {
            lerp(self.from, self.to, self.easing.apply(t))
        };

        if let Some(on_update) = self.on_update.as_mut() {
            on_update(ctx, self.value);
        }

        if t >= 1.0 {
            self.state = TweenState::Completed;
            if let Some(on_complete) = self.on_complete.take() {
                on_complete(ctx);
            }
        }

        self.state
    }
}

impl<C> std::fmt::Debug for Tween<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tween")
            .field("id", &self.id)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("duration", &self.duration)
            .field("elapsed", &self.elapsed)
            .field("easing", &self.easing)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Target {
        value: f32,
        history: Vec<f32>,
        completions: u32,
        value_at_completion: Option<f32>,
    }

    fn progress_tween() -> Tween<Target> {
        Tween::new(0.0, 1.0, 3.0)
            .on_update(|t: &mut Target, v| {
                t.value = v;
                t.history.push(v);
            })
            .on_complete(|t: &mut Target| {
                t.completions += 1;
                t.value_at_completion = Some(t.value);
            })
    }

    #[test]
    fn test_linear_midpoint() {
        let mut target = Target::default();
        let mut tween = progress_tween();
        tween.update(&mut target, 1.5);
        assert!((target.value - 0.5).abs() < 1e-6);
        assert_eq!(tween.state(), TweenState::Running);
    }

    #[test]
    fn test_reaches_exact_end_and_completes_once() {
        let mut target = Target::default();
        let mut tween = progress_tween();
        for _ in 0..6 {
            tween.update(&mut target, 0.5);
        }
        assert!(tween.is_complete());
        assert_eq!(target.value, 1.0);
        assert_eq!(target.completions, 1);
        assert_eq!(target.value_at_completion, Some(1.0));

        tween.update(&mut target, 0.5);
        tween.update(&mut target, 10.0);
        assert_eq!(target.completions, 1);
    }

    #[test]
    fn test_not_complete_before_duration() {
        let mut target = Target::default();
        let mut tween = progress_tween();
        tween.update(&mut target, 2.99);
        assert_eq!(target.completions, 0);
        assert!(target.value < 1.0);
    }

    #[test]
    fn test_values_non_decreasing() {
        let mut target = Target::default();
        let mut tween = progress_tween();
        while !tween.is_complete() {
            tween.update(&mut target, 1.0 / 60.0);
        }
        assert!(target.history.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(*target.history.last().unwrap(), 1.0);
    }

    #[test]
    fn test_overshooting_delta_clamps() {
        let mut target = Target::default();
        let mut tween = progress_tween();
        tween.update(&mut target, 100.0);
        assert_eq!(target.value, 1.0);
        assert_eq!(tween.progress(), 1.0);
        assert_eq!(target.completions, 1);
    }

    #[test]
    fn test_bad_deltas_are_ignored() {
        let mut target = Target::default();
        let mut tween = progress_tween();
        tween.update(&mut target, -1.0);
        tween.update(&mut target, f32::NAN);
        tween.update(&mut target, f32::INFINITY);
        assert_eq!(tween.elapsed(), 0.0);
        assert_eq!(target.value, 0.0);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut target = Target::default();
        let mut tween = Tween::new(2.0, 5.0, 0.0).on_update(|t: &mut Target, v| t.value = v);
        assert_eq!(tween.update(&mut target, 0.0), TweenState::Completed);
        assert_eq!(target.value, 5.0);
    }

    #[test]
    fn test_easing_applies() {
        let mut target = Target::default();
        let mut tween = Tween::new(0.0, 1.0, 1.0)
            .easing(Easing::QuadIn)
            .on_update(|t: &mut Target, v| t.value = v);
        tween.update(&mut target, 0.5);
        assert!((target.value - 0.25).abs() < 1e-6);
    }
}
