//! Time-driven property animation.
//!
//! A [`Tween`] interpolates one scalar from `A` to `B` over `D` seconds with
//! easing `E` and runs a completion handler `H` when it lands on `B`.
//! A [`TweenGroup`] advances many tweens against one shared context per frame.

mod interpolant;
mod tween;
mod tween_group;

pub use interpolant::Easing;
pub use tween::{CompleteFn, Tween, TweenState, UpdateFn};
pub use tween_group::TweenGroup;
