//! Cooperative animation playback.
//!
//! Playback runs strictly after a transition is committed. The scheduler
//! consumes the event list of a resolved action and turns it into timed
//! visual effects driven by one external clock:
//!
//! - [`Animation`]: a unit advanced with `update(dt)` until done
//! - [`AnimationScheduler`]: owns every in-flight animation and its
//!   completion signal
//! - [`PlaybackHandle`]: a future resolving to `Ok` on completion or to a
//!   [`PlaybackError`] on cancellation or failure
//!
//! Nothing here can see or modify `CombatState`; cancelling playback never
//! rolls back a committed transition.

mod animation;
mod composite;
mod handle;
mod scheduler;

pub use animation::{Animation, Pause, Tween};
pub use composite::{Parallel, Sequence};
pub use handle::{PlaybackHandle, PlaybackResult};
pub use scheduler::{AnimationFactory, AnimationScheduler, FixedPacing};

pub use crate::error::{AnimationError, PlaybackError};
