//! The cooperative animation scheduler.

use tokio::sync::oneshot;

use super::animation::{Animation, Pause};
use super::composite::{Parallel, Sequence};
use super::handle::{PlaybackHandle, PlaybackResult};
use crate::error::PlaybackError;
use crate::events::CombatEvent;

struct Task {
    id: u64,
    animation: Box<dyn Animation>,
    done: oneshot::Sender<PlaybackResult>,
}

/// Multiplexes animations over one external clock.
///
/// Every active animation is updated once per `tick`, in the order it was
/// scheduled. The scheduler never reads or writes combat state.
#[derive(Default)]
pub struct AnimationScheduler {
    tasks: Vec<Task>,
    next_id: u64,
}

impl AnimationScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start one animation.
    pub fn play(&mut self, animation: impl Animation + 'static) -> PlaybackHandle {
        self.play_boxed(Box::new(animation))
    }

    /// Start one already-boxed animation.
    pub fn play_boxed(&mut self, animation: Box<dyn Animation>) -> PlaybackHandle {
        let (done, handle) = PlaybackHandle::channel();
        let id = self.next_id;
        self.next_id += 1;
        tracing::trace!("playback {} scheduled", id);
        self.tasks.push(Task { id, animation, done });
        handle
    }

    /// Play `animations` one after another; the handle resolves after the
    /// last one finishes.
    pub fn play_sequence(
        &mut self,
        animations: impl IntoIterator<Item = Box<dyn Animation>>,
    ) -> PlaybackHandle {
        self.play(Sequence::new(animations))
    }

    /// Play `animations` together; the handle resolves after all finish.
    pub fn play_parallel(
        &mut self,
        animations: impl IntoIterator<Item = Box<dyn Animation>>,
    ) -> PlaybackHandle {
        self.play(Parallel::new(animations))
    }

    /// Play the animations `factory` makes for `events`, as one sequence.
    pub fn play_events(
        &mut self,
        events: &[CombatEvent],
        factory: &dyn AnimationFactory,
    ) -> PlaybackHandle {
        self.play_sequence(events.iter().filter_map(|event| factory.animate(event)))
    }

    /// Advance every active animation by `dt` seconds.
    ///
    /// Finished animations resolve their handles with `Ok`; failed ones are
    /// cancelled and resolve with `PlaybackError::Failed`. Other animations
    /// are unaffected either way.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        let mut active = Vec::with_capacity(self.tasks.len());
        for mut task in std::mem::take(&mut self.tasks) {
            match task.animation.update(dt) {
                Ok(false) => active.push(task),
                Ok(true) => {
                    task.animation.on_complete();
                    tracing::trace!("playback {} complete", task.id);
                    let _ = task.done.send(Ok(()));
                }
                Err(err) => {
                    tracing::warn!("playback {} failed: {}", task.id, err);
                    task.animation.on_cancel();
                    let _ = task.done.send(Err(PlaybackError::Failed(err)));
                }
            }
        }
        self.tasks = active;
    }

    /// Cancel everything in flight.
    ///
    /// Each animation's `on_cancel` runs once and every handle resolves with
    /// `PlaybackError::Cancelled`. Nothing is called afterwards.
    pub fn cancel_all(&mut self) {
        for mut task in self.tasks.drain(..) {
            task.animation.on_cancel();
            let _ = task.done.send(Err(PlaybackError::Cancelled));
        }
    }

    /// No animation in flight.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of top-level playbacks in flight.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }
}

impl std::fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationScheduler")
            .field("active", &self.tasks.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

// =============================================================================
// Event Mapping
// =============================================================================

/// Maps combat events to animations.
pub trait AnimationFactory {
    /// The animation for `event`, or `None` if it has no visual.
    fn animate(&self, event: &CombatEvent) -> Option<Box<dyn Animation>>;
}

/// Paces events with plain pauses: one beat per visible event, a longer one
/// for the end of combat. Turn bookkeeping events are skipped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedPacing {
    pub beat: f32,
    pub finale: f32,
}

impl Default for FixedPacing {
    fn default() -> Self {
        Self {
            beat: 0.4,
            finale: 1.0,
        }
    }
}

impl FixedPacing {
    #[must_use]
    pub fn with_beat(mut self, seconds: f32) -> Self {
        self.beat = seconds;
        self
    }

    #[must_use]
    pub fn with_finale(mut self, seconds: f32) -> Self {
        self.finale = seconds;
        self
    }
}

impl AnimationFactory for FixedPacing {
    fn animate(&self, event: &CombatEvent) -> Option<Box<dyn Animation>> {
        let seconds = match event {
            CombatEvent::InitiativeRolled { .. }
            | CombatEvent::TurnStarted { .. }
            | CombatEvent::TurnEnded { .. } => {
                return None
            }
            e if e.is_terminal() => self.finale,
            _ => self.beat,
        };
        Some(Box::new(Pause::new(seconds)))
    }
}
