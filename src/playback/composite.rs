//! Animations built from other animations.

use std::collections::VecDeque;

use super::animation::Animation;
use crate::error::AnimationError;

type BoxedAnimation = Box<dyn Animation>;

// =============================================================================
// Sequence
// =============================================================================

/// Runs children one after another.
///
/// Only the current child is updated. A child that finishes hands over to
/// the next one on the following tick; a child that fails stops the whole
/// sequence and the remaining children are never started.
#[derive(Default)]
pub struct Sequence {
    queue: VecDeque<BoxedAnimation>,
    started: bool,
}

impl Sequence {
    /// A sequence over `children`, played front to back.
    pub fn new(children: impl IntoIterator<Item = BoxedAnimation>) -> Self {
        Self {
            queue: children.into_iter().collect(),
            started: false,
        }
    }

    /// Append a child (builder pattern).
    #[must_use]
    pub fn then(mut self, next: impl Animation + 'static) -> Self {
        self.queue.push_back(Box::new(next));
        self
    }

    /// Children not yet finished, including the current one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Animation for Sequence {
    fn update(&mut self, dt: f32) -> Result<bool, AnimationError> {
        let Some(current) = self.queue.front_mut() else {
            return Ok(true);
        };
        self.started = true;

        match current.update(dt) {
            Ok(false) => Ok(false),
            Ok(true) => {
                current.on_complete();
                self.queue.pop_front();
                self.started = false;
                Ok(self.queue.is_empty())
            }
            Err(err) => {
                current.on_cancel();
                self.queue.clear();
                self.started = false;
                Err(err)
            }
        }
    }

    fn on_cancel(&mut self) {
        if self.started {
            if let Some(current) = self.queue.front_mut() {
                current.on_cancel();
            }
        }
        self.queue.clear();
        self.started = false;
    }
}

// =============================================================================
// Parallel
// =============================================================================

/// Runs children side by side, finishing when the last one does.
///
/// A failing child is cancelled on its own; its siblings keep running. The
/// group then reports the first failure once every child has stopped.
#[derive(Default)]
pub struct Parallel {
    running: Vec<BoxedAnimation>,
    failure: Option<AnimationError>,
}

impl Parallel {
    pub fn new(children: impl IntoIterator<Item = BoxedAnimation>) -> Self {
        Self {
            running: children.into_iter().collect(),
            failure: None,
        }
    }

    /// Add a child (builder pattern).
    #[must_use]
    pub fn with(mut self, child: impl Animation + 'static) -> Self {
        self.running.push(Box::new(child));
        self
    }

    /// Children still running.
    #[must_use]
    pub fn len(&self) -> usize {
        self.running.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }
}

impl Animation for Parallel {
    fn update(&mut self, dt: f32) -> Result<bool, AnimationError> {
        let failure = &mut self.failure;
        self.running.retain_mut(|child| match child.update(dt) {
            Ok(false) => true,
            Ok(true) => {
                child.on_complete();
                false
            }
            Err(err) => {
                child.on_cancel();
                failure.get_or_insert(err);
                false
            }
        });

        if !self.running.is_empty() {
            return Ok(false);
        }
        match self.failure.take() {
            Some(err) => Err(err),
            None => Ok(true),
        }
    }

    fn on_cancel(&mut self) {
        for child in &mut self.running {
            child.on_cancel();
        }
        self.running.clear();
    }
}
