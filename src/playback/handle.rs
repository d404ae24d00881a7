//! Completion signal for one scheduled playback.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::PlaybackError;

/// Outcome of one playback.
pub type PlaybackResult = Result<(), PlaybackError>;

/// Resolves when its playback completes, is cancelled or fails.
///
/// Await it from async code, or poll it with `try_result` from a frame
/// loop. If the scheduler is dropped first the handle yields
/// `PlaybackError::Dropped`.
#[derive(Debug)]
pub struct PlaybackHandle {
    rx: oneshot::Receiver<PlaybackResult>,
    outcome: Option<PlaybackResult>,
}

impl PlaybackHandle {
    pub(crate) fn channel() -> (oneshot::Sender<PlaybackResult>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx, outcome: None })
    }

    /// The outcome if the playback has stopped, without waiting.
    pub fn try_result(&mut self) -> Option<PlaybackResult> {
        if self.outcome.is_none() {
            self.outcome = match self.rx.try_recv() {
                Ok(result) => Some(result),
                Err(oneshot::error::TryRecvError::Empty) => None,
                Err(oneshot::error::TryRecvError::Closed) => Some(Err(PlaybackError::Dropped)),
            };
        }
        self.outcome.clone()
    }

    /// Whether the playback has stopped, for any reason.
    pub fn is_finished(&mut self) -> bool {
        self.try_result().is_some()
    }
}

impl Future for PlaybackHandle {
    type Output = PlaybackResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(outcome) = &self.outcome {
            return Poll::Ready(outcome.clone());
        }
        let outcome = match Pin::new(&mut self.rx).poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(received) => received.unwrap_or(Err(PlaybackError::Dropped)),
        };
        self.outcome = Some(outcome.clone());
        Poll::Ready(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_result_caches_outcome() {
        let (tx, mut handle) = PlaybackHandle::channel();
        assert_eq!(handle.try_result(), None);

        tx.send(Err(PlaybackError::Cancelled)).unwrap();
        assert_eq!(handle.try_result(), Some(Err(PlaybackError::Cancelled)));
        assert_eq!(handle.try_result(), Some(Err(PlaybackError::Cancelled)));
        assert!(handle.is_finished());
    }

    #[test]
    fn test_dropped_sender() {
        let (tx, mut handle) = PlaybackHandle::channel();
        drop(tx);
        assert_eq!(handle.try_result(), Some(Err(PlaybackError::Dropped)));
    }
}
