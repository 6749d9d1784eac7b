//! Fixed-duration pacing between submission waves.

use std::time::Duration;

use parking_lot::Mutex;
use rit_core::BoxFuture;

/// Suspends the submission loop.
pub trait Pacer: Send + Sync {
    fn pause(&self, duration: Duration) -> BoxFuture<'_, ()>;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

impl Pacer for TokioPacer {
    fn pause(&self, duration: Duration) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            if !duration.is_zero() {
                tokio::time::sleep(duration).await;
            }
        })
    }
}

/// Records requested pauses without sleeping.
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().clone()
    }

    pub fn total(&self) -> Duration {
        self.pauses.lock().iter().sum()
    }
}

impl Pacer for RecordingPacer {
    fn pause(&self, duration: Duration) -> BoxFuture<'_, ()> {
        self.pauses.lock().push(duration);
        Box::pin(async {})
    }
}
