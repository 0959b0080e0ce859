//! Synchronization state of a git source.

use std::time::{Duration, Instant};

use parking_lot::RwLock;

#[derive(Debug, Default)]
struct Inner {
    commit: Option<String>,
    last_success: Option<Instant>,
    last_error: Option<String>,
    failure_count: u32,
}

/// Outcome of the most recent clone or fetch of a git source.
///
/// Failed refreshes leave the last good commit in place; the source keeps
/// serving it.
#[derive(Debug, Default)]
pub struct SyncState {
    inner: RwLock<Inner>,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the commit of the last successful sync.
    pub fn commit(&self) -> Option<String> {
        self.inner.read().commit.clone()
    }

    /// Returns the time elapsed since the last successful sync.
    pub fn since_last_success(&self) -> Option<Duration> {
        self.inner.read().last_success.map(|at| at.elapsed())
    }

    /// Returns the message of the last failure, cleared by a success.
    pub fn last_error(&self) -> Option<String> {
        self.inner.read().last_error.clone()
    }

    /// Returns the number of failures since the last success.
    pub fn failure_count(&self) -> u32 {
        self.inner.read().failure_count
    }

    /// Returns true once a sync has succeeded and the latest one did not fail.
    pub fn is_healthy(&self) -> bool {
        let inner = self.inner.read();
        inner.commit.is_some() && inner.last_error.is_none()
    }

    pub fn record_success(&self, commit: impl Into<String>) {
        let mut inner = self.inner.write();
        inner.commit = Some(commit.into());
        inner.last_success = Some(Instant::now());
        inner.last_error = None;
        inner.failure_count = 0;
    }

    pub fn record_failure(&self, error: impl Into<String>) {
        let mut inner = self.inner.write();
        inner.last_error = Some(error.into());
        inner.failure_count += 1;
    }
}
