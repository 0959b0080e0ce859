#![allow(dead_code)]
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use strata_core::{ConfigError, ConfigurationSource, Environment, Refreshable, Result, Snapshot};

/// In-memory source whose snapshot tests can swap at will.
///
/// `stage` queues a snapshot that becomes visible on the next `refresh`,
/// `set` makes it visible immediately.
pub struct MutableSource {
    current: RwLock<Snapshot>,
    staged: RwLock<Option<Snapshot>>,
    failing: RwLock<bool>,
    reads: AtomicUsize,
}

impl MutableSource {
    pub fn new(pairs: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            current: RwLock::new(snapshot(pairs)),
            staged: RwLock::new(None),
            failing: RwLock::new(false),
            reads: AtomicUsize::new(0),
        })
    }

    pub fn set(&self, pairs: &[(&str, &str)]) {
        *self.current.write() = snapshot(pairs);
    }

    pub fn stage(&self, pairs: &[(&str, &str)]) {
        *self.staged.write() = Some(snapshot(pairs));
    }

    pub fn fail_reads(&self, failing: bool) {
        *self.failing.write() = failing;
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl ConfigurationSource for MutableSource {
    fn get_configuration_for(&self, _environment: &Environment) -> Result<Snapshot> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if *self.failing.read() {
            return Err(ConfigError::read("memory", "backing store unavailable"));
        }
        Ok(self.current.read().clone())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

impl Refreshable for MutableSource {
    fn refresh(&self) -> Result<()> {
        if let Some(next) = self.staged.write().take() {
            *self.current.write() = next;
        }
        Ok(())
    }
}

pub fn snapshot(pairs: &[(&str, &str)]) -> Snapshot {
    pairs.iter().copied().collect()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("strata_bind=debug,strata_core=debug")
        .with_test_writer()
        .try_init();
}
