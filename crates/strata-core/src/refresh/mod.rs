//! Refresh strategies.
//!
//! A [`RefreshStrategy`] decides *when* a [`Refreshable`] re-synchronizes.
//! Every strategy moves through the same lifecycle:
//!
//! ```text
//! Created --init--> Initialized --shutdown--> ShutDown
//!    |                                           ^
//!    +------------------shutdown-----------------+
//! ```
//!
//! `init` is only accepted once, from `Created`. `shutdown` is accepted from
//! any state and is idempotent.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{ConfigError, Result};
use crate::source::Refreshable;

pub mod observer;
pub mod on_init;
pub mod periodic;

pub use observer::{RefreshObserver, TracingRefreshObserver};
pub use on_init::OnInitRefreshStrategy;
pub use periodic::PeriodicRefreshStrategy;

/// Lifecycle state of a refresh strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyState {
    /// Constructed, not yet bound to a resource.
    Created,
    /// Bound to a resource and (for scheduling strategies) running.
    Initialized,
    /// Terminal; no further refresh will start.
    ShutDown,
}

impl fmt::Display for StrategyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Initialized => write!(f, "initialized"),
            Self::ShutDown => write!(f, "shut down"),
        }
    }
}

/// Policy controlling when [`Refreshable::refresh`] is invoked.
pub trait RefreshStrategy: Send + Sync {
    /// Binds the strategy to `resource` and starts it.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidState` if the strategy is not in
    ///   [`StrategyState::Created`]
    /// - whatever the strategy's own startup reports (an on-init strategy
    ///   propagates the refresh error)
    fn init(&self, resource: Arc<dyn Refreshable>) -> Result<()>;

    /// Stops the strategy. Idempotent.
    ///
    /// Once this returns no further refresh begins.
    fn shutdown(&self);

    /// Returns the current lifecycle state.
    fn state(&self) -> StrategyState;
}

/// Shared lifecycle bookkeeping for strategies.
#[derive(Debug)]
pub(crate) struct Lifecycle {
    state: Mutex<StrategyState>,
}

impl Lifecycle {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(StrategyState::Created),
        }
    }

    pub(crate) fn get(&self) -> StrategyState {
        *self.state.lock()
    }

    /// Atomically moves `Created -> Initialized`.
    pub(crate) fn begin_init(&self, strategy: &str) -> Result<()> {
        let mut state = self.state.lock();
        if *state != StrategyState::Created {
            return Err(ConfigError::invalid_state(format!(
                "{strategy} cannot be initialized: it is already {}",
                *state
            )));
        }
        *state = StrategyState::Initialized;
        Ok(())
    }

    /// Moves to `ShutDown`, returning the previous state.
    pub(crate) fn shut_down(&self) -> StrategyState {
        std::mem::replace(&mut *self.state.lock(), StrategyState::ShutDown)
    }
}
