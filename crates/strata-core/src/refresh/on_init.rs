use std::sync::Arc;

use tracing::{Span, info};

use super::{Lifecycle, RefreshObserver, RefreshStrategy, StrategyState, TracingRefreshObserver};
use crate::error::Result;
use crate::source::Refreshable;

/// Refreshes the resource exactly once, synchronously, during `init`.
///
/// No background work is scheduled; `shutdown` only records the state
/// change.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use strata_core::refresh::{OnInitRefreshStrategy, RefreshStrategy, StrategyState};
/// use strata_core::{Refreshable, Result};
///
/// struct Noop;
/// impl Refreshable for Noop {
///     fn refresh(&self) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// let strategy = OnInitRefreshStrategy::new();
/// strategy.init(Arc::new(Noop)).unwrap();
/// assert_eq!(strategy.state(), StrategyState::Initialized);
/// ```
pub struct OnInitRefreshStrategy {
    lifecycle: Lifecycle,
    span: Span,
    observer: Arc<dyn RefreshObserver>,
}

impl OnInitRefreshStrategy {
    /// Creates a strategy in the `Created` state.
    pub fn new() -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            span: tracing::info_span!("on_init_refresh"),
            observer: Arc::new(TracingRefreshObserver),
        }
    }

    /// Sets the span lifecycle events are logged in.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Sets the observer notified of the refresh outcome.
    pub fn with_observer(mut self, observer: Arc<dyn RefreshObserver>) -> Self {
        self.observer = observer;
        self
    }
}

impl Default for OnInitRefreshStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshStrategy for OnInitRefreshStrategy {
    fn init(&self, resource: Arc<dyn Refreshable>) -> Result<()> {
        let _entered = self.span.enter();
        self.lifecycle.begin_init("OnInitRefreshStrategy")?;

        info!("Initializing on-init refresh strategy");
        match resource.refresh() {
            Ok(()) => {
                self.observer.on_refresh_success();
                Ok(())
            },
            Err(e) => {
                self.observer.on_refresh_failure(&e);
                Err(e)
            },
        }
    }

    fn shutdown(&self) {
        let previous = self.lifecycle.shut_down();
        if previous != StrategyState::ShutDown {
            self.span
                .in_scope(|| info!("Shutting down on-init refresh strategy"));
        }
    }

    fn state(&self) -> StrategyState {
        self.lifecycle.get()
    }
}
