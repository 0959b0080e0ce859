use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{Instrument, Span, debug, info};

use super::{Lifecycle, RefreshObserver, RefreshStrategy, StrategyState, TracingRefreshObserver};
use crate::error::{ConfigError, Result};
use crate::source::Refreshable;

/// Refreshes the resource once inside `init`, then again after every fixed
/// `delay`.
///
/// The first refresh runs on the calling thread before `init` returns. If it
/// fails, `init` returns the error, no schedule is started and the strategy
/// is shut down.
///
/// Later refreshes run from a single background task on a tokio runtime: the
/// one supplied with [`with_runtime`](Self::with_runtime), or the runtime
/// `init` is called from. Each runs on the blocking pool and at most one runs
/// at a time. Failed or panicking scheduled refreshes are reported to the
/// observer and the schedule continues.
///
/// `shutdown` waits for an in-flight refresh to finish. It must not be
/// called from inside the resource's own `refresh`.
pub struct PeriodicRefreshStrategy {
    delay: Duration,
    runtime: Option<Handle>,
    span: Span,
    observer: Arc<dyn RefreshObserver>,
    lifecycle: Arc<Lifecycle>,
    /// Held for the duration of every refresh; shutdown takes it to wait for
    /// an in-flight run.
    gate: Arc<Mutex<()>>,
    shutdown_tx: Mutex<Option<watch::Sender<bool>>>,
}

impl PeriodicRefreshStrategy {
    /// Creates a strategy refreshing every `delay`.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            runtime: None,
            span: tracing::info_span!("periodic_refresh", delay = ?delay),
            observer: Arc::new(TracingRefreshObserver),
            lifecycle: Arc::new(Lifecycle::new()),
            gate: Arc::new(Mutex::new(())),
            shutdown_tx: Mutex::new(None),
        }
    }

    /// Runs the background task on `runtime` instead of the caller's.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Sets the span lifecycle and refresh events are logged in.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Sets the observer notified of every refresh outcome.
    pub fn with_observer(mut self, observer: Arc<dyn RefreshObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Returns the delay between refreshes.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn initial_refresh(&self, resource: &dyn Refreshable) -> Result<()> {
        let _gate = self.gate.lock();
        let _entered = self.span.enter();
        debug!("Starting initial refresh");
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

    fn stop(&self) -> StrategyState {
        let previous = self.lifecycle.shut_down();
        // Wait for an in-flight refresh; later ones observe ShutDown.
        drop(self.gate.lock());
        if let Some(tx) = self.shutdown_tx.lock().take() {
            let _ = tx.send(true);
        }
        previous
    }
}

impl RefreshStrategy for PeriodicRefreshStrategy {
    fn init(&self, resource: Arc<dyn Refreshable>) -> Result<()> {
        let runtime = match &self.runtime {
            Some(handle) => handle.clone(),
            None => Handle::try_current().map_err(|_| {
                ConfigError::invalid_state(
                    "PeriodicRefreshStrategy requires a tokio runtime: call init from \
                     within one or supply a handle with with_runtime",
                )
            })?,
        };

        self.lifecycle.begin_init("PeriodicRefreshStrategy")?;

        if let Err(e) = self.initial_refresh(resource.as_ref()) {
            self.lifecycle.shut_down();
            return Err(e);
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        *self.shutdown_tx.lock() = Some(shutdown_tx);

        let worker = Worker {
            resource,
            observer: self.observer.clone(),
            lifecycle: self.lifecycle.clone(),
            gate: self.gate.clone(),
            span: self.span.clone(),
        };

        self.span.in_scope(|| {
            info!(
                "Starting periodic refresh strategy with delay {:?}",
                self.delay
            )
        });
        runtime.spawn(worker.run(self.delay, shutdown_rx).instrument(self.span.clone()));

        Ok(())
    }

    fn shutdown(&self) {
        if self.stop() != StrategyState::ShutDown {
            self.span
                .in_scope(|| info!("Periodic refresh strategy shut down"));
        }
    }

    fn state(&self) -> StrategyState {
        self.lifecycle.get()
    }
}

impl Drop for PeriodicRefreshStrategy {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Clone)]
struct Worker {
    resource: Arc<dyn Refreshable>,
    observer: Arc<dyn RefreshObserver>,
    lifecycle: Arc<Lifecycle>,
    gate: Arc<Mutex<()>>,
    span: Span,
}

impl Worker {
    async fn run(self, delay: Duration, mut shutdown_rx: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {},
                result = shutdown_rx.changed() => {
                    if result.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }

            if *shutdown_rx.borrow() {
                break;
            }

            let worker = self.clone();
            if let Err(e) = tokio::task::spawn_blocking(move || worker.refresh_once()).await {
                let error = ConfigError::synchronization(
                    "periodic refresh",
                    format!("refresh task did not complete: {e}"),
                );
                self.observer.on_refresh_failure(&error);
            }
        }
        debug!("Periodic refresh task stopped");
    }

    fn refresh_once(&self) {
        let _gate = self.gate.lock();
        if self.lifecycle.get() != StrategyState::Initialized {
            return;
        }

        let _entered = self.span.enter();
        debug!("Starting scheduled refresh");
        match self.resource.refresh() {
            Ok(()) => self.observer.on_refresh_success(),
            Err(e) => self.observer.on_refresh_failure(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingResource {
        calls: AtomicUsize,
    }

    impl Refreshable for CountingResource {
        fn refresh(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingResource;

    impl Refreshable for FailingResource {
        fn refresh(&self) -> Result<()> {
            Err(ConfigError::synchronization("failing", "remote unreachable"))
        }
    }

    #[test]
    fn test_init_without_runtime() {
        let strategy = PeriodicRefreshStrategy::new(Duration::from_millis(10));
        let err = strategy
            .init(Arc::new(CountingResource::default()))
            .unwrap_err();

        assert!(err.is_invalid_state());
        assert_eq!(strategy.state(), StrategyState::Created);
    }

    #[test]
    fn test_init_with_explicit_runtime() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_time()
            .build()
            .unwrap();
        let resource = Arc::new(CountingResource::default());
        let strategy = PeriodicRefreshStrategy::new(Duration::from_millis(10))
            .with_runtime(runtime.handle().clone());

        strategy.init(resource.clone()).unwrap();
        std::thread::sleep(Duration::from_millis(150));
        strategy.shutdown();

        assert!(resource.calls.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_refreshes_repeatedly_until_shutdown() {
        let resource = Arc::new(CountingResource::default());
        let strategy = PeriodicRefreshStrategy::new(Duration::from_millis(10));

        strategy.init(resource.clone()).unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        strategy.shutdown();

        let after_shutdown = resource.calls.load(Ordering::SeqCst);
        assert!(after_shutdown >= 3, "only {after_shutdown} refreshes");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(resource.calls.load(Ordering::SeqCst), after_shutdown);
        assert_eq!(strategy.state(), StrategyState::ShutDown);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_double_init_rejected() {
        let resource = Arc::new(CountingResource::default());
        let strategy = PeriodicRefreshStrategy::new(Duration::from_secs(60));

        strategy.init(resource.clone()).unwrap();
        let err = strategy.init(resource).unwrap_err();
        assert!(err.is_invalid_state());

        strategy.shutdown();
        strategy.shutdown();
        assert_eq!(strategy.state(), StrategyState::ShutDown);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_init_refreshes_once_before_returning() {
        let resource = Arc::new(CountingResource::default());
        let strategy = PeriodicRefreshStrategy::new(Duration::from_secs(60));

        strategy.init(resource.clone()).unwrap();
        assert_eq!(resource.calls.load(Ordering::SeqCst), 1);

        // The next run waits a full delay.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(resource.calls.load(Ordering::SeqCst), 1);

        strategy.shutdown();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_init_propagates_first_refresh_failure() {
        let strategy = PeriodicRefreshStrategy::new(Duration::from_millis(10));

        let err = strategy.init(Arc::new(FailingResource)).unwrap_err();
        assert!(err.is_synchronization_error());
        assert!(err.to_string().contains("remote unreachable"));
        assert_eq!(strategy.state(), StrategyState::ShutDown);
    }
}
