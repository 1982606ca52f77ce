//! `Selector`: simultaneously pump N producer line sequences into N
//! consumers, terminating exactly when every *critical* route's producer
//! has signalled end-of-sequence.
//!
//! One worker thread per route pulls lines from its producer and applies
//! its consumer; a critical route's worker decrements a shared
//! remaining-critical counter (the `ConcurrencyPrimitives` `Guarded`
//! counter from `lineflow-core`) when its producer ends. The driver thread
//! blocks on that counter reaching zero, then closes every route's
//! producer — critical routes are already finished, so this only has an
//! observable effect on the still-running non-critical ones, which wake up
//! and exit.

mod error;

pub use error::SelectorError;

use lineflow_core::{Error, Guarded, Item, LineConsumer, LineSequence};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::thread;

/// One leg of a Selector: a producer, the consumer it feeds, and whether
/// its completion counts toward Selector termination.
pub struct Route {
    pub producer: Arc<LineSequence>,
    pub consumer: LineConsumer,
    pub critical: bool,
}

impl Route {
    pub fn new(producer: Arc<LineSequence>, consumer: LineConsumer, critical: bool) -> Self {
        Self {
            producer,
            consumer,
            critical,
        }
    }
}

/// Result of running a Selector to completion.
#[derive(Debug, Default)]
pub struct SelectorOutcome {
    /// The first failure observed across all routes, if any. Later
    /// failures from other routes are logged, not returned, matching the
    /// "first exception wins" propagation rule.
    pub first_error: Option<Error>,
}

impl SelectorOutcome {
    pub fn is_ok(&self) -> bool {
        self.first_error.is_none()
    }
}

/// Owns a set of routes and pumps all of them until the critical ones
/// drain.
pub struct Selector {
    routes: Vec<Route>,
}

impl Selector {
    /// Build a Selector. Fails if no route is marked critical, since such a
    /// Selector could never terminate.
    pub fn new(routes: Vec<Route>) -> Result<Self, SelectorError> {
        if !routes.iter().any(|r| r.critical) {
            return Err(SelectorError::NoCriticalRoute);
        }
        Ok(Self { routes })
    }

    /// Spawn one worker per route and block until every critical route's
    /// producer has ended, then interrupt the rest.
    pub fn run(self) -> SelectorOutcome {
        let critical_remaining = self.routes.iter().filter(|r| r.critical).count() as i64;
        let remaining = Arc::new(Guarded::new(critical_remaining));
        let first_error: Arc<Mutex<Option<Error>>> = Arc::new(Mutex::new(None));
        let producers: Vec<Arc<LineSequence>> =
            self.routes.iter().map(|r| Arc::clone(&r.producer)).collect();

        let handles: Vec<_> = self
            .routes
            .into_iter()
            .map(|route| spawn_route_worker(route, Arc::clone(&remaining), Arc::clone(&first_error)))
            .collect();

        remaining.wait_while(|n| *n > 0);

        // Critical routes are already done; this only wakes the
        // non-critical ones still blocked on their producer.
        for producer in &producers {
            producer.close();
        }

        for handle in handles {
            let _ = handle.join();
        }

        let first_error = first_error
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take();
        SelectorOutcome { first_error }
    }
}

fn spawn_route_worker(
    route: Route,
    remaining: Arc<Guarded<i64>>,
    first_error: Arc<Mutex<Option<Error>>>,
) -> thread::JoinHandle<()> {
    let Route {
        producer,
        mut consumer,
        critical,
    } = route;

    thread::spawn(move || {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            while let Some(line) = producer.recv() {
                consumer(Item::Value(line));
            }
        }));
        consumer(Item::End);

        if let Err(panic) = outcome {
            let message = panic_message(panic.as_ref());
            tracing::warn!(route_critical = critical, error = %message, "route worker failed");
            let mut guard = first_error.lock().unwrap_or_else(|p| p.into_inner());
            if guard.is_none() {
                *guard = Some(Error::PipelineFailure(message));
            }
        }

        if critical {
            remaining.update_and_notify_all(|n| *n -= 1);
        }
    })
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "route worker panicked with a non-string payload".to_string()
    }
}
