// Observer pipeline: explicit, ordered stages around every store call

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::implementations::default_observers;
use crate::observer::traits::{Observer, ObserverRing};

/// Executes registered observers ring by ring.
///
/// Rings run in ascending order for the operation (see
/// [`ObserverRing::for_operation`]); within a ring, observers run by priority and
/// then registration order. The first failure stops the run, so pre-database
/// failures leave storage untouched.
///
/// Only pre-database observers run under the observer timeout. Once the store
/// call starts, the operation runs to completion so a stored write is never
/// reported as failed.
pub struct ObserverPipeline {
    // Observer registry by ring
    observers: HashMap<ObserverRing, Vec<Box<dyn Observer>>>,
    observer_timeout: Duration,
}

impl ObserverPipeline {
    /// Create new observer pipeline with empty observer registry
    pub fn new() -> Self {
        Self {
            observers: HashMap::new(),
            observer_timeout: Duration::from_secs(5),
        }
    }

    /// Pipeline with every built-in observer registered
    pub fn standard() -> Self {
        let mut pipeline = Self::new();
        for observer in default_observers() {
            pipeline.register_observer(observer);
        }
        pipeline
    }

    pub fn with_timeout(mut self, observer_timeout: Duration) -> Self {
        self.observer_timeout = observer_timeout;
        self
    }

    pub fn register_observer(&mut self, observer: Box<dyn Observer>) {
        let ring = observer.ring();
        let name = observer.name();
        let ring_observers = self.observers.entry(ring).or_default();
        ring_observers.push(observer);
        // stable: equal priorities keep registration order
        ring_observers.sort_by_key(|o| o.priority());

        tracing::debug!("Registered observer '{}' for ring {:?}", name, ring);
    }

    /// Names of the observers in a ring, in execution order
    pub fn observer_names(&self, ring: ObserverRing) -> Vec<&'static str> {
        self.observers
            .get(&ring)
            .map(|list| list.iter().map(|o| o.name()).collect())
            .unwrap_or_default()
    }

    pub async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let relevant_rings = ObserverRing::for_operation(ctx.operation);

        tracing::info!(
            "Observer pipeline starting: operation={:?}, resource={}, rings={:?}",
            ctx.operation, ctx.resource, relevant_rings
        );

        for &ring in relevant_rings {
            ctx.current_ring = Some(ring);

            if let Err(error) = self.execute_ring(ring, ctx).await {
                if ring.is_pre_database() {
                    tracing::warn!(
                        "Observer pipeline rejected {:?} on {} at ring {:?}: {}",
                        ctx.operation, ctx.resource, ring, error
                    );
                } else {
                    tracing::error!(
                        "Observer pipeline failed {:?} on {} at ring {:?}: {}",
                        ctx.operation, ctx.resource, ring, error
                    );
                }
                return Err(error);
            }
        }

        tracing::debug!(
            "Observer pipeline completed {:?} on {} in {:?}",
            ctx.operation,
            ctx.resource,
            ctx.execution_time()
        );
        Ok(())
    }

    /// Execute observers in a specific ring
    async fn execute_ring(&self, ring: ObserverRing, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let Some(observers) = self.observers.get(&ring) else {
            tracing::trace!("No observers registered for ring {:?}", ring);
            return Ok(());
        };

        for observer in observers {
            if !observer.applies_to_operation(ctx.operation) || !observer.applies_to_resource(ctx.resource) {
                continue;
            }

            let observer_start = Instant::now();
            let outcome = if ring.is_pre_database() {
                timeout(self.observer_timeout, observer.execute(ctx)).await
            } else {
                Ok(observer.execute(ctx).await)
            };
            match outcome {
                Ok(Ok(())) => {
                    tracing::debug!(
                        "Observer: {} completed successfully in {:?}",
                        observer.name(),
                        observer_start.elapsed()
                    );
                }
                Ok(Err(error)) => {
                    tracing::debug!("Observer: {} failed: {}", observer.name(), error);
                    return Err(error);
                }
                Err(_elapsed) => {
                    tracing::error!(
                        "Observer: {} timed out after {:?}",
                        observer.name(),
                        self.observer_timeout
                    );
                    return Err(ObserverError::Timeout(format!(
                        "Observer {} timed out after {:?}",
                        observer.name(),
                        self.observer_timeout
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for ObserverPipeline {
    fn default() -> Self {
        Self::new()
    }
}
