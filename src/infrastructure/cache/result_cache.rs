//! Fingerprint-keyed cache of optimization results with request coalescing.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::{debug, warn};

use crate::domain::PipelineError;
use crate::domain::optimization::{OptimizationFingerprint, OptimizationResult};
use crate::infrastructure::cache::{Cache, CacheExt};

type ComputeFuture = Shared<BoxFuture<'static, Result<OptimizationResult, PipelineError>>>;

/// Caches optimization results by fingerprint and coalesces concurrent
/// computes for the same fingerprint into a single execution.
///
/// Only successful results are stored. A failed compute propagates its error
/// to every coalesced waiter, and the next request for that fingerprint
/// triggers a fresh compute. Each compute runs on its own task, so it
/// completes and lands in the store even when every waiter gives up first.
///
/// A failing backing store degrades the cache to a pass-through: lookups and
/// writes are skipped with a warning and the compute runs directly.
///
/// Entries are keyed solely by fingerprint (normalized content plus template
/// version). Optimizers that build different prompts for the same content,
/// through different profiles or extractors, must not share one `ResultCache`.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn Cache>,
    ttl: Duration,
    in_flight: Arc<Mutex<HashMap<String, (u64, ComputeFuture)>>>,
    generation: Arc<AtomicU64>,
}

impl ResultCache {
    /// The fingerprint does not encode the scoring profile, so every
    /// optimizer sharing this cache must build prompts the same way.
    pub fn new(store: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drops any stored result for the fingerprint.
    pub async fn invalidate(
        &self,
        fingerprint: &OptimizationFingerprint,
    ) -> Result<bool, PipelineError> {
        self.store.delete(fingerprint.as_str()).await
    }

    /// Returns the cached result for the fingerprint, or runs `compute`
    /// to produce it. At most one compute per fingerprint runs at a time;
    /// callers arriving while one is in flight await its outcome.
    pub async fn get_or_compute<F, Fut>(
        &self,
        fingerprint: &OptimizationFingerprint,
        compute: F,
    ) -> Result<OptimizationResult, PipelineError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<OptimizationResult, PipelineError>> + Send + 'static,
    {
        let key = fingerprint.as_str();

        match self.store.get::<OptimizationResult>(key).await {
            Ok(Some(result)) => {
                debug!(fingerprint = key, "optimization cache hit");
                return Ok(result);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(fingerprint = key, error = %e, "cache lookup failed, computing directly");
            }
        }

        let shared = {
            let mut in_flight = self.in_flight.lock().unwrap();

            if let Some((_, existing)) = in_flight.get(key) {
                debug!(fingerprint = key, "joining in-flight computation");
                existing.clone()
            } else {
                let generation = self.generation.fetch_add(1, Ordering::Relaxed);
                let store = Arc::clone(&self.store);
                let map = Arc::clone(&self.in_flight);
                let ttl = self.ttl;
                let owned_key = key.to_string();
                let future = compute();

                // Spawned so completion, the store write and the map cleanup
                // happen regardless of whether any waiter is still polling.
                let task = tokio::spawn(async move {
                    let result = future.await;

                    if let Ok(value) = &result {
                        if let Err(e) = store.set(&owned_key, value, ttl).await {
                            warn!(fingerprint = %owned_key, error = %e, "failed to store optimization result");
                        }
                    }

                    // Remove our own entry, but only if it is still ours. A
                    // later compute for the same fingerprint may have
                    // replaced it already.
                    let mut in_flight = map.lock().unwrap();
                    if let Some((owner, _)) = in_flight.get(&owned_key) {
                        if *owner == generation {
                            in_flight.remove(&owned_key);
                        }
                    }

                    result
                });

                let shared: ComputeFuture = async move {
                    match task.await {
                        Ok(result) => result,
                        Err(e) => Err(PipelineError::internal(format!(
                            "optimization task failed: {}",
                            e
                        ))),
                    }
                }
                .boxed()
                .shared();

                in_flight.insert(key.to_string(), (generation, shared.clone()));
                shared
            }
        };

        shared.await
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
