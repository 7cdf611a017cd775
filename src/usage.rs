//! Per-model usage accounting.
//!
//! [`UsageRecorder`] aggregates request counts, error counts, cache hit/miss
//! counts and raw latency samples per [`ModelId`], and produces
//! [`MetricsSnapshot`]s with mean/min/max/p95 latency and hit rates.
//!
//! Every `record` also emits the `metrics` facade counters and histogram
//! from [`telemetry`](crate::telemetry), so an installed exporter sees the
//! same traffic.
//!
//! # Concurrency
//!
//! One mutex guards the whole aggregate. `snapshot` copies the state under
//! the lock and computes statistics after releasing it, so sorting latency
//! series never blocks concurrent `record` calls. `reset` swaps in an empty
//! state under the same lock, so a snapshot sees either all of the prior
//! state or none of it.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::telemetry;
use crate::types::ModelId;

/// Sample count at or below which p95 is reported as the maximum.
const P95_MIN_SAMPLES: usize = 20;

/// Raw per-model aggregate.
#[derive(Debug, Clone, Default)]
struct ModelUsage {
    requests: u64,
    errors: u64,
    cache_hits: u64,
    cache_misses: u64,
    latencies: Vec<f64>,
}

#[derive(Debug, Clone, Default)]
struct UsageState {
    total_requests: u64,
    models: HashMap<ModelId, ModelUsage>,
}

/// Latency statistics for one model, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatencyStats {
    pub count: usize,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    /// Fixed-rank estimate: the maximum for ≤ 20 samples, otherwise the
    /// sample at ascending index `floor(0.95 × count)`.
    pub p95: f64,
}

impl LatencyStats {
    /// Compute statistics over `samples`. Returns `None` for an empty series.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let count = samples.len();
        let avg = samples.iter().sum::<f64>() / count as f64;
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let p95 = if count <= P95_MIN_SAMPLES {
            max
        } else {
            let mut sorted = samples.to_vec();
            sorted.sort_by(f64::total_cmp);
            // Integer arithmetic keeps the rank exactly floor(0.95 * count).
            sorted[count * 95 / 100]
        };

        Some(Self {
            count,
            avg,
            min,
            max,
            p95,
        })
    }
}

/// Aggregated metrics for one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelMetrics {
    pub requests: u64,
    pub errors: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// `None` when no latency has been recorded.
    pub latency: Option<LatencyStats>,
    /// `hits / (hits + misses)`, or `None` when neither has been recorded.
    pub hit_rate: Option<f64>,
}

impl ModelMetrics {
    /// Fraction of requests that failed, or `None` with no requests.
    pub fn error_rate(&self) -> Option<f64> {
        (self.requests > 0).then(|| self.errors as f64 / self.requests as f64)
    }
}

/// Point-in-time, read-only copy of all usage aggregates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub models: BTreeMap<ModelId, ModelMetrics>,
}

impl MetricsSnapshot {
    pub fn model(&self, model: ModelId) -> Option<&ModelMetrics> {
        self.models.get(&model)
    }
}

/// Concurrency-safe accumulator of per-model usage.
#[derive(Debug, Default)]
pub struct UsageRecorder {
    state: Mutex<UsageState>,
}

impl UsageRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one request attempt.
    ///
    /// Values are accepted as given; a negative or NaN `elapsed_secs` skews
    /// the aggregates but never panics.
    pub fn record(&self, model: ModelId, elapsed_secs: f64, success: bool, was_cached: bool) {
        {
            let mut state = self.lock();
            state.total_requests += 1;
            let usage = state.models.entry(model).or_default();
            usage.requests += 1;
            usage.latencies.push(elapsed_secs);
            if !success {
                usage.errors += 1;
            }
            if was_cached {
                usage.cache_hits += 1;
            } else {
                usage.cache_misses += 1;
            }
        }

        let status = if success { "ok" } else { "error" };
        let cached = if was_cached { "true" } else { "false" };
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "model" => model.as_str(),
            "status" => status,
            "cached" => cached,
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "model" => model.as_str(),
        )
        .record(elapsed_secs);
    }

    /// Consistent snapshot of all aggregates with derived statistics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = self.lock().clone();

        let models = state
            .models
            .into_iter()
            .map(|(model, usage)| {
                let lookups = usage.cache_hits + usage.cache_misses;
                let aggregate = ModelMetrics {
                    requests: usage.requests,
                    errors: usage.errors,
                    cache_hits: usage.cache_hits,
                    cache_misses: usage.cache_misses,
                    latency: LatencyStats::from_samples(&usage.latencies),
                    hit_rate: (lookups > 0).then(|| usage.cache_hits as f64 / lookups as f64),
                };
                (model, aggregate)
            })
            .collect();

        MetricsSnapshot {
            total_requests: state.total_requests,
            models,
        }
    }

    /// Clear every counter and latency series.
    pub fn reset(&self) {
        *self.lock() = UsageState::default();
    }

    pub fn total_requests(&self) -> u64 {
        self.lock().total_requests
    }

    // Counters are updated without intermediate invariants, so a poisoned
    // lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, UsageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
