//! Telemetry metric name constants.
//!
//! Centralised metric names for heimdall operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! These are emitted alongside the in-process [`UsageRecorder`](crate::UsageRecorder),
//! which keeps its own snapshot-able aggregates.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `heimdall_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `model`: backend model wire id (e.g. "llama-3.1-8b-instant")
//! - `status`: outcome: "ok" or "error"
//! - `cached`: whether the response came from the cache: "true" or "false"
//! - `rule`: routing rule that fired (e.g. "web_search", "specialized")

/// Total requests recorded through the usage recorder.
///
/// Labels: `model`, `status` ("ok" | "error"), `cached` ("true" | "false").
pub const REQUESTS_TOTAL: &str = "heimdall_requests_total";

/// Request duration in seconds, including cache hits.
///
/// Labels: `model`.
pub const REQUEST_DURATION_SECONDS: &str = "heimdall_request_duration_seconds";

/// Total routing decisions made by the gateway.
///
/// Labels: `model`, `rule`.
pub const ROUTE_DECISIONS_TOTAL: &str = "heimdall_route_decisions_total";

/// Total response cache hits.
///
/// Labels: `model`.
pub const CACHE_HITS_TOTAL: &str = "heimdall_cache_hits_total";

/// Total response cache misses (absent or expired).
///
/// Labels: `model`.
pub const CACHE_MISSES_TOTAL: &str = "heimdall_cache_misses_total";

/// Total entries removed because they outlived the TTL.
pub const CACHE_EXPIRATIONS_TOTAL: &str = "heimdall_cache_expirations_total";

/// Total entries evicted to stay within capacity.
pub const CACHE_EVICTIONS_TOTAL: &str = "heimdall_cache_evictions_total";
