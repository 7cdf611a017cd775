//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use heimdall::telemetry;
use heimdall::{
    BackendRequest, BackendResponse, CacheConfig, Heimdall, HeimdallError, ModelBackend, ModelId,
    ResponseCache, Result, UsageRecorder,
};

// ============================================================================
// Mock backend
// ============================================================================

struct ToggleBackend {
    fail: AtomicBool,
}

#[async_trait]
impl ModelBackend for ToggleBackend {
    async fn complete(&self, request: &BackendRequest) -> Result<BackendResponse> {
        if self.fail.load(Ordering::SeqCst) {
            Err(HeimdallError::Backend("unavailable".into()))
        } else {
            Ok(BackendResponse::new("ok", request.model))
        }
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    counter_where(snapshot, name, |_| true)
}

/// Sum counter values for `name` carrying label `label = value`.
fn counter_with_label(snapshot: &SnapshotVec, name: &str, label: &str, value: &str) -> u64 {
    counter_where(snapshot, name, |key| {
        key.key()
            .labels()
            .any(|l| l.key() == label && l.value() == value)
    })
}

fn counter_where(
    snapshot: &SnapshotVec,
    name: &str,
    filter: impl Fn(&metrics_util::CompositeKey) -> bool,
) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter && key.key().name() == name && filter(key)
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

// ============================================================================
// Usage recorder
// ============================================================================

#[test]
fn record_emits_request_counter_and_histogram() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let usage = UsageRecorder::new();
        usage.record(ModelId::Fast, 0.2, true, false);
        usage.record(ModelId::Fast, 0.4, false, false);
        usage.record(ModelId::General, 0.01, true, true);
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 3);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "status", "error"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "cached", "true"),
        1
    );
    assert_eq!(
        counter_with_label(
            &snapshot,
            telemetry::REQUESTS_TOTAL,
            "model",
            "llama-3.1-8b-instant"
        ),
        2
    );
    assert!(has_histogram(&snapshot, telemetry::REQUEST_DURATION_SECONDS));
}

// ============================================================================
// Response cache
// ============================================================================

#[test]
fn cache_lookups_emit_hit_and_miss_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let cache = ResponseCache::new(&CacheConfig::default());
        assert!(cache.get("hello", ModelId::Fast).is_none());
        cache.set("hello", ModelId::Fast, 1u32);
        assert!(cache.get("hello", ModelId::Fast).is_some());
        assert!(cache.get("hello", ModelId::Fast).is_some());
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 2);
}

#[test]
fn cache_eviction_emits_counter() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let cache = ResponseCache::new(&CacheConfig::new().max_size(2));
        cache.set("a", ModelId::Fast, 1u32);
        cache.set("b", ModelId::Fast, 2u32);
        cache.set("c", ModelId::Fast, 3u32);
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_EVICTIONS_TOTAL), 1);
}

// ============================================================================
// Gateway
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn gateway_records_route_and_request_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let gateway = Heimdall::builder().build(ToggleBackend {
                    fail: AtomicBool::new(false),
                });
                gateway.handle("What is 150 * 20?", &[]).await.unwrap();
                gateway.handle("What is 150 * 20?", &[]).await.unwrap();
                gateway.backend().fail.store(true, Ordering::SeqCst);
                assert!(gateway.handle("Explain tides", &[]).await.is_err());
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::ROUTE_DECISIONS_TOTAL), 3);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::ROUTE_DECISIONS_TOTAL, "rule", "complex"),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 3);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "status", "error"),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 1);
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let gateway = Heimdall::builder().build(Arc::new(ToggleBackend {
        fail: AtomicBool::new(false),
    }));
    gateway.handle("hello", &[]).await.unwrap();
}
