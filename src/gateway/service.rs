//! Gateway - composes router, response cache and usage recorder around a backend

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{instrument, warn};

use crate::cache::ResponseCache;
use crate::routing::{RouteDecision, Router};
use crate::telemetry;
use crate::usage::{MetricsSnapshot, UsageRecorder};
use crate::{
    BackendRequest, BackendResponse, GatewayReply, HeimdallError, ModelBackend, Result,
    ToolDescriptor,
};

/// Request flow around a [`ModelBackend`]:
///
/// 1. [`Router::decide`] picks the model.
/// 2. [`ResponseCache::get`] is consulted; a hit is returned directly.
/// 3. On a miss the backend is called (bounded by the optional timeout).
/// 4. A successful response is stored with [`ResponseCache::set`].
/// 5. [`UsageRecorder::record`] runs after every attempt, hit, success or failure.
///
/// Built with [`Heimdall::builder()`](crate::Heimdall::builder).
pub struct Gateway<B> {
    pub(super) router: Router,
    pub(super) cache: Arc<ResponseCache<BackendResponse>>,
    pub(super) usage: Arc<UsageRecorder>,
    pub(super) backend: B,
    pub(super) timeout: Option<Duration>,
}

impl<B: ModelBackend> Gateway<B> {
    /// Route, serve from cache when possible, otherwise call the backend.
    ///
    /// Backend errors and timeouts are recorded as failed attempts and
    /// returned; nothing is cached for them.
    #[instrument(skip(self, text, tools), fields(tools = tools.len()))]
    pub async fn handle(&self, text: &str, tools: &[ToolDescriptor]) -> Result<GatewayReply> {
        let start = Instant::now();
        let RouteDecision { model, rule } = self.router.decide(text, tools);
        metrics::counter!(telemetry::ROUTE_DECISIONS_TOTAL,
            "model" => model.as_str(),
            "rule" => rule.as_str(),
        )
        .increment(1);

        if let Some(response) = self.cache.get(text, model) {
            self.usage
                .record(model, start.elapsed().as_secs_f64(), true, true);
            return Ok(GatewayReply {
                response,
                model,
                cached: true,
            });
        }

        let request = BackendRequest {
            text: text.to_string(),
            model,
            tools: tools.to_vec(),
        };
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.backend.complete(&request))
                .await
                .unwrap_or(Err(HeimdallError::Timeout(limit))),
            None => self.backend.complete(&request).await,
        };
        let elapsed = start.elapsed().as_secs_f64();

        match outcome {
            Ok(response) => {
                self.cache.set(text, model, response.clone());
                self.usage.record(model, elapsed, true, false);
                Ok(GatewayReply {
                    response,
                    model,
                    cached: false,
                })
            }
            Err(e) => {
                warn!(model = %model, error = %e, "backend call failed");
                self.usage.record(model, elapsed, false, false);
                Err(e)
            }
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn cache(&self) -> &Arc<ResponseCache<BackendResponse>> {
        &self.cache
    }

    pub fn usage(&self) -> &Arc<UsageRecorder> {
        &self.usage
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Snapshot of the usage recorder.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.usage.snapshot()
    }

    /// Clear the usage recorder.
    pub fn reset_metrics(&self) {
        self.usage.reset();
    }
}
