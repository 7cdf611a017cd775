//! Heimdall - model routing, response caching and usage metrics for LLM gateways
//!
//! This crate answers two questions for every request headed to a remote
//! model backend: which model variant should serve it, and can it be served
//! from a previously computed response. It also records per-model usage for
//! operational visibility.
//!
//! - [`Router`]: stateless lexical classifier from request text and tools to
//!   a [`ModelId`].
//! - [`ResponseCache`]: TTL + capacity-bounded cache keyed on request prefix
//!   and model.
//! - [`UsageRecorder`]: per-model counters, latency percentiles and cache hit
//!   rates.
//! - [`Gateway`]: optional composition of the three around a [`ModelBackend`].
//!
//! # Example
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use heimdall::{BackendRequest, BackendResponse, Heimdall, ModelBackend};
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl ModelBackend for Echo {
//!     async fn complete(&self, request: &BackendRequest) -> heimdall::Result<BackendResponse> {
//!         Ok(BackendResponse::new(request.text.clone(), request.model))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> heimdall::Result<()> {
//!     let gateway = Heimdall::builder().build(Echo);
//!
//!     let reply = gateway.handle("Search for the latest AI news today", &[]).await?;
//!     println!("{} (cached: {})", reply.model, reply.cached);
//!
//!     let snapshot = gateway.metrics_snapshot();
//!     println!("total requests: {}", snapshot.total_requests);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod routing;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod usage;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheKey, ResponseCache};
pub use config::Config;
pub use error::{HeimdallError, Result};
pub use gateway::{Gateway, Heimdall, HeimdallBuilder};
pub use routing::{Domain, DomainMatch, IndicatorSet, RouteDecision, RouteRule, Router};
pub use traits::ModelBackend;
pub use types::{BackendRequest, BackendResponse, GatewayReply, ModelId, ToolDescriptor};
pub use usage::{LatencyStats, MetricsSnapshot, ModelMetrics, UsageRecorder};
