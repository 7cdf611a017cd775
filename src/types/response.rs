//! Backend request and response types

use super::model::ModelId;
use super::tool::ToolDescriptor;
use serde::{Deserialize, Serialize};

/// A request forwarded to the backend after routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendRequest {
    pub text: String,
    pub model: ModelId,
    #[serde(default)]
    pub tools: Vec<ToolDescriptor>,
}

/// Response payload produced by the backend; this is what the gateway caches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendResponse {
    pub content: String,
    pub model: ModelId,
}

impl BackendResponse {
    pub fn new(content: impl Into<String>, model: ModelId) -> Self {
        Self {
            content: content.into(),
            model,
        }
    }
}

/// Reply returned by [`Gateway::handle`](crate::Gateway::handle).
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayReply {
    pub response: BackendResponse,
    /// Model chosen by the router for this request.
    pub model: ModelId,
    /// Whether the response was served from the cache.
    pub cached: bool,
}
