//! Core ModelBackend trait

use async_trait::async_trait;

use crate::{BackendRequest, BackendResponse, Result};

/// The remote model backend, as seen by the [`Gateway`](crate::Gateway).
///
/// Implementations wrap whatever API client talks to the actual models.
/// Heimdall treats the backend as opaque: a request goes in, a response or
/// an error comes out, and the elapsed time is measured around the call.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Run one completion on `request.model`.
    async fn complete(&self, request: &BackendRequest) -> Result<BackendResponse>;
}

#[async_trait]
impl<T: ModelBackend + ?Sized> ModelBackend for std::sync::Arc<T> {
    async fn complete(&self, request: &BackendRequest) -> Result<BackendResponse> {
        (**self).complete(request).await
    }
}
