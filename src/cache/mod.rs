//! Caching subsystem.
//!
//! - [`response::ResponseCache`]: TTL + capacity-bounded store of backend
//!   responses, keyed on `(model, request prefix)`. Owned by whatever composes
//!   the [`Gateway`](crate::Gateway); there is no process-wide instance.

pub mod response;

pub use response::{CacheConfig, CacheKey, KEY_PREFIX_CHARS, ResponseCache};
