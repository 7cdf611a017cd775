//! Response cache keyed on request prefix and model.
//!
//! [`ResponseCache`] stores backend responses so repeated requests to the
//! same model skip the backend. Entries expire after a fixed TTL and the
//! store is capped at a maximum size; when full, the oldest-inserted entry
//! is evicted before a new one goes in.
//!
//! # Key derivation
//!
//! The key is a SipHash of the model wire id plus the first
//! [`KEY_PREFIX_CHARS`] characters of the request text. Two long requests
//! sharing that prefix collide and will share a cached response. This is a
//! known approximation that trades hit-rate accuracy for cheap keys; changing
//! it changes observable hit rates, so it is kept as is.
//!
//! # Concurrency
//!
//! All state sits behind one mutex, held only for the map lookup or
//! mutation. The cache never calls the backend itself, and metrics are
//! emitted after the lock is released.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Deserialize;
use tokio::time::Instant;
use tracing::debug;

use crate::telemetry;
use crate::types::ModelId;

/// Number of leading characters of the request text that feed the key.
pub const KEY_PREFIX_CHARS: usize = 100;

/// Configuration for the response cache.
///
/// ```rust
/// # use heimdall::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_size(500)
///     .ttl(Duration::from_secs(600));
/// ```
///
/// Deserializes from `max_size` and `ttl_seconds`:
///
/// ```toml
/// [cache]
/// max_size = 500
/// ttl_seconds = 600
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawCacheConfig")]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 1,000.
    pub max_size: usize,
    /// Time-to-live for cached entries. Default: 1 hour.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 1_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl CacheConfig {
    /// Create a new config with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_size(mut self, n: usize) -> Self {
        self.max_size = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the time-to-live in (fractional) seconds.
    ///
    /// NaN and negative values are clamped to zero; use
    /// [`Config::validate`](crate::Config::validate) to reject them instead.
    /// Positive values too large for a `Duration` saturate to `Duration::MAX`.
    pub fn ttl_seconds(self, secs: f64) -> Self {
        let ttl = if secs.is_nan() || secs <= 0.0 {
            Duration::ZERO
        } else {
            Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
        };
        self.ttl(ttl)
    }
}

/// Wire shape of [`CacheConfig`]; the TTL is given in seconds.
#[derive(Deserialize)]
struct RawCacheConfig {
    #[serde(default = "default_max_size")]
    max_size: usize,
    #[serde(default = "default_ttl_seconds")]
    ttl_seconds: f64,
}

fn default_max_size() -> usize {
    CacheConfig::default().max_size
}

fn default_ttl_seconds() -> f64 {
    CacheConfig::default().ttl.as_secs_f64()
}

impl From<RawCacheConfig> for CacheConfig {
    fn from(raw: RawCacheConfig) -> Self {
        CacheConfig::new()
            .max_size(raw.max_size)
            .ttl_seconds(raw.ttl_seconds)
    }
}

/// Cache key derived from `(model, request prefix)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey(u64);

impl CacheKey {
    /// Derive the key for a request routed to `model`.
    ///
    /// Only the first [`KEY_PREFIX_CHARS`] characters of `text` are hashed.
    /// `DefaultHasher` is deterministic within a process lifetime, which is
    /// all an in-memory cache needs.
    pub fn derive(text: &str, model: ModelId) -> Self {
        let prefix = match text.char_indices().nth(KEY_PREFIX_CHARS) {
            Some((idx, _)) => &text[..idx],
            None => text,
        };
        let mut hasher = DefaultHasher::new();
        model.as_str().hash(&mut hasher);
        prefix.hash(&mut hasher);
        Self(hasher.finish())
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    /// Insertion counter; breaks `inserted_at` ties so eviction order is total.
    seq: u64,
}

struct CacheState<V> {
    entries: HashMap<CacheKey, CacheEntry<V>>,
    next_seq: u64,
}

/// In-memory TTL + capacity-bounded response cache.
///
/// `get` on an absent or expired key returns `None`; expired entries are
/// removed as a side effect. `set` always replaces, refreshing the insertion
/// time. See module docs for the key approximation.
pub struct ResponseCache<V> {
    config: CacheConfig,
    state: Mutex<CacheState<V>>,
}

impl<V: Clone> ResponseCache<V> {
    /// Create a new response cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            config: config.clone(),
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                next_seq: 0,
            }),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up the cached response for `text` routed to `model`.
    ///
    /// Returns `None` on a miss. Emits cache hit/miss metrics.
    pub fn get(&self, text: &str, model: ModelId) -> Option<V> {
        let key = CacheKey::derive(text, model);
        let now = Instant::now();

        let (value, expired) = {
            let mut state = self.lock();
            match state.entries.get(&key) {
                None => (None, false),
                Some(entry) if now.duration_since(entry.inserted_at) > self.config.ttl => {
                    state.entries.remove(&key);
                    (None, true)
                }
                Some(entry) => (Some(entry.value.clone()), false),
            }
        };

        if expired {
            debug!(model = %model, key = key.as_u64(), "cache entry expired");
            metrics::counter!(telemetry::CACHE_EXPIRATIONS_TOTAL).increment(1);
        }
        if value.is_some() {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "model" => model.as_str()).increment(1);
        } else {
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "model" => model.as_str())
                .increment(1);
        }
        value
    }

    /// Insert (or replace) the cached response for `text` routed to `model`.
    ///
    /// When the store is at capacity, the oldest-inserted entries are evicted
    /// until there is room, before the new entry goes in.
    pub fn set(&self, text: &str, model: ModelId, value: V) {
        let key = CacheKey::derive(text, model);
        let now = Instant::now();

        let evicted = {
            let mut state = self.lock();
            let mut evicted = 0u64;
            while !state.entries.is_empty() && state.entries.len() >= self.config.max_size {
                let Some(oldest) = state
                    .entries
                    .iter()
                    .min_by_key(|(_, e)| (e.inserted_at, e.seq))
                    .map(|(k, _)| *k)
                else {
                    break;
                };
                state.entries.remove(&oldest);
                evicted += 1;
            }

            let seq = state.next_seq;
            state.next_seq += 1;
            state.entries.insert(
                key,
                CacheEntry {
                    value,
                    inserted_at: now,
                    seq,
                },
            );
            evicted
        };

        if evicted > 0 {
            debug!(
                evicted,
                model = %model,
                key = key.as_u64(),
                "cache at capacity, evicted oldest entries"
            );
            metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL).increment(evicted);
        }
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let ttl = self.config.ttl;
        let removed = {
            let mut state = self.lock();
            let before = state.entries.len();
            state
                .entries
                .retain(|_, e| now.duration_since(e.inserted_at) <= ttl);
            before - state.entries.len()
        };
        if removed > 0 {
            metrics::counter!(telemetry::CACHE_EXPIRATIONS_TOTAL).increment(removed as u64);
        }
        removed
    }

    /// Number of entries currently stored, expired or not.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    // The state is a plain map; a panic elsewhere cannot leave it half-updated.
    fn lock(&self) -> MutexGuard<'_, CacheState<V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
