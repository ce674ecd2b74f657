//! Fixed-window rate limiting over an injectable counter store.
//!
//! The limiter never touches a global map; it is handed a
//! [`RateLimitStore`], which can be the in-process
//! [`InMemoryRateLimitStore`] or a shared counter service in
//! multi-process deployments.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::RateLimitConfig;
use crate::error::ValidationError;

/// Request count for one identifier since `started_at`. Each window
/// keeps the length it was opened with, so windows of different
/// lengths can share a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    pub count: u32,
    pub started_at: Instant,
    pub window: Duration,
}

impl RateWindow {
    pub fn open(now: Instant, window: Duration) -> Self {
        Self {
            count: 1,
            started_at: now,
            window,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.window
    }

    /// This window with one more request, or a fresh one of length
    /// `window` once expired.
    pub fn next(current: Option<Self>, now: Instant, window: Duration) -> Self {
        match current {
            Some(w) if !w.is_expired(now) => Self {
                count: w.count.saturating_add(1),
                ..w
            },
            _ => Self::open(now, window),
        }
    }
}

pub trait RateLimitStore: Send + Sync {
    fn get(&self, key: &str) -> Option<RateWindow>;

    fn set(&self, key: &str, window: RateWindow);

    /// Count one request for `key` at `now` and return the updated
    /// window.
    ///
    /// The default is a read followed by a write, so concurrent callers
    /// on the same key may lose updates. Stores that can increment
    /// atomically should override it.
    fn increment(&self, key: &str, now: Instant, window: Duration) -> RateWindow {
        let next = RateWindow::next(self.get(key), now, window);
        self.set(key, next);
        next
    }

    fn remove(&self, key: &str);

    /// Drop windows that have expired at `now` and return how many were
    /// removed. Stores whose entries expire on their own keep the
    /// default.
    fn purge_expired(&self, _now: Instant) -> usize {
        0
    }
}

/// Number of tracked identifiers above which `increment` sweeps out
/// expired windows before inserting.
const SWEEP_THRESHOLD: usize = 4096;

/// Single-process store. Every key shares one mutex, held only for the
/// map update.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    windows: Mutex<HashMap<String, RateWindow>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn windows(&self) -> MutexGuard<'_, HashMap<String, RateWindow>> {
        self.windows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.windows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sweep(windows: &mut HashMap<String, RateWindow>, now: Instant) -> usize {
    let before = windows.len();
    windows.retain(|_, w| !w.is_expired(now));
    let purged = before - windows.len();
    if purged > 0 {
        debug!(purged, "expired rate-limit windows removed");
    }
    purged
}

impl RateLimitStore for InMemoryRateLimitStore {
    fn get(&self, key: &str) -> Option<RateWindow> {
        self.windows().get(key).copied()
    }

    fn set(&self, key: &str, window: RateWindow) {
        self.windows().insert(key.to_owned(), window);
    }

    fn increment(&self, key: &str, now: Instant, window: Duration) -> RateWindow {
        let mut windows = self.windows();
        if windows.len() >= SWEEP_THRESHOLD && !windows.contains_key(key) {
            sweep(&mut windows, now);
        }
        let next = RateWindow::next(windows.get(key).copied(), now, window);
        windows.insert(key.to_owned(), next);
        next
    }

    fn remove(&self, key: &str) {
        self.windows().remove(key);
    }

    fn purge_expired(&self, now: Instant) -> usize {
        sweep(&mut self.windows(), now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
}

pub struct RateLimiter<S = InMemoryRateLimitStore> {
    store: S,
    config: RateLimitConfig,
}

impl RateLimiter<InMemoryRateLimitStore> {
    pub fn in_memory(config: RateLimitConfig) -> Result<Self, ValidationError> {
        Self::new(InMemoryRateLimitStore::new(), config)
    }
}

impl<S: RateLimitStore> RateLimiter<S> {
    pub fn new(store: S, config: RateLimitConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Count a request from `identifier` against the configured limit.
    pub fn check(&self, identifier: &str) -> RateLimitDecision {
        self.check_at(identifier, Instant::now())
    }

    pub fn check_at(&self, identifier: &str, now: Instant) -> RateLimitDecision {
        self.check_with(identifier, &self.config, now)
    }

    /// Count a request against an explicit limit and window.
    ///
    /// The first request of a window is allowed with `limit - 1`
    /// remaining. Requests past `limit` are denied with zero remaining
    /// until the window expires. A limit of zero denies everything.
    pub fn check_with(
        &self,
        identifier: &str,
        config: &RateLimitConfig,
        now: Instant,
    ) -> RateLimitDecision {
        let window = self.store.increment(identifier, now, config.window);
        if window.count <= config.limit {
            RateLimitDecision {
                allowed: true,
                remaining: config.limit - window.count,
            }
        } else {
            warn!(identifier, limit = config.limit, "rate limit exceeded");
            RateLimitDecision {
                allowed: false,
                remaining: 0,
            }
        }
    }

    /// [`Self::check`] as a result: remaining requests, or
    /// [`ValidationError::RateLimited`].
    pub fn require(&self, identifier: &str) -> Result<u32, ValidationError> {
        let decision = self.check(identifier);
        if decision.allowed {
            Ok(decision.remaining)
        } else {
            Err(ValidationError::RateLimited {
                identifier: identifier.to_owned(),
            })
        }
    }

    /// Forget the window for `identifier`, e.g. after a successful login.
    pub fn reset(&self, identifier: &str) {
        self.store.remove(identifier);
    }

    /// Drop every window that has expired at `now`.
    pub fn purge_expired(&self, now: Instant) -> usize {
        self.store.purge_expired(now)
    }
}
