//! Shared selector for continuity across features.
//!
//! The application state owns one [`SharedSelector`] and hands out references
//! to it. The selector inside is built on first use, can be reset in place,
//! and is dropped on teardown so the next access starts fresh.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::random::RandomSource;
use crate::selector::AdaptiveSelector;

type Factory<C, R> = Box<dyn Fn() -> AdaptiveSelector<C, R> + Send + Sync>;

/// Lazily initialised, lock-protected selector.
pub struct SharedSelector<C = SystemClock, R = ChaCha8Rng> {
    inner: Mutex<Option<AdaptiveSelector<C, R>>>,
    factory: Factory<C, R>,
}

impl SharedSelector {
    pub fn new() -> Self {
        Self::with_factory(AdaptiveSelector::new)
    }
}

impl Default for SharedSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock, R: RandomSource> SharedSelector<C, R> {
    /// Holder that builds its selector with `factory` on first access.
    pub fn with_factory<F>(factory: F) -> Self
    where
        F: Fn() -> AdaptiveSelector<C, R> + Send + Sync + 'static,
    {
        Self {
            inner: Mutex::new(None),
            factory: Box::new(factory),
        }
    }

    /// Run `f` against the selector, building it first if needed.
    pub fn with<T>(&self, f: impl FnOnce(&mut AdaptiveSelector<C, R>) -> T) -> T {
        let mut guard = self.lock();
        let selector = guard.get_or_insert_with(|| {
            debug!("initialising shared selector");
            (self.factory)()
        });
        f(selector)
    }

    /// Clear records, keeping the instance. No-op before first access.
    pub fn reset(&self) {
        if let Some(selector) = self.lock().as_mut() {
            selector.reset();
        }
    }

    /// Drop the instance; the next access builds a new one.
    pub fn teardown(&self) {
        if self.lock().take().is_some() {
            debug!("shared selector torn down");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().is_some()
    }

    // Every mutation leaves the selector consistent, so a poisoned lock is
    // still safe to use.
    fn lock(&self) -> MutexGuard<'_, Option<AdaptiveSelector<C, R>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
