//! Exclusive-execution gate over a single async-aware lock

use crate::error::{GateError, GateResult};
use std::fmt;
use std::future::Future;
use std::time::Instant;
use tokio::sync::Mutex;

/// Waits longer than this are reported through `tracing::warn!`
const SLOW_ACQUIRE_MS: u128 = 250;

/// Serializes units of work submitted concurrently from threads and tasks
///
/// A `Gate` owns one exclusive lock. Work submitted through
/// [`blocking_run`](Gate::blocking_run) and [`run`](Gate::run) contends for
/// that same lock regardless of entry point, so at most one work item is
/// inside the critical section at any instant. Blocking callers park their
/// thread while waiting; suspending callers yield to their executor instead.
///
/// A gate is created once and shared (typically behind an
/// [`Arc`](std::sync::Arc)) by all of its callers for its entire lifetime.
/// No per-call state is retained between submissions.
///
/// There is no reentrancy: a work item that calls back into the same gate,
/// directly or indirectly, deadlocks. Waiters are eventually serviced but
/// no ordering between them is guaranteed.
pub struct Gate {
    /// The one exclusive lock shared by both entry points
    lock: Mutex<()>,

    /// Label carried on diagnostics output; never participates in exclusion
    name: Option<String>,
}

impl Gate {
    /// Create an unnamed gate
    pub fn new() -> Self {
        Self {
            lock: Mutex::new(()),
            name: None,
        }
    }

    /// Create a gate whose label appears in diagnostics output
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            lock: Mutex::new(()),
            name: Some(name.into()),
        }
    }

    /// The gate's label, if one was given
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Run `work` while holding the gate's lock, blocking the calling thread
    ///
    /// Blocks until every earlier work item has released the lock, invokes
    /// the closure, releases the lock, and returns the closure's value. The
    /// lock is released on every exit path: if the closure panics, the guard
    /// is dropped during unwinding and the panic continues to the caller
    /// unchanged. The gate stays usable afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::MissingWork`] immediately, without touching the
    /// lock, when `work` is `None`.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async execution context (see
    /// [`tokio::sync::Mutex::blocking_lock`]). Use [`run`](Gate::run) there
    /// instead.
    pub fn blocking_run<F, T>(&self, work: Option<F>) -> GateResult<T>
    where
        F: FnOnce() -> T,
    {
        let work = work.ok_or(GateError::MissingWork)?;

        let wait_started = Instant::now();
        let guard = self.lock.blocking_lock();
        self.trace_acquired(wait_started);

        let value = work();

        drop(guard);
        self.trace_released();
        Ok(value)
    }

    /// Run the future produced by `work` while holding the gate's lock
    ///
    /// Suspends until every earlier work item has released the lock, awaits
    /// the future to completion, releases the lock, and returns the future's
    /// output. No thread is occupied while waiting for the lock or while the
    /// future itself suspends; only its synchronous portions occupy one. The
    /// lock is released on every exit path: a panic inside the future drops
    /// the guard during unwinding and continues to the caller unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::MissingWork`] before any lock interaction when
    /// `work` is `None`.
    pub async fn run<F, Fut, T>(&self, work: Option<F>) -> GateResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let work = work.ok_or(GateError::MissingWork)?;

        let wait_started = Instant::now();
        let guard = self.lock.lock().await;
        self.trace_acquired(wait_started);

        let value = work().await;

        drop(guard);
        self.trace_released();
        Ok(value)
    }

    fn trace_acquired(&self, wait_started: Instant) {
        let waited = wait_started.elapsed().as_millis();
        if waited > SLOW_ACQUIRE_MS {
            tracing::warn!(
                gate = self.label(),
                waited_ms = waited as u64,
                "gate acquisition took too long"
            );
        }
        tracing::trace!(gate = self.label(), "gate acquired");
    }

    fn trace_released(&self) {
        tracing::trace!(gate = self.label(), "gate released");
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
