//! Turnstile: an exclusive-execution gate
//!
//! This crate provides a single synchronization primitive, the [`Gate`],
//! which serializes units of work submitted concurrently from threads and
//! async tasks:
//! - [`Gate::blocking_run`] parks the calling thread until its turn
//! - [`Gate::run`] suspends the calling task without occupying a thread
//!
//! Both entry points contend for the same lock, so at most one work item —
//! of any shape — is ever inside the critical section.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod error;
mod gate;

pub use error::{GateError, GateResult};
pub use gate::Gate;
