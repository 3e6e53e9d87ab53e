//! Minimal host-scheduler harness.
//!
//! The engine itself is driven by an external simulation scheduler; this
//! module provides a small stand-in for demos and integration tests:
//! a [`Signal`] produces the per-step input vector, and a [`Scheduler`]
//! delivers setup followed by serialized update calls, the way the real
//! host would.

pub mod scheduler;
pub mod signal;

pub use scheduler::Scheduler;
pub use signal::Signal;
