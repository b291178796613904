//! Infrastructure Layer
//!
//! Cross-cutting building blocks used by the adapters.

pub mod backoff;
pub mod clock;

pub use backoff::{BackoffState, BackoffWindow};
pub use clock::{ManualClock, MonotonicClock};
