//! Request middleware.
//!
//! Only tracing lives here today: every request gets a correlation
//! identifier that flows into logs and error payloads.

pub mod trace;

pub use trace::Trace;
