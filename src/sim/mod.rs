//! Deterministic headless host.
//!
//! [`SimBackend`] implements every collaborator trait against an in-memory page and
//! [`Harness`] wires it to a [`crate::Stage`], stepping time at a fixed frame rate.

mod backend;
mod harness;

pub use backend::{Launch, SimBackend, SimElement};
pub use harness::Harness;
