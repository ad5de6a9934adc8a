//! Request middleware.
//!
//! Purpose: request lifecycle concerns that sit outside individual
//! handlers, namely correlation ids and the admin page gate.

pub mod admin_gate;
pub mod trace;

pub use admin_gate::AdminGate;
pub use trace::Trace;
