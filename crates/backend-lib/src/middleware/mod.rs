// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the `sessiongate` API.

pub mod gate;

pub use gate::{auth_gate, evaluate, CurrentUser, GateDecision, Rejection};
