// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const SESSION_CREATED: &str = "session.created";
pub const SESSION_DESTROYED: &str = "session.destroyed";
pub const SESSION_EXPIRED: &str = "session.expired";
pub const SESSION_ACTIVE: &str = "session.active";
pub const GATE_MISSING_CREDENTIALS: &str = "gate.rejected.missing_credentials";
pub const GATE_INVALID_CREDENTIALS: &str = "gate.rejected.invalid_credentials";
pub const USER_REGISTERED: &str = "user.registered";
pub const LOGIN_FAILED: &str = "login.failed";
