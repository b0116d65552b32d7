// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod basic;
pub mod excluded;
pub mod password;
pub mod persistent_session;
pub mod request;
pub mod session;
pub mod strategy;
pub mod token_generator;
mod service;
mod service_impl;

pub use basic::{BasicAuth, Credential};
pub use excluded::{require_auth, ExcludedPaths};
pub use password::PasswordHasher;
pub use persistent_session::FileSessionStore;
pub use request::AuthRequest;
pub use service::AuthService;
pub use service_impl::DefaultAuth;
pub use session::{MemorySessionStore, SessionRecord, SessionStore};
pub use strategy::{AuthStrategy, Scheme, SessionAuth};
