//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! /api/auth/callback → store.rs create(user) → cookie.rs Set-Cookie
//! each request       → cookie.rs session_id(headers) → store.rs get(id)
//! sweeper.rs         → periodic purge_expired() until shutdown
//! ```
//!
//! # Design Decisions
//! - Sessions live in memory only; a restart signs everyone out
//! - The cookie carries an opaque UUID, never user data

pub mod cookie;
pub mod store;
pub mod sweeper;

pub use store::{Session, SessionStore, SessionUser};
pub use sweeper::run_sweeper;
