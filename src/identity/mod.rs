//! Identity provider integration.
//!
//! # Data Flow
//! ```text
//! login:    /api/auth/login → authorize_url → provider → /api/auth/callback
//!           → exchange_code → user_info → session store
//! verify:   gate / verify-email route → management_token → user_record
//! resend:   resend-verification route → management_token → verification job
//! ```

pub mod client;
pub mod types;

pub use client::IdentityClient;
pub use types::{IdentityError, IdentityResult, IdentityUser, TokenSet};
