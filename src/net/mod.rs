//! Network setup.
//!
//! Plain TCP listeners are bound in `main`; TLS material for the optional
//! `listener.tls` section is loaded here.

pub mod tls;

pub use tls::load_tls_config;
