//! Identity provider types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Request could not be sent or the body could not be read.
    #[error("identity request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("identity provider returned {status} for {operation}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// The provider's response did not have the expected shape.
    #[error("could not decode {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Issuer or base URL cannot be used to build an endpoint.
    #[error("invalid identity URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// A user as returned by `/userinfo` or the management API.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IdentityUser {
    /// `sub` from userinfo, `user_id` from the management API.
    #[serde(alias = "user_id")]
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClientCredentialsGrant<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub audience: String,
    pub grant_type: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AuthorizationCodeGrant<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub code: &'a str,
    pub redirect_uri: &'a str,
    pub grant_type: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerificationJob<'a> {
    pub user_id: &'a str,
}
