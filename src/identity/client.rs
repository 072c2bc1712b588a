//! Identity provider client.
//!
//! # Responsibilities
//! - Build hosted login, logout and verification URLs
//! - Exchange authorization codes and read the signed-in user's profile
//! - Obtain management API tokens (client-credentials grant)
//! - Look up user records and trigger verification emails
//!
//! # Design Decisions
//! - Management tokens are fetched per operation, not cached
//! - Upstream error bodies are logged here and never reach the browser

use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use url::Url;

use crate::config::IdentityConfig;
use crate::identity::types::{
    AuthorizationCodeGrant, ClientCredentialsGrant, IdentityError, IdentityResult, IdentityUser,
    TokenSet, VerificationJob,
};
use crate::observability::metrics;

const SERVICE: &str = "identity";

/// Client for the identity provider's hosted and management endpoints.
#[derive(Clone, Debug)]
pub struct IdentityClient {
    http: reqwest::Client,
    config: IdentityConfig,
    issuer: Url,
}

impl IdentityClient {
    /// Create a new identity client.
    pub fn new(config: &IdentityConfig) -> IdentityResult<Self> {
        let issuer = Url::parse(config.issuer_base_url.trim_end_matches('/'))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            config: config.clone(),
            issuer,
        })
    }

    /// Public base URL of the dashboard.
    pub fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn endpoint(&self, path: &str) -> IdentityResult<Url> {
        let base = self.issuer.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    /// Hosted login page URL. `state` is omitted for flows that never come
    /// back through the callback, such as the verification prompt.
    pub fn authorize_url(
        &self,
        state: Option<&str>,
        redirect_uri: &str,
        prompt: Option<&str>,
    ) -> IdentityResult<Url> {
        let mut url = self.endpoint("/authorize")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.config.client_id)
                .append_pair("redirect_uri", redirect_uri)
                .append_pair("scope", "openid profile email");
            if let Some(state) = state {
                query.append_pair("state", state);
            }
            if let Some(prompt) = prompt {
                query.append_pair("prompt", prompt);
            }
        }
        Ok(url)
    }

    /// Hosted logout URL that returns the browser to `return_to`.
    pub fn logout_url(&self, return_to: &str) -> IdentityResult<Url> {
        let mut url = self.endpoint("/v2/logout")?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("returnTo", return_to);
        Ok(url)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> IdentityResult<T> {
        let body = self.send(operation, request).await?;
        serde_json::from_str(&body).map_err(|source| IdentityError::Decode { operation, source })
    }

    async fn send(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> IdentityResult<String> {
        let start = Instant::now();
        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                metrics::record_upstream(SERVICE, "error", start);
                return Err(e.into());
            }
        };

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            metrics::record_upstream(SERVICE, "status", start);
            tracing::error!(operation, status = status.as_u16(), body = %body, "Identity provider error");
            return Err(IdentityError::Status {
                operation,
                status: status.as_u16(),
                body,
            });
        }

        metrics::record_upstream(SERVICE, "ok", start);
        Ok(body)
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> IdentityResult<TokenSet> {
        let grant = AuthorizationCodeGrant {
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
            code,
            redirect_uri,
            grant_type: "authorization_code",
        };
        let request = self.http.post(self.endpoint("/oauth/token")?).json(&grant);
        self.send_json("code exchange", request).await
    }

    /// Profile of the user owning `access_token`.
    pub async fn user_info(&self, access_token: &str) -> IdentityResult<IdentityUser> {
        let request = self
            .http
            .get(self.endpoint("/userinfo")?)
            .bearer_auth(access_token);
        self.send_json("userinfo", request).await
    }

    /// Management API token via the client-credentials grant.
    pub async fn management_token(&self) -> IdentityResult<String> {
        let grant = ClientCredentialsGrant {
            client_id: &self.config.m2m_client_id,
            client_secret: &self.config.m2m_client_secret,
            audience: self.endpoint("/api/v2/")?.to_string(),
            grant_type: "client_credentials",
        };
        let request = self.http.post(self.endpoint("/oauth/token")?).json(&grant);
        let tokens: TokenSet = self.send_json("management token", request).await?;
        Ok(tokens.access_token)
    }

    /// Management API user record.
    pub async fn user_record(&self, user_id: &str) -> IdentityResult<IdentityUser> {
        let token = self.management_token().await?;
        let mut url = self.endpoint("/api/v2/users")?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push(user_id);

        let request = self.http.get(url).bearer_auth(token);
        self.send_json("user lookup", request).await
    }

    /// Whether the provider marks the user's email as confirmed.
    pub async fn email_verified(&self, user_id: &str) -> IdentityResult<bool> {
        Ok(self.user_record(user_id).await?.email_verified)
    }

    /// Ask the provider to send another verification email.
    pub async fn send_verification_email(&self, user_id: &str) -> IdentityResult<()> {
        let token = self.management_token().await?;
        let request = self
            .http
            .post(self.endpoint("/api/v2/jobs/verification-email")?)
            .bearer_auth(token)
            .json(&VerificationJob { user_id });
        self.send("verification email", request).await?;
        Ok(())
    }
}
