//! Client for the remote identity directory.
//!
//! The directory owns the user store: it validates passwords, issues
//! confirmation codes and mints identity tokens. This module only describes
//! the capability the gateway consumes, [`Directory`], plus the wire types
//! for each call. The production implementation lives in [`http`]; tests
//! substitute their own stub.

pub mod http;
pub use http::HttpDirectory;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use url::Url;

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[derive(Debug, Error)]
pub enum Error {
    /// The directory answered with a definite, classified rejection.
    #[error("directory rejected the request: {code}: {message}")]
    Api { code: String, message: String },

    /// Network, TLS or timeout fault talking to the directory.
    #[error("directory request failed")]
    Http(#[from] reqwest::Error),

    #[error("error parsing URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("error parsing URL: {0}")]
    InvalidUrl(String),

    #[error("unexpected response from directory: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserAttribute {
    pub name: String,
    pub value: String,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignUp {
    pub client_id: String,
    pub username: String,
    pub password: String,
    pub secret_hash: String,
    pub user_attributes: Vec<UserAttribute>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfirmSignUp {
    pub client_id: String,
    pub username: String,
    pub secret_hash: String,
    pub confirmation_code: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub enum AuthFlow {
    #[serde(rename = "USER_PASSWORD_AUTH")]
    UserPassword,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitiateAuth {
    pub client_id: String,
    pub auth_flow: AuthFlow,
    pub username: String,
    pub password: String,
    pub secret_hash: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdminConfirm {
    pub user_pool_id: String,
    pub username: String,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdminSetPassword {
    pub user_pool_id: String,
    pub username: String,
    pub password: String,
    pub permanent: bool,
}

/// Tokens minted by the directory on a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub id_token: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
}

// Requests carrying a plaintext password never expose it through Debug.
impl fmt::Debug for SignUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUp")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("secret_hash", &self.secret_hash)
            .field("user_attributes", &self.user_attributes)
            .finish()
    }
}

impl fmt::Debug for InitiateAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitiateAuth")
            .field("client_id", &self.client_id)
            .field("auth_flow", &self.auth_flow)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("secret_hash", &self.secret_hash)
            .finish()
    }
}

impl fmt::Debug for AdminSetPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSetPassword")
            .field("user_pool_id", &self.user_pool_id)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("permanent", &self.permanent)
            .finish()
    }
}

/// The capability the orchestrator consumes. Injected at construction so
/// tests can substitute a stub.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn sign_up(&self, request: SignUp) -> Result<(), Error>;

    async fn confirm_sign_up(&self, request: ConfirmSignUp) -> Result<(), Error>;

    async fn initiate_auth(&self, request: InitiateAuth) -> Result<AuthTokens, Error>;

    async fn admin_confirm_sign_up(&self, request: AdminConfirm) -> Result<(), Error>;

    async fn admin_set_password(&self, request: AdminSetPassword) -> Result<(), Error>;
}

/// # Errors
/// Returns an error if `url` cannot be parsed, has no host, or uses an unsupported scheme.
pub fn endpoint_url(url: &str, path: &str) -> Result<String, Error> {
    let url = Url::parse(url)?;

    let scheme = url.scheme();

    let host = url
        .host()
        .ok_or_else(|| Error::InvalidUrl("no host specified".to_string()))?
        .to_owned();

    let port = match url.port() {
        Some(p) => p,
        None => match scheme {
            "http" => 80,
            "https" => 443,
            _ => return Err(Error::InvalidUrl(format!("unsupported scheme {scheme}"))),
        },
    };

    Ok(format!("{scheme}://{host}:{port}{path}"))
}
