//! HTTP implementation of the [`Directory`] capability.
//!
//! One JSON POST per operation. Non-success statuses carry a structured
//! error body (`{"__type": "...", "message": "..."}`) which is decoded into
//! [`Error::Api`] so callers can classify rejections without string matching
//! on formatted text. Privileged admin calls carry the service token; the
//! user-facing calls authenticate through the request body alone.

use crate::directory::{
    endpoint_url, AdminConfirm, AdminSetPassword, AuthTokens, ConfirmSignUp, Directory, Error,
    InitiateAuth, SignUp, APP_USER_AGENT,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, instrument};

pub struct HttpDirectory {
    client: Client,
    base_url: String,
    service_token: SecretString,
}

fn get_required_str<'a>(json_response: &'a Value, path: &[&str]) -> Option<&'a str> {
    let mut current = json_response;
    for key in path {
        current = current.get(*key)?;
    }
    current.as_str()
}

fn api_error(status: StatusCode, json_response: &Value) -> Error {
    // The directory namespaces error codes, e.g. "service#NotAuthorizedException"
    let code = json_response
        .get("__type")
        .and_then(Value::as_str)
        .and_then(|t| t.rsplit('#').next())
        .unwrap_or("Unknown")
        .to_string();

    let message = json_response
        .get("message")
        .or_else(|| json_response.get("Message"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    error!("directory call failed: {} - {}: {}", status, code, message);

    Error::Api { code, message }
}

impl HttpDirectory {
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, service_token: SecretString) -> Result<Self, Error> {
        let client = Client::builder().user_agent(APP_USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            service_token,
        })
    }

    async fn post<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        privileged: bool,
    ) -> Result<Value, Error> {
        let url = endpoint_url(&self.base_url, path)?;

        debug!("endpoint URL: {}", url);

        let mut request = self.client.post(&url).json(body);

        if privileged {
            request = request.bearer_auth(self.service_token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let json_response: Value = response.json().await?;

            return Err(api_error(status, &json_response));
        }

        // Some operations answer 200 with an empty body
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| Error::Decode(e.to_string()))
    }
}

#[async_trait]
impl Directory for HttpDirectory {
    #[instrument(skip_all, fields(username = %request.username))]
    async fn sign_up(&self, request: SignUp) -> Result<(), Error> {
        self.post("/signup", &request, false).await?;

        Ok(())
    }

    #[instrument(skip_all, fields(username = %request.username))]
    async fn confirm_sign_up(&self, request: ConfirmSignUp) -> Result<(), Error> {
        self.post("/confirm-signup", &request, false).await?;

        Ok(())
    }

    #[instrument(skip_all, fields(username = %request.username))]
    async fn initiate_auth(&self, request: InitiateAuth) -> Result<AuthTokens, Error> {
        let json_response = self.post("/auth", &request, false).await?;

        let id_token = get_required_str(&json_response, &["AuthenticationResult", "IdToken"])
            .ok_or_else(|| {
                error!("no IdToken in authentication result");
                Error::Decode("no IdToken in authentication result".to_string())
            })?
            .to_string();

        Ok(AuthTokens {
            id_token,
            access_token: get_required_str(&json_response, &["AuthenticationResult", "AccessToken"])
                .map(ToString::to_string),
            refresh_token: get_required_str(
                &json_response,
                &["AuthenticationResult", "RefreshToken"],
            )
            .map(ToString::to_string),
            expires_in: json_response
                .get("AuthenticationResult")
                .and_then(|v| v.get("ExpiresIn"))
                .and_then(Value::as_u64),
        })
    }

    #[instrument(skip_all, fields(username = %request.username))]
    async fn admin_confirm_sign_up(&self, request: AdminConfirm) -> Result<(), Error> {
        self.post("/admin/confirm-signup", &request, true).await?;

        Ok(())
    }

    #[instrument(skip_all, fields(username = %request.username))]
    async fn admin_set_password(&self, request: AdminSetPassword) -> Result<(), Error> {
        self.post("/admin/set-password", &request, true).await?;

        Ok(())
    }
}
