//! Authentication orchestration.
//!
//! [`AuthGateway`] sequences the calls against the remote identity directory:
//! one call for register, confirm and login, two strictly ordered calls for
//! the password reset. It holds only immutable configuration plus the
//! injected [`Directory`] capability, so operations run concurrently without
//! synchronization. Every directory failure is normalized into an
//! [`AuthError`] kind and re-raised; nothing is retried or swallowed here.

pub mod error;
pub mod secret_hash;

pub use error::AuthError;
pub use secret_hash::derive_secret_hash;

use crate::cli::globals::GlobalArgs;
use crate::directory::{
    AdminConfirm, AdminSetPassword, AuthFlow, ConfirmSignUp, Directory, InitiateAuth, SignUp,
    UserAttribute,
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::instrument;

pub struct AuthGateway {
    directory: Arc<dyn Directory>,
    client_id: String,
    client_secret: SecretString,
    pool_id: String,
}

impl AuthGateway {
    #[must_use]
    pub fn new(directory: Arc<dyn Directory>, globals: &GlobalArgs) -> Self {
        Self {
            directory,
            client_id: globals.client_id.clone(),
            client_secret: globals.client_secret.clone(),
            pool_id: globals.pool_id.clone(),
        }
    }

    // Recomputed on every call, never cached: recomputation is cheap and a
    // cached hash would go stale on client-secret rotation.
    fn secret_hash(&self, username: &str) -> String {
        derive_secret_hash(
            self.client_secret.expose_secret(),
            &self.client_id,
            username,
        )
    }

    /// Register a new user with the directory.
    ///
    /// # Errors
    /// Any directory-side failure (duplicate user, password policy, transient
    /// fault) surfaces as an [`AuthError`], never as `Ok(false)`.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn register(&self, email: &str, password: &str) -> Result<bool, AuthError> {
        let request = SignUp {
            client_id: self.client_id.clone(),
            username: email.to_string(),
            password: password.to_string(),
            secret_hash: self.secret_hash(email),
            user_attributes: vec![UserAttribute {
                name: "email".to_string(),
                value: email.to_string(),
            }],
        };

        self.directory
            .sign_up(request)
            .await
            .map_err(AuthError::from_directory)?;

        Ok(true)
    }

    /// Confirm a registration with the code the directory mailed to the user.
    ///
    /// # Errors
    /// An expired or incorrect code, or an unknown user, surfaces as an
    /// [`AuthError`] so callers can distinguish a definite rejection from a
    /// transport fault.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn confirm_registration(&self, email: &str, code: &str) -> Result<bool, AuthError> {
        let request = ConfirmSignUp {
            client_id: self.client_id.clone(),
            username: email.to_string(),
            secret_hash: self.secret_hash(email),
            confirmation_code: code.to_string(),
        };

        self.directory
            .confirm_sign_up(request)
            .await
            .map_err(AuthError::from_directory)?;

        Ok(true)
    }

    /// Confirm a registration administratively, without a code.
    ///
    /// Alternate to [`AuthGateway::confirm_registration`]; the code-based
    /// flow is the production contract.
    ///
    /// # Errors
    /// Directory-side failures surface as an [`AuthError`].
    #[instrument(skip_all, fields(email = %email))]
    pub async fn admin_confirm_registration(&self, email: &str) -> Result<bool, AuthError> {
        let request = AdminConfirm {
            user_pool_id: self.pool_id.clone(),
            username: email.to_string(),
        };

        self.directory
            .admin_confirm_sign_up(request)
            .await
            .map_err(AuthError::from_directory)?;

        Ok(true)
    }

    /// Authenticate the user and return the identity token minted by the
    /// directory.
    ///
    /// # Errors
    /// [`AuthError::UserNotConfirmed`] when the user exists but has not
    /// completed confirmation, [`AuthError::NotAuthorized`] on bad
    /// credentials; the two are never collapsed.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let request = InitiateAuth {
            client_id: self.client_id.clone(),
            auth_flow: AuthFlow::UserPassword,
            username: email.to_string(),
            password: password.to_string(),
            secret_hash: self.secret_hash(email),
        };

        let tokens = self
            .directory
            .initiate_auth(request)
            .await
            .map_err(AuthError::from_directory)?;

        Ok(tokens.id_token)
    }

    /// Change the user's password, proving possession of the account first.
    ///
    /// Two strictly ordered steps: re-authenticate with the current password,
    /// then overwrite the credential through the privileged admin call with
    /// `permanent: true`. The overwrite never starts before the
    /// re-authentication succeeded. Not transactional: a step-2 failure
    /// leaves the old password in place and the whole operation can be
    /// resubmitted.
    ///
    /// # Errors
    /// The first failing step aborts the operation with its normalized
    /// [`AuthError`].
    #[instrument(skip_all, fields(email = %email))]
    pub async fn reset_password(
        &self,
        email: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<bool, AuthError> {
        let reauth = InitiateAuth {
            client_id: self.client_id.clone(),
            auth_flow: AuthFlow::UserPassword,
            username: email.to_string(),
            password: old_password.to_string(),
            secret_hash: self.secret_hash(email),
        };

        self.directory
            .initiate_auth(reauth)
            .await
            .map_err(AuthError::from_directory)?;

        let overwrite = AdminSetPassword {
            user_pool_id: self.pool_id.clone(),
            username: email.to_string(),
            password: new_password.to_string(),
            permanent: true,
        };

        self.directory
            .admin_set_password(overwrite)
            .await
            .map_err(AuthError::from_directory)?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{AuthTokens, Error};
    use std::sync::Mutex;

    /// Stub directory with per-operation programmed rejections, recording the
    /// order of calls and the last privileged password overwrite.
    #[derive(Default)]
    struct StubDirectory {
        reject_sign_up: Option<&'static str>,
        reject_confirm: Option<&'static str>,
        reject_auth: Option<&'static str>,
        reject_admin_confirm: Option<&'static str>,
        reject_set_password: Option<&'static str>,
        calls: Mutex<Vec<&'static str>>,
        last_auth: Mutex<Option<InitiateAuth>>,
        last_set_password: Mutex<Option<AdminSetPassword>>,
    }

    fn api(code: &str) -> Error {
        Error::Api {
            code: code.to_string(),
            message: "stubbed".to_string(),
        }
    }

    #[async_trait::async_trait]
    impl Directory for StubDirectory {
        async fn sign_up(&self, _request: SignUp) -> Result<(), Error> {
            self.calls.lock().unwrap().push("sign_up");
            self.reject_sign_up.map_or(Ok(()), |code| Err(api(code)))
        }

        async fn confirm_sign_up(&self, _request: ConfirmSignUp) -> Result<(), Error> {
            self.calls.lock().unwrap().push("confirm_sign_up");
            self.reject_confirm.map_or(Ok(()), |code| Err(api(code)))
        }

        async fn initiate_auth(&self, request: InitiateAuth) -> Result<AuthTokens, Error> {
            self.calls.lock().unwrap().push("initiate_auth");
            *self.last_auth.lock().unwrap() = Some(request);

            match self.reject_auth {
                Some(code) => Err(api(code)),
                None => Ok(AuthTokens {
                    id_token: "id-token".to_string(),
                    access_token: Some("access-token".to_string()),
                    refresh_token: None,
                    expires_in: Some(3600),
                }),
            }
        }

        async fn admin_confirm_sign_up(&self, _request: AdminConfirm) -> Result<(), Error> {
            self.calls.lock().unwrap().push("admin_confirm_sign_up");
            self.reject_admin_confirm
                .map_or(Ok(()), |code| Err(api(code)))
        }

        async fn admin_set_password(&self, request: AdminSetPassword) -> Result<(), Error> {
            self.calls.lock().unwrap().push("admin_set_password");
            *self.last_set_password.lock().unwrap() = Some(request);
            self.reject_set_password
                .map_or(Ok(()), |code| Err(api(code)))
        }
    }

    fn gateway(stub: Arc<StubDirectory>) -> AuthGateway {
        let globals = GlobalArgs::new(
            "https://directory.tld:8443".to_string(),
            "client123".to_string(),
            SecretString::from("topsecret".to_string()),
            "pool-1".to_string(),
            SecretString::from("service-token".to_string()),
        );

        AuthGateway::new(stub, &globals)
    }

    #[tokio::test]
    async fn test_register_success() {
        let stub = Arc::new(StubDirectory::default());
        let gateway = gateway(stub.clone());

        let created = gateway
            .register("user@example.com", "hunter2")
            .await
            .unwrap();

        assert!(created);
        assert_eq!(*stub.calls.lock().unwrap(), vec!["sign_up"]);
    }

    #[tokio::test]
    async fn test_register_rejection_is_an_error_not_false() {
        let stub = Arc::new(StubDirectory {
            reject_sign_up: Some("UsernameExistsException"),
            ..StubDirectory::default()
        });
        let gateway = gateway(stub);

        let result = gateway.register("user@example.com", "hunter2").await;

        match result {
            Err(AuthError::ProviderRejected { code, .. }) => {
                assert_eq!(code, "UsernameExistsException");
            }
            other => panic!("expected ProviderRejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_confirm_registration_success() {
        let stub = Arc::new(StubDirectory::default());
        let gateway = gateway(stub.clone());

        assert!(gateway
            .confirm_registration("user@example.com", "123456")
            .await
            .unwrap());
        assert_eq!(*stub.calls.lock().unwrap(), vec!["confirm_sign_up"]);
    }

    #[tokio::test]
    async fn test_confirm_registration_bad_code() {
        let stub = Arc::new(StubDirectory {
            reject_confirm: Some("CodeMismatchException"),
            ..StubDirectory::default()
        });
        let gateway = gateway(stub);

        let result = gateway.confirm_registration("user@example.com", "000000").await;

        assert!(matches!(
            result,
            Err(AuthError::ProviderRejected { .. })
        ));
    }

    #[tokio::test]
    async fn test_admin_confirm_registration() {
        let stub = Arc::new(StubDirectory::default());
        let gateway = gateway(stub.clone());

        assert!(gateway
            .admin_confirm_registration("user@example.com")
            .await
            .unwrap());
        assert_eq!(*stub.calls.lock().unwrap(), vec!["admin_confirm_sign_up"]);
    }

    #[tokio::test]
    async fn test_login_returns_identity_token() {
        let stub = Arc::new(StubDirectory::default());
        let gateway = gateway(stub.clone());

        let token = gateway.login("user@example.com", "hunter2").await.unwrap();

        assert_eq!(token, "id-token");

        // the derived hash rides along on the auth call
        let request = stub.last_auth.lock().unwrap().take().unwrap();
        assert_eq!(
            request.secret_hash,
            derive_secret_hash("topsecret", "client123", "user@example.com")
        );
    }

    #[tokio::test]
    async fn test_login_user_not_confirmed() {
        let stub = Arc::new(StubDirectory {
            reject_auth: Some("UserNotConfirmedException"),
            ..StubDirectory::default()
        });
        let gateway = gateway(stub);

        let result = gateway.login("user@example.com", "hunter2").await;

        assert!(matches!(result, Err(AuthError::UserNotConfirmed)));
    }

    #[tokio::test]
    async fn test_login_not_authorized_is_distinct() {
        let stub = Arc::new(StubDirectory {
            reject_auth: Some("NotAuthorizedException"),
            ..StubDirectory::default()
        });
        let gateway = gateway(stub);

        let result = gateway.login("user@example.com", "wrong").await;

        assert!(matches!(result, Err(AuthError::NotAuthorized)));
    }

    #[tokio::test]
    async fn test_reset_password_runs_both_steps_in_order() {
        let stub = Arc::new(StubDirectory::default());
        let gateway = gateway(stub.clone());

        let done = gateway
            .reset_password("user@example.com", "old-pass", "new-pass")
            .await
            .unwrap();

        assert!(done);
        assert_eq!(
            *stub.calls.lock().unwrap(),
            vec!["initiate_auth", "admin_set_password"]
        );

        let overwrite = stub.last_set_password.lock().unwrap().take().unwrap();
        assert_eq!(overwrite.user_pool_id, "pool-1");
        assert_eq!(overwrite.username, "user@example.com");
        assert_eq!(overwrite.password, "new-pass");
        assert!(overwrite.permanent);
    }

    #[tokio::test]
    async fn test_reset_password_short_circuits_on_failed_reauth() {
        let stub = Arc::new(StubDirectory {
            reject_auth: Some("NotAuthorizedException"),
            ..StubDirectory::default()
        });
        let gateway = gateway(stub.clone());

        let result = gateway
            .reset_password("user@example.com", "wrong", "new-pass")
            .await;

        assert!(matches!(result, Err(AuthError::NotAuthorized)));

        // the privileged overwrite never ran
        assert_eq!(*stub.calls.lock().unwrap(), vec!["initiate_auth"]);
        assert!(stub.last_set_password.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reset_password_surfaces_overwrite_failure() {
        let stub = Arc::new(StubDirectory {
            reject_set_password: Some("InternalErrorException"),
            ..StubDirectory::default()
        });
        let gateway = gateway(stub.clone());

        let result = gateway
            .reset_password("user@example.com", "old-pass", "new-pass")
            .await;

        assert!(matches!(
            result,
            Err(AuthError::ProviderRejected { .. })
        ));
        assert_eq!(
            *stub.calls.lock().unwrap(),
            vec!["initiate_auth", "admin_set_password"]
        );
    }
}
