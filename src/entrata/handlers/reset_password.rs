use crate::{
    auth::AuthGateway,
    entrata::handlers::{error_response, valid_email},
};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize)]
pub struct UserResetPassword {
    email: String,
    old_password: String,
    new_password: String,
}

#[utoipa::path(
    post,
    path= "/user/password/reset",
    request_body = UserResetPassword,
    responses (
        (status = 200, description = "Password changed"),
        (status = 401, description = "Current credentials rejected, nothing changed"),
        (status = 502, description = "Identity directory unavailable"),
    ),
    tag= "reset-password"
)]
// axum handler for password reset
#[instrument(skip_all)]
pub async fn reset_password(
    gateway: Extension<Arc<AuthGateway>>,
    payload: Option<Json<UserResetPassword>>,
) -> impl IntoResponse {
    let user: UserResetPassword = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()),
    };

    debug!("password reset request for {}", user.email);

    if !valid_email(&user.email) {
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string());
    }

    match gateway
        .reset_password(&user.email, &user.old_password, &user.new_password)
        .await
    {
        Ok(_) => (StatusCode::OK, "Password changed".to_string()),
        Err(e) => {
            // A failure here is all-or-nothing: the old password is still in
            // place and the caller can resubmit the whole operation.
            error!("Error resetting password: {:?}", e);

            error_response(&e)
        }
    }
}
