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
pub struct UserConfirm {
    email: String,
    code: String,
}

#[utoipa::path(
    post,
    path= "/user/confirm",
    request_body = UserConfirm,
    responses (
        (status = 200, description = "Registration confirmed"),
        (status = 400, description = "Missing payload, invalid email, or expired/incorrect code"),
        (status = 502, description = "Identity directory unavailable"),
    ),
    tag= "confirm"
)]
// axum handler for confirm
#[instrument(skip_all)]
pub async fn confirm(
    gateway: Extension<Arc<AuthGateway>>,
    payload: Option<Json<UserConfirm>>,
) -> impl IntoResponse {
    let user: UserConfirm = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()),
    };

    debug!("confirm request for {}", user.email);

    if !valid_email(&user.email) {
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string());
    }

    match gateway.confirm_registration(&user.email, &user.code).await {
        Ok(_) => (StatusCode::OK, "Registration confirmed".to_string()),
        Err(e) => {
            error!("Error confirming registration: {:?}", e);

            error_response(&e)
        }
    }
}
