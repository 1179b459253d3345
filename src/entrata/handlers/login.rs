use crate::{
    auth::AuthGateway,
    entrata::handlers::{error_response, valid_email},
};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize)]
pub struct UserLogin {
    email: String,
    password: String,
}

#[utoipa::path(
    post,
    path= "/user/login",
    request_body = UserLogin,
    responses (
        (status = 200, description = "Login successful, identity token in the body", content_type = "application/json"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "User has not completed registration confirmation"),
        (status = 502, description = "Identity directory unavailable"),
    ),
    tag= "login"
)]
// axum handler for login
#[instrument(skip_all)]
pub async fn login(
    gateway: Extension<Arc<AuthGateway>>,
    payload: Option<Json<UserLogin>>,
) -> Response {
    let user: UserLogin = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
        }
    };

    debug!("login request for {}", user.email);

    if !valid_email(&user.email) {
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string()).into_response();
    }

    match gateway.login(&user.email, &user.password).await {
        Ok(token) => (StatusCode::OK, Json(json!({ "token": token }))).into_response(),
        Err(e) => {
            error!("Error logging in user: {:?}", e);

            error_response(&e).into_response()
        }
    }
}
