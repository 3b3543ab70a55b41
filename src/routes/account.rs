//! Routes for registration, sign-in and e-mail confirmation.

use crate::app_factory::AppState;
use crate::error::AppError;
use crate::models::auth::AuthenticatedUser;
use crate::models::request::{ConfirmEmailParams, LoginRequest, RegisterRequest};
use crate::models::response::{AccountResponse, TwoFactorRequiredResponse};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use utoipa::OpenApi;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(
    paths(register, login, logout, confirm_email, current_account),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        AccountResponse,
        TwoFactorRequiredResponse
    ))
)]
pub struct AccountApi;

pub fn get_account_routes() -> Router<AppState> {
    let account = Router::new()
        .route("/", get(current_account))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/confirm-email", get(confirm_email));
    Router::new().nest("/account", account)
}

#[utoipa::path(
    post,
    path = "/api/v1/account/register",
    tag = "Account",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created and signed in", body = AccountResponse),
        (status = 400, description = "Registration rejected")
    )
)]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    if let Err(err) = payload.validate() {
        return Ok((StatusCode::BAD_REQUEST, err.to_string()).into_response());
    }
    state.account_service.register(payload).await
}

#[utoipa::path(
    post,
    path = "/api/v1/account/login",
    tag = "Account",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AccountResponse),
        (status = 401, description = "Invalid credentials or second factor required", body = TwoFactorRequiredResponse)
    )
)]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, AppError> {
    if let Err(err) = payload.validate() {
        return Ok((StatusCode::BAD_REQUEST, err.to_string()).into_response());
    }
    state.account_service.login(payload).await
}

#[utoipa::path(
    post,
    path = "/api/v1/account/logout",
    tag = "Account",
    responses(
        (status = 200, description = "Session cookie cleared")
    )
)]
async fn logout(State(state): State<AppState>) -> Response {
    state.account_service.logout()
}

#[utoipa::path(
    get,
    path = "/api/v1/account/confirm-email",
    tag = "Account",
    params(ConfirmEmailParams),
    responses(
        (status = 200, description = "Email confirmed"),
        (status = 400, description = "Invalid confirmation code")
    )
)]
async fn confirm_email(
    State(state): State<AppState>,
    Query(params): Query<ConfirmEmailParams>,
) -> Result<Response, AppError> {
    state.account_service.confirm_email(params).await
}

#[utoipa::path(
    get,
    path = "/api/v1/account",
    tag = "Account",
    responses(
        (status = 200, description = "Current account", body = AccountResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn current_account(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    state
        .account_service
        .current_account(authenticated_user)
        .await
}
