//! Routes for the signed-in user's account management.
//!
//! GET endpoints render a view as JSON. Form posts either render the same view
//! again with field errors (`400`) or redirect with `303 See Other`. Status
//! messages travel to the next view in a short-lived cookie.

use crate::app_factory::AppState;
use crate::auth::removal_cookie;
use crate::error::AppError;
use crate::models::auth::AuthenticatedUser;
use crate::models::manage::{
    ChangePasswordViewModel, ConfirmationViewModel, EnableAuthenticatorViewModel,
    ExternalLoginsViewModel, GenerateRecoveryCodesViewModel, IndexViewModel, LinkLoginRequest,
    ModelState, RemoveLoginViewModel, SetPasswordViewModel, TwoFactorAuthenticationViewModel,
    EXTERNAL_LOGIN_COOKIE, STATUS_MESSAGE_COOKIE,
};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::CookieJar;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        index,
        update_profile,
        send_verification_email,
        change_password_form,
        change_password,
        set_password_form,
        set_password,
        external_logins,
        link_login,
        link_login_callback,
        remove_login,
        two_factor_authentication,
        disable_2fa_warning,
        disable_2fa,
        enable_authenticator_form,
        enable_authenticator,
        reset_authenticator_warning,
        reset_authenticator,
        generate_recovery_codes
    ),
    components(schemas(
        IndexViewModel,
        ChangePasswordViewModel,
        SetPasswordViewModel,
        ExternalLoginsViewModel,
        RemoveLoginViewModel,
        LinkLoginRequest,
        TwoFactorAuthenticationViewModel,
        EnableAuthenticatorViewModel,
        GenerateRecoveryCodesViewModel,
        ConfirmationViewModel,
        ModelState
    ))
)]
pub struct ManageApi;

pub fn get_manage_routes() -> Router<AppState> {
    let manage = Router::new()
        .route("/", get(index))
        .route("/", post(update_profile))
        .route("/send-verification-email", post(send_verification_email))
        .route("/change-password", get(change_password_form))
        .route("/change-password", post(change_password))
        .route("/set-password", get(set_password_form))
        .route("/set-password", post(set_password))
        .route("/external-logins", get(external_logins))
        .route("/link-login", post(link_login))
        .route("/link-login-callback", get(link_login_callback))
        .route("/remove-login", post(remove_login))
        .route("/two-factor-authentication", get(two_factor_authentication))
        .route("/disable-2fa", get(disable_2fa_warning))
        .route("/disable-2fa", post(disable_2fa))
        .route("/enable-authenticator", get(enable_authenticator_form))
        .route("/enable-authenticator", post(enable_authenticator))
        .route("/reset-authenticator", get(reset_authenticator_warning))
        .route("/reset-authenticator", post(reset_authenticator))
        .route("/generate-recovery-codes", get(generate_recovery_codes));
    Router::new().nest("/manage", manage)
}

/// Reads the status message left by the previous redirect and clears it.
fn take_status_message(jar: CookieJar) -> (CookieJar, Option<String>) {
    match jar.get(STATUS_MESSAGE_COOKIE) {
        Some(cookie) => {
            let message = cookie.value().to_owned();
            (jar.add(removal_cookie(STATUS_MESSAGE_COOKIE)), Some(message))
        }
        None => (jar, None),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/manage",
    tag = "Manage",
    responses(
        (status = 200, description = "Profile view", body = IndexViewModel),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    let (jar, status_message) = take_status_message(jar);
    let outcome = state
        .manage_service
        .index(authenticated_user.user_id, status_message)
        .await?;
    Ok((jar, outcome).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/manage",
    tag = "Manage",
    request_body = IndexViewModel,
    responses(
        (status = 303, description = "Profile updated"),
        (status = 400, description = "Invalid profile", body = IndexViewModel)
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn update_profile(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(model): Json<IndexViewModel>,
) -> Result<Response, AppError> {
    let outcome = state
        .manage_service
        .update_profile(authenticated_user.user_id, model)
        .await?;
    Ok(outcome.into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/manage/send-verification-email",
    tag = "Manage",
    request_body = IndexViewModel,
    responses(
        (status = 303, description = "Verification email sent"),
        (status = 400, description = "Invalid profile", body = IndexViewModel)
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn send_verification_email(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(model): Json<IndexViewModel>,
) -> Result<Response, AppError> {
    let outcome = state
        .manage_service
        .send_verification_email(authenticated_user.user_id, model)
        .await?;
    Ok(outcome.into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/manage/change-password",
    tag = "Manage",
    responses(
        (status = 200, description = "Change password view", body = ChangePasswordViewModel),
        (status = 303, description = "User has no password yet")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn change_password_form(
    State(state): State<AppState>,
    jar: CookieJar,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    let (jar, status_message) = take_status_message(jar);
    let outcome = state
        .manage_service
        .change_password_form(authenticated_user.user_id, status_message)
        .await?;
    Ok((jar, outcome).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/manage/change-password",
    tag = "Manage",
    request_body = ChangePasswordViewModel,
    responses(
        (status = 303, description = "Password changed"),
        (status = 400, description = "Password rejected", body = ChangePasswordViewModel)
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn change_password(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(model): Json<ChangePasswordViewModel>,
) -> Result<Response, AppError> {
    let outcome = state
        .manage_service
        .change_password(authenticated_user.user_id, model)
        .await?;
    Ok(outcome.into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/manage/set-password",
    tag = "Manage",
    responses(
        (status = 200, description = "Set password view", body = SetPasswordViewModel),
        (status = 303, description = "User already has a password")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn set_password_form(
    State(state): State<AppState>,
    jar: CookieJar,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    let (jar, status_message) = take_status_message(jar);
    let outcome = state
        .manage_service
        .set_password_form(authenticated_user.user_id, status_message)
        .await?;
    Ok((jar, outcome).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/manage/set-password",
    tag = "Manage",
    request_body = SetPasswordViewModel,
    responses(
        (status = 303, description = "Password set"),
        (status = 400, description = "Password rejected", body = SetPasswordViewModel)
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn set_password(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(model): Json<SetPasswordViewModel>,
) -> Result<Response, AppError> {
    let outcome = state
        .manage_service
        .set_password(authenticated_user.user_id, model)
        .await?;
    Ok(outcome.into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/manage/external-logins",
    tag = "Manage",
    responses(
        (status = 200, description = "Linked and available logins", body = ExternalLoginsViewModel)
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn external_logins(
    State(state): State<AppState>,
    jar: CookieJar,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    let (jar, status_message) = take_status_message(jar);
    let outcome = state
        .manage_service
        .external_logins(authenticated_user.user_id, status_message)
        .await?;
    Ok((jar, outcome).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/manage/link-login",
    tag = "Manage",
    request_body = LinkLoginRequest,
    responses(
        (status = 302, description = "Redirect to the login provider"),
        (status = 400, description = "Unknown provider")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn link_login(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(payload): Json<LinkLoginRequest>,
) -> Result<Response, AppError> {
    let outcome = state
        .manage_service
        .link_login(authenticated_user.user_id, &payload.provider)?;
    Ok(outcome.into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/manage/link-login-callback",
    tag = "Manage",
    responses(
        (status = 303, description = "External login added"),
        (status = 500, description = "External login could not be read or added")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn link_login_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    let external_cookie = jar
        .get(EXTERNAL_LOGIN_COOKIE)
        .map(|cookie| cookie.value().to_owned());
    let outcome = state
        .manage_service
        .link_login_callback(authenticated_user.user_id, external_cookie.as_deref())
        .await?;
    Ok(outcome.into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/manage/remove-login",
    tag = "Manage",
    request_body = RemoveLoginViewModel,
    responses(
        (status = 303, description = "External login removed")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn remove_login(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(model): Json<RemoveLoginViewModel>,
) -> Result<Response, AppError> {
    let outcome = state
        .manage_service
        .remove_login(authenticated_user.user_id, model)
        .await?;
    Ok(outcome.into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/manage/two-factor-authentication",
    tag = "Manage",
    responses(
        (status = 200, description = "Two-factor status", body = TwoFactorAuthenticationViewModel)
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn two_factor_authentication(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    let outcome = state
        .manage_service
        .two_factor_authentication(authenticated_user.user_id)
        .await?;
    Ok(outcome.into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/manage/disable-2fa",
    tag = "Manage",
    responses(
        (status = 200, description = "Confirm disabling two-factor", body = ConfirmationViewModel),
        (status = 500, description = "Two-factor is not enabled")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn disable_2fa_warning(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    let outcome = state
        .manage_service
        .disable_2fa_warning(authenticated_user.user_id)
        .await?;
    Ok(outcome.into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/manage/disable-2fa",
    tag = "Manage",
    responses(
        (status = 303, description = "Two-factor disabled"),
        (status = 500, description = "Two-factor is not enabled")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn disable_2fa(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    let outcome = state
        .manage_service
        .disable_2fa(authenticated_user.user_id)
        .await?;
    Ok(outcome.into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/manage/enable-authenticator",
    tag = "Manage",
    responses(
        (status = 200, description = "Shared key and QR code URI", body = EnableAuthenticatorViewModel)
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn enable_authenticator_form(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    let outcome = state
        .manage_service
        .enable_authenticator_form(authenticated_user.user_id)
        .await?;
    Ok(outcome.into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/manage/enable-authenticator",
    tag = "Manage",
    request_body = EnableAuthenticatorViewModel,
    responses(
        (status = 303, description = "Two-factor enabled"),
        (status = 400, description = "Invalid verification code", body = EnableAuthenticatorViewModel)
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn enable_authenticator(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(model): Json<EnableAuthenticatorViewModel>,
) -> Result<Response, AppError> {
    let outcome = state
        .manage_service
        .enable_authenticator(authenticated_user.user_id, model)
        .await?;
    Ok(outcome.into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/manage/reset-authenticator",
    tag = "Manage",
    responses(
        (status = 200, description = "Confirm resetting the authenticator", body = ConfirmationViewModel)
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn reset_authenticator_warning(
    State(state): State<AppState>,
    _authenticated_user: AuthenticatedUser,
) -> Response {
    state
        .manage_service
        .reset_authenticator_warning()
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/v1/manage/reset-authenticator",
    tag = "Manage",
    responses(
        (status = 303, description = "Authenticator key reset")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn reset_authenticator(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    let outcome = state
        .manage_service
        .reset_authenticator(authenticated_user.user_id)
        .await?;
    Ok(outcome.into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/manage/generate-recovery-codes",
    tag = "Manage",
    responses(
        (status = 200, description = "Fresh recovery codes", body = GenerateRecoveryCodesViewModel),
        (status = 500, description = "Two-factor is not enabled")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn generate_recovery_codes(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    let outcome = state
        .manage_service
        .generate_recovery_codes(authenticated_user.user_id)
        .await?;
    Ok(outcome.into_response())
}
