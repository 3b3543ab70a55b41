//! Service layer for registration, sign-in and e-mail confirmation.

use crate::auth::{removal_cookie, session_cookie, JWT_COOKIE};
use crate::error::AppError;
use crate::identity::{EmailSender, SignInManager, UserManager};
use crate::models::auth::AuthenticatedUser;
use crate::models::request::{ConfirmEmailParams, LoginRequest, RegisterRequest};
use crate::models::response::{AccountResponse, TwoFactorRequiredResponse};
use crate::repos::museum_repo::MuseumRepo;
use crate::services::callback_urls::CallbackUrls;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use entity::museum;
use std::sync::Arc;
use tracing::info;

/// Uses dynamic traits for dependency injection
#[derive(Clone)]
pub struct AccountService {
    pub repo: MuseumRepo,
    pub user_manager: Arc<dyn UserManager>,
    pub sign_in_manager: Arc<dyn SignInManager>,
    pub email_sender: Arc<dyn EmailSender>,
    pub callback_urls: CallbackUrls,
}

impl AccountService {
    /// Creates an account in the default museum, mails a confirmation link
    /// and signs the new user in.
    pub async fn register(self, payload: RegisterRequest) -> Result<Response, AppError> {
        let museum = self
            .repo
            .get_first_entity::<museum::Entity>()
            .await?
            .ok_or_else(|| AppError::Unexpected("No museum has been configured.".to_string()))?;

        let user = match self
            .user_manager
            .create_user(museum.id, &payload.email, &payload.password)
            .await?
        {
            Ok(user) => user,
            Err(errors) => return Ok((StatusCode::BAD_REQUEST, Json(errors)).into_response()),
        };
        info!("User {} created a new account with password.", user.id);

        let code = self
            .user_manager
            .generate_email_confirmation_token(&user)
            .await?;
        let callback_url = self.callback_urls.email_confirmation_link(user.id, &code);
        self.email_sender
            .send_email(
                &user.email,
                "Confirm your email",
                &format!("Please confirm your account by clicking this link: <a href='{callback_url}'>link</a>"),
            )
            .await?;

        let token = self.sign_in_manager.sign_in(&user).await?;
        let jar = CookieJar::new().add(session_cookie(JWT_COOKIE, token));
        Ok((StatusCode::CREATED, jar, Json(AccountResponse::from(user))).into_response())
    }

    /// Checks the password and, for users with two-factor enabled, either an
    /// authenticator code or a recovery code.
    pub async fn login(self, payload: LoginRequest) -> Result<Response, AppError> {
        let user = match self.user_manager.find_by_email(&payload.email).await? {
            Some(user) => user,
            None => {
                return Ok((StatusCode::UNAUTHORIZED, "Invalid email or password").into_response())
            }
        };
        if !self
            .user_manager
            .check_password(&user, &payload.password)
            .await?
        {
            info!("Failed login attempt for user {}", user.id);
            return Ok((StatusCode::UNAUTHORIZED, "Invalid email or password").into_response());
        }

        if user.two_factor_enabled {
            let second_factor_ok = if let Some(code) = payload.two_factor_code.as_deref() {
                let code = code.replace([' ', '-'], "");
                self.user_manager
                    .verify_authenticator_token(&user, &code)
                    .await?
            } else if let Some(recovery_code) = payload.recovery_code.as_deref() {
                self.user_manager
                    .redeem_recovery_code(&user, recovery_code)
                    .await?
                    .is_ok()
            } else {
                let body = TwoFactorRequiredResponse {
                    requires_two_factor: true,
                };
                return Ok((StatusCode::UNAUTHORIZED, Json(body)).into_response());
            };
            if !second_factor_ok {
                info!("Invalid second factor entered for user {}", user.id);
                return Ok((StatusCode::UNAUTHORIZED, "Invalid two-factor code").into_response());
            }
        }

        let token = self.sign_in_manager.sign_in(&user).await?;
        info!("User {} logged in.", user.id);
        let jar = CookieJar::new().add(session_cookie(JWT_COOKIE, token));
        Ok((StatusCode::OK, jar, Json(AccountResponse::from(user))).into_response())
    }

    pub fn logout(&self) -> Response {
        let jar = CookieJar::new().add(removal_cookie(JWT_COOKIE));
        (StatusCode::OK, jar, "Logged out").into_response()
    }

    pub async fn confirm_email(self, params: ConfirmEmailParams) -> Result<Response, AppError> {
        let user = self
            .user_manager
            .get_user(params.user_id)
            .await?
            .ok_or(AppError::UserNotFound(params.user_id))?;
        match self.user_manager.confirm_email(&user, &params.code).await? {
            Ok(()) => {
                info!("User {} confirmed their email.", user.id);
                Ok((StatusCode::OK, "Thank you for confirming your email.").into_response())
            }
            Err(errors) => Ok((StatusCode::BAD_REQUEST, Json(errors)).into_response()),
        }
    }

    /// The stored account behind the caller's session.
    pub async fn current_account(self, user: AuthenticatedUser) -> Result<Response, AppError> {
        let account = self
            .user_manager
            .get_user(user.user_id)
            .await?
            .ok_or(AppError::UserNotFound(user.user_id))?;
        Ok(Json(AccountResponse::from(account)).into_response())
    }
}
