//! Narrow identity collaborators used by the account-management services.
//!
//! The services only see these traits; the sea-orm, JWT and logging backed
//! implementations live in the submodules and are wired up in `app_factory`.

pub mod email_sender;
pub mod sign_in_manager;
pub mod totp;
pub mod user_manager;

use async_trait::async_trait;
use entity::app_user;
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

pub type AppUser = app_user::Model;

/// A rejection the user can act on, e.g. a password that is too short.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IdentityError {
    pub code: String,
    pub description: String,
}

impl IdentityError {
    pub fn new(code: &str, description: &str) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
        }
    }
}

pub type IdentityResult = Result<(), Vec<IdentityError>>;

/// Infrastructure failures inside an identity collaborator.
#[derive(Debug, Error)]
pub enum IdentityStoreError {
    #[error(transparent)]
    Db(#[from] DbErr),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("invalid authenticator key: {0}")]
    AuthenticatorKey(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserLoginInfo {
    pub login_provider: String,
    pub provider_key: String,
    pub provider_display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticationScheme {
    pub name: String,
    pub display_name: Option<String>,
}

/// Everything the external provider round trip needs to come back to us.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationProperties {
    pub redirect_uri: String,
    pub items: BTreeMap<String, String>,
}

pub const LOGIN_PROVIDER_KEY: &str = "LoginProvider";
pub const XSRF_KEY: &str = "XsrfId";

#[async_trait]
pub trait UserManager: Send + Sync {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<AppUser>, IdentityStoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<AppUser>, IdentityStoreError>;

    async fn create_user(
        &self,
        museum_id: i32,
        email: &str,
        password: &str,
    ) -> Result<Result<AppUser, Vec<IdentityError>>, IdentityStoreError>;

    async fn has_password(&self, user: &AppUser) -> Result<bool, IdentityStoreError>;

    async fn check_password(&self, user: &AppUser, password: &str)
        -> Result<bool, IdentityStoreError>;

    async fn change_password(
        &self,
        user: &AppUser,
        current_password: &str,
        new_password: &str,
    ) -> Result<IdentityResult, IdentityStoreError>;

    async fn add_password(
        &self,
        user: &AppUser,
        new_password: &str,
    ) -> Result<IdentityResult, IdentityStoreError>;

    async fn set_email(&self, user: &AppUser, email: &str)
        -> Result<IdentityResult, IdentityStoreError>;

    async fn set_phone_number(
        &self,
        user: &AppUser,
        phone_number: Option<&str>,
    ) -> Result<IdentityResult, IdentityStoreError>;

    async fn generate_email_confirmation_token(
        &self,
        user: &AppUser,
    ) -> Result<String, IdentityStoreError>;

    async fn confirm_email(
        &self,
        user: &AppUser,
        token: &str,
    ) -> Result<IdentityResult, IdentityStoreError>;

    async fn get_logins(&self, user: &AppUser) -> Result<Vec<UserLoginInfo>, IdentityStoreError>;

    async fn add_login(
        &self,
        user: &AppUser,
        login: &UserLoginInfo,
    ) -> Result<IdentityResult, IdentityStoreError>;

    async fn remove_login(
        &self,
        user: &AppUser,
        login_provider: &str,
        provider_key: &str,
    ) -> Result<IdentityResult, IdentityStoreError>;

    async fn set_two_factor_enabled(
        &self,
        user: &AppUser,
        enabled: bool,
    ) -> Result<IdentityResult, IdentityStoreError>;

    async fn get_authenticator_key(
        &self,
        user: &AppUser,
    ) -> Result<Option<String>, IdentityStoreError>;

    async fn reset_authenticator_key(&self, user: &AppUser)
        -> Result<IdentityResult, IdentityStoreError>;

    async fn verify_authenticator_token(
        &self,
        user: &AppUser,
        code: &str,
    ) -> Result<bool, IdentityStoreError>;

    /// Replaces any existing recovery codes with `count` fresh ones.
    async fn generate_recovery_codes(
        &self,
        user: &AppUser,
        count: usize,
    ) -> Result<Vec<String>, IdentityStoreError>;

    async fn count_recovery_codes(&self, user: &AppUser) -> Result<usize, IdentityStoreError>;

    async fn redeem_recovery_code(
        &self,
        user: &AppUser,
        code: &str,
    ) -> Result<IdentityResult, IdentityStoreError>;
}

#[async_trait]
pub trait SignInManager: Send + Sync {
    /// Issues a fresh session token for `user`.
    async fn sign_in(&self, user: &AppUser) -> Result<String, IdentityStoreError>;

    fn external_authentication_schemes(&self) -> Vec<AuthenticationScheme>;

    /// Authorize URL of the named provider, if it is configured.
    fn external_authorize_url(&self, provider: &str) -> Option<String>;

    fn configure_external_authentication_properties(
        &self,
        provider: &str,
        redirect_uri: &str,
        user_id: Uuid,
    ) -> AuthenticationProperties;

    /// Reads the login the provider vouched for. `None` when the cookie is
    /// missing, invalid, or was issued for another user.
    async fn get_external_login_info(
        &self,
        external_cookie: Option<&str>,
        expected_user_id: Uuid,
    ) -> Result<Option<UserLoginInfo>, IdentityStoreError>;
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(
        &self,
        email: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), IdentityStoreError>;
}
