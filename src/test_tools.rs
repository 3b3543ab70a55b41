//! Shared fixtures for unit and route tests: an in-memory database, a fully
//! wired app with one signed-up curator, and in-memory identity fakes.

use crate::app_factory::{build_state, create_app};
use crate::auth::JwtKeys;
use crate::config::{AppConfig, ExternalProviderConfig};
use crate::identity::user_manager::hash_password;
use crate::identity::{
    AppUser, AuthenticationProperties, AuthenticationScheme, EmailSender, IdentityError,
    IdentityResult, IdentityStoreError, SignInManager, UserLoginInfo, UserManager,
    LOGIN_PROVIDER_KEY, XSRF_KEY,
};
use crate::models::auth::JWTClaims;
use crate::models::manage::TwoFactorAuthenticationViewModel;
use crate::repos::museum_repo::MuseumRepo;
use crate::services::view_model_factories::TwoFactorAuthenticationViewModelFactory;
use async_trait::async_trait;
use axum::Router;
use chrono::{Duration, Utc};
use entity::{app_user, museum};
use jsonwebtoken::{encode, Header};
use migration::{Migrator, MigratorTrait};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const MOCK_USER_ID: Uuid = Uuid::from_u128(1);
pub const MOCK_PASSWORD: &str = "Sunflowers#1888";

pub const FAKE_PASSWORD: &str = "Starry#Night1889";
pub const FAKE_AUTHENTICATOR_CODE: &str = "123456";
const FAKE_AUTHENTICATOR_KEY: &str = "JBSWY3DPEHPK3PXP";
const FAKE_CONFIRMATION_TOKEN: &str = "confirm-token";

/// Migrated in-memory SQLite. One connection so every query sees the same
/// database.
pub async fn setup_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub async fn seed_museum(repo: &MuseumRepo, name: &str) -> museum::Model {
    repo.insert(museum::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        short_name: Set(None),
    })
    .await
    .unwrap()
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        listen_address: "127.0.0.1:0".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_expiry_hours: 1,
        app_base_url: "http://localhost:5000".to_string(),
        authenticator_issuer: "Museum Collections".to_string(),
        default_museum_name: "Test Museum".to_string(),
        external_providers: vec![ExternalProviderConfig {
            name: "Google".to_string(),
            authorize_url: "https://accounts.example.com/auth".to_string(),
        }],
        cors_origins: vec![],
    }
}

/// The app over a fresh database holding museum 1 and the curator that
/// [`get_mock_jwt`] signs in as.
pub async fn build_test_app() -> Router {
    let db = setup_test_db().await;
    let repo = MuseumRepo::new(db.clone());
    let museum = seed_museum(&repo, "Test Museum").await;
    repo.insert(app_user::ActiveModel {
        id: Set(MOCK_USER_ID),
        museum_id: Set(museum.id),
        email: Set("curator@example.com".to_string()),
        email_confirmed: Set(true),
        phone_number: Set(None),
        password_hash: Set(Some(hash_password(MOCK_PASSWORD).unwrap())),
        two_factor_enabled: Set(false),
        authenticator_key: Set(None),
    })
    .await
    .unwrap();

    let config = test_config();
    create_app(build_state(db, &config), &config.cors_origins)
}

pub fn get_mock_jwt() -> String {
    let claims = JWTClaims {
        sub: MOCK_USER_ID,
        museum_id: 1,
        email: "curator@example.com".to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &JwtKeys::new(TEST_JWT_SECRET.as_bytes()).encoding,
    )
    .unwrap()
}

pub fn fake_user() -> AppUser {
    AppUser {
        id: Uuid::new_v4(),
        museum_id: 1,
        email: "curator@example.com".to_string(),
        email_confirmed: false,
        phone_number: None,
        password_hash: Some("fake-hash".to_string()),
        two_factor_enabled: false,
        authenticator_key: None,
    }
}

#[derive(Default)]
struct FakeUserState {
    users: HashMap<Uuid, AppUser>,
    passwords: HashMap<Uuid, String>,
    logins: HashMap<Uuid, Vec<UserLoginInfo>>,
    fail_identity_calls: bool,
    reset_key_calls: usize,
}

/// Keeps users in memory. Users created with a password hash get
/// [`FAKE_PASSWORD`] as their password.
#[derive(Default)]
pub struct FakeUserManager {
    state: Mutex<FakeUserState>,
}

fn rejected() -> IdentityResult {
    Err(vec![IdentityError::new("Failure", "The operation failed.")])
}

impl FakeUserManager {
    pub fn with_user(user: AppUser) -> Self {
        let manager = FakeUserManager::default();
        {
            let mut state = manager.state.lock().unwrap();
            if user.password_hash.is_some() {
                state.passwords.insert(user.id, FAKE_PASSWORD.to_string());
            }
            state.users.insert(user.id, user);
        }
        manager
    }

    /// Makes every identity write after this call report a failure.
    pub fn fail_identity_calls(&self) {
        self.state.lock().unwrap().fail_identity_calls = true;
    }

    pub fn user(&self, user_id: Uuid) -> AppUser {
        self.state.lock().unwrap().users[&user_id].clone()
    }

    pub fn password_of(&self, user_id: Uuid) -> Option<String> {
        self.state.lock().unwrap().passwords.get(&user_id).cloned()
    }

    pub fn link(&self, user_id: Uuid, login: UserLoginInfo) {
        self.state
            .lock()
            .unwrap()
            .logins
            .entry(user_id)
            .or_default()
            .push(login);
    }

    pub fn logins_of(&self, user_id: Uuid) -> Vec<UserLoginInfo> {
        self.state
            .lock()
            .unwrap()
            .logins
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn reset_key_calls(&self) -> usize {
        self.state.lock().unwrap().reset_key_calls
    }

    fn write(&self, user_id: Uuid, apply: impl FnOnce(&mut FakeUserState)) -> IdentityResult {
        let mut state = self.state.lock().unwrap();
        if state.fail_identity_calls || !state.users.contains_key(&user_id) {
            return rejected();
        }
        apply(&mut state);
        Ok(())
    }
}

#[async_trait]
impl UserManager for FakeUserManager {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<AppUser>, IdentityStoreError> {
        Ok(self.state.lock().unwrap().users.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AppUser>, IdentityStoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email.trim()))
            .cloned())
    }

    async fn create_user(
        &self,
        museum_id: i32,
        email: &str,
        password: &str,
    ) -> Result<Result<AppUser, Vec<IdentityError>>, IdentityStoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_identity_calls {
            return Ok(Err(vec![IdentityError::new("Failure", "The operation failed.")]));
        }
        let user = AppUser {
            id: Uuid::new_v4(),
            museum_id,
            email: email.trim().to_lowercase(),
            email_confirmed: false,
            phone_number: None,
            password_hash: Some("fake-hash".to_string()),
            two_factor_enabled: false,
            authenticator_key: None,
        };
        state.passwords.insert(user.id, password.to_string());
        state.users.insert(user.id, user.clone());
        Ok(Ok(user))
    }

    async fn has_password(&self, user: &AppUser) -> Result<bool, IdentityStoreError> {
        Ok(self.state.lock().unwrap().passwords.contains_key(&user.id))
    }

    async fn check_password(
        &self,
        user: &AppUser,
        password: &str,
    ) -> Result<bool, IdentityStoreError> {
        Ok(self.password_of(user.id).as_deref() == Some(password))
    }

    async fn change_password(
        &self,
        user: &AppUser,
        current_password: &str,
        new_password: &str,
    ) -> Result<IdentityResult, IdentityStoreError> {
        if self.password_of(user.id).as_deref() != Some(current_password) {
            return Ok(Err(vec![IdentityError::new(
                "PasswordMismatch",
                "Incorrect password.",
            )]));
        }
        Ok(self.write(user.id, |state| {
            state.passwords.insert(user.id, new_password.to_string());
        }))
    }

    async fn add_password(
        &self,
        user: &AppUser,
        new_password: &str,
    ) -> Result<IdentityResult, IdentityStoreError> {
        Ok(self.write(user.id, |state| {
            state.passwords.insert(user.id, new_password.to_string());
            if let Some(stored) = state.users.get_mut(&user.id) {
                stored.password_hash = Some("fake-hash".to_string());
            }
        }))
    }

    async fn set_email(
        &self,
        user: &AppUser,
        email: &str,
    ) -> Result<IdentityResult, IdentityStoreError> {
        Ok(self.write(user.id, |state| {
            if let Some(stored) = state.users.get_mut(&user.id) {
                stored.email = email.trim().to_lowercase();
                stored.email_confirmed = false;
            }
        }))
    }

    async fn set_phone_number(
        &self,
        user: &AppUser,
        phone_number: Option<&str>,
    ) -> Result<IdentityResult, IdentityStoreError> {
        Ok(self.write(user.id, |state| {
            if let Some(stored) = state.users.get_mut(&user.id) {
                stored.phone_number = phone_number.map(str::to_string);
            }
        }))
    }

    async fn generate_email_confirmation_token(
        &self,
        _user: &AppUser,
    ) -> Result<String, IdentityStoreError> {
        Ok(FAKE_CONFIRMATION_TOKEN.to_string())
    }

    async fn confirm_email(
        &self,
        user: &AppUser,
        token: &str,
    ) -> Result<IdentityResult, IdentityStoreError> {
        if token != FAKE_CONFIRMATION_TOKEN {
            return Ok(Err(vec![IdentityError::new("InvalidToken", "Invalid token.")]));
        }
        Ok(self.write(user.id, |state| {
            if let Some(stored) = state.users.get_mut(&user.id) {
                stored.email_confirmed = true;
            }
        }))
    }

    async fn get_logins(&self, user: &AppUser) -> Result<Vec<UserLoginInfo>, IdentityStoreError> {
        Ok(self.logins_of(user.id))
    }

    async fn add_login(
        &self,
        user: &AppUser,
        login: &UserLoginInfo,
    ) -> Result<IdentityResult, IdentityStoreError> {
        Ok(self.write(user.id, |state| {
            state
                .logins
                .entry(user.id)
                .or_default()
                .push(login.clone());
        }))
    }

    async fn remove_login(
        &self,
        user: &AppUser,
        login_provider: &str,
        provider_key: &str,
    ) -> Result<IdentityResult, IdentityStoreError> {
        Ok(self.write(user.id, |state| {
            if let Some(logins) = state.logins.get_mut(&user.id) {
                logins.retain(|login| {
                    login.login_provider != login_provider || login.provider_key != provider_key
                });
            }
        }))
    }

    async fn set_two_factor_enabled(
        &self,
        user: &AppUser,
        enabled: bool,
    ) -> Result<IdentityResult, IdentityStoreError> {
        Ok(self.write(user.id, |state| {
            if let Some(stored) = state.users.get_mut(&user.id) {
                stored.two_factor_enabled = enabled;
            }
        }))
    }

    async fn get_authenticator_key(
        &self,
        user: &AppUser,
    ) -> Result<Option<String>, IdentityStoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .get(&user.id)
            .and_then(|stored| stored.authenticator_key.clone()))
    }

    async fn reset_authenticator_key(
        &self,
        user: &AppUser,
    ) -> Result<IdentityResult, IdentityStoreError> {
        self.state.lock().unwrap().reset_key_calls += 1;
        Ok(self.write(user.id, |state| {
            if let Some(stored) = state.users.get_mut(&user.id) {
                stored.authenticator_key = Some(FAKE_AUTHENTICATOR_KEY.to_string());
            }
        }))
    }

    async fn verify_authenticator_token(
        &self,
        _user: &AppUser,
        code: &str,
    ) -> Result<bool, IdentityStoreError> {
        Ok(code == FAKE_AUTHENTICATOR_CODE)
    }

    async fn generate_recovery_codes(
        &self,
        _user: &AppUser,
        count: usize,
    ) -> Result<Vec<String>, IdentityStoreError> {
        Ok((0..count).map(|i| format!("RCODE-{i:05}")).collect())
    }

    async fn count_recovery_codes(&self, _user: &AppUser) -> Result<usize, IdentityStoreError> {
        Ok(0)
    }

    async fn redeem_recovery_code(
        &self,
        _user: &AppUser,
        _code: &str,
    ) -> Result<IdentityResult, IdentityStoreError> {
        Ok(rejected())
    }
}

/// Hands out predictable tokens and records who was signed in.
#[derive(Default)]
pub struct FakeSignInManager {
    schemes: Vec<String>,
    signed_in: Mutex<Vec<Uuid>>,
    external_login: Mutex<Option<UserLoginInfo>>,
}

impl FakeSignInManager {
    pub fn with_schemes(schemes: &[&str]) -> Self {
        FakeSignInManager {
            schemes: schemes.iter().map(|scheme| scheme.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn signed_in(&self) -> Vec<Uuid> {
        self.signed_in.lock().unwrap().clone()
    }

    /// The login the next callback will read from the external cookie.
    pub fn set_external_login(&self, login: UserLoginInfo) {
        *self.external_login.lock().unwrap() = Some(login);
    }
}

#[async_trait]
impl SignInManager for FakeSignInManager {
    async fn sign_in(&self, user: &AppUser) -> Result<String, IdentityStoreError> {
        self.signed_in.lock().unwrap().push(user.id);
        Ok(format!("token-for-{}", user.id))
    }

    fn external_authentication_schemes(&self) -> Vec<AuthenticationScheme> {
        self.schemes
            .iter()
            .map(|name| AuthenticationScheme {
                name: name.clone(),
                display_name: Some(name.clone()),
            })
            .collect()
    }

    fn external_authorize_url(&self, provider: &str) -> Option<String> {
        self.schemes
            .iter()
            .find(|scheme| scheme.as_str() == provider)
            .map(|scheme| format!("https://{}.example.com/authorize", scheme.to_lowercase()))
    }

    fn configure_external_authentication_properties(
        &self,
        provider: &str,
        redirect_uri: &str,
        user_id: Uuid,
    ) -> AuthenticationProperties {
        let mut items = BTreeMap::new();
        items.insert(LOGIN_PROVIDER_KEY.to_string(), provider.to_string());
        items.insert(XSRF_KEY.to_string(), user_id.to_string());
        AuthenticationProperties {
            redirect_uri: redirect_uri.to_string(),
            items,
        }
    }

    async fn get_external_login_info(
        &self,
        external_cookie: Option<&str>,
        _expected_user_id: Uuid,
    ) -> Result<Option<UserLoginInfo>, IdentityStoreError> {
        if external_cookie.is_none() {
            return Ok(None);
        }
        Ok(self.external_login.lock().unwrap().clone())
    }
}

/// Records every message instead of sending it.
#[derive(Default)]
pub struct FakeEmailSender {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl FakeEmailSender {
    /// `(email, subject, message)` for each message, oldest first.
    pub fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for FakeEmailSender {
    async fn send_email(
        &self,
        email: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), IdentityStoreError> {
        self.sent.lock().unwrap().push((
            email.to_string(),
            subject.to_string(),
            message.to_string(),
        ));
        Ok(())
    }
}

pub struct FakeTwoFactorViewModelFactory;

#[async_trait]
impl TwoFactorAuthenticationViewModelFactory for FakeTwoFactorViewModelFactory {
    async fn create(
        &self,
        user: &AppUser,
    ) -> Result<TwoFactorAuthenticationViewModel, IdentityStoreError> {
        Ok(TwoFactorAuthenticationViewModel {
            has_authenticator: user.authenticator_key.is_some(),
            recovery_codes_left: 3,
            is_2fa_enabled: user.two_factor_enabled,
        })
    }
}
