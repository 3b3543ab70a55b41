//! sea-orm backed [`UserManager`].
//!
//! Passwords are stored as argon2 PHC strings, recovery codes as sha256
//! digests, and e-mail confirmation tokens are HMACs over the user's id and
//! current address, so changing the address invalidates outstanding tokens.

use super::{
    totp, AppUser, IdentityError, IdentityResult, IdentityStoreError, UserLoginInfo, UserManager,
};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use entity::{app_user, user_login, user_recovery_code};
use hmac::{Hmac, Mac};
use rand::Rng;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    TransactionTrait,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

const MIN_PASSWORD_LENGTH: usize = 6;
const RECOVERY_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

#[derive(Debug, Clone, Default)]
pub struct DBUserManager {
    pub db_session: DatabaseConnection,
    pub token_secret: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_password(password: &str) -> Vec<IdentityError> {
    let mut errors = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(IdentityError::new(
            "PasswordTooShort",
            "Passwords must be at least 6 characters.",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push(IdentityError::new(
            "PasswordRequiresDigit",
            "Passwords must have at least one digit ('0'-'9').",
        ));
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        errors.push(IdentityError::new(
            "PasswordRequiresLower",
            "Passwords must have at least one lowercase ('a'-'z').",
        ));
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        errors.push(IdentityError::new(
            "PasswordRequiresUpper",
            "Passwords must have at least one uppercase ('A'-'Z').",
        ));
    }
    if password.chars().all(|c| c.is_alphanumeric()) {
        errors.push(IdentityError::new(
            "PasswordRequiresNonAlphanumeric",
            "Passwords must have at least one non alphanumeric character.",
        ));
    }
    errors
}

pub(crate) fn hash_password(password: &str) -> Result<String, IdentityStoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| IdentityStoreError::Hashing(err.to_string()))
}

fn verify_password(password: &str, stored_hash: &str) -> Result<bool, IdentityStoreError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|err| IdentityStoreError::Hashing(err.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn normalize_recovery_code(code: &str) -> String {
    code.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn hash_recovery_code(code: &str) -> String {
    format!("{:x}", Sha256::digest(normalize_recovery_code(code).as_bytes()))
}

fn new_recovery_code() -> String {
    let mut rng = rand::thread_rng();
    let mut pick = || RECOVERY_CODE_ALPHABET[rng.gen_range(0..RECOVERY_CODE_ALPHABET.len())] as char;
    let first: String = (0..5).map(|_| pick()).collect();
    let second: String = (0..5).map(|_| pick()).collect();
    format!("{first}-{second}")
}

impl DBUserManager {
    fn email_token_mac(&self, user: &AppUser) -> Result<HmacSha256, IdentityStoreError> {
        let mut mac = HmacSha256::new_from_slice(self.token_secret.as_bytes())
            .map_err(|err| IdentityStoreError::Hashing(err.to_string()))?;
        mac.update(user.id.as_bytes());
        mac.update(normalize_email(&user.email).as_bytes());
        Ok(mac)
    }

    async fn save(&self, user: app_user::ActiveModel) -> Result<IdentityResult, IdentityStoreError> {
        user.update(&self.db_session).await?;
        Ok(Ok(()))
    }
}

#[async_trait]
impl UserManager for DBUserManager {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<AppUser>, IdentityStoreError> {
        Ok(app_user::Entity::find_by_id(user_id)
            .one(&self.db_session)
            .await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AppUser>, IdentityStoreError> {
        Ok(app_user::Entity::find()
            .filter(app_user::Column::Email.eq(normalize_email(email)))
            .one(&self.db_session)
            .await?)
    }

    async fn create_user(
        &self,
        museum_id: i32,
        email: &str,
        password: &str,
    ) -> Result<Result<AppUser, Vec<IdentityError>>, IdentityStoreError> {
        let mut errors = Vec::new();
        if self.find_by_email(email).await?.is_some() {
            errors.push(IdentityError::new(
                "DuplicateEmail",
                &format!("Email '{}' is already taken.", email.trim()),
            ));
        }
        errors.extend(validate_password(password));
        if !errors.is_empty() {
            return Ok(Err(errors));
        }

        let user = app_user::ActiveModel {
            id: Set(Uuid::new_v4()),
            museum_id: Set(museum_id),
            email: Set(normalize_email(email)),
            email_confirmed: Set(false),
            phone_number: Set(None),
            password_hash: Set(Some(hash_password(password)?)),
            two_factor_enabled: Set(false),
            authenticator_key: Set(None),
        }
        .insert(&self.db_session)
        .await?;
        Ok(Ok(user))
    }

    async fn has_password(&self, user: &AppUser) -> Result<bool, IdentityStoreError> {
        Ok(user.password_hash.is_some())
    }

    async fn check_password(
        &self,
        user: &AppUser,
        password: &str,
    ) -> Result<bool, IdentityStoreError> {
        match &user.password_hash {
            Some(stored_hash) => verify_password(password, stored_hash),
            None => Ok(false),
        }
    }

    async fn change_password(
        &self,
        user: &AppUser,
        current_password: &str,
        new_password: &str,
    ) -> Result<IdentityResult, IdentityStoreError> {
        if !self.check_password(user, current_password).await? {
            return Ok(Err(vec![IdentityError::new(
                "PasswordMismatch",
                "Incorrect password.",
            )]));
        }
        let errors = validate_password(new_password);
        if !errors.is_empty() {
            return Ok(Err(errors));
        }
        self.save(app_user::ActiveModel {
            id: Unchanged(user.id),
            password_hash: Set(Some(hash_password(new_password)?)),
            ..Default::default()
        })
        .await
    }

    async fn add_password(
        &self,
        user: &AppUser,
        new_password: &str,
    ) -> Result<IdentityResult, IdentityStoreError> {
        if user.password_hash.is_some() {
            return Ok(Err(vec![IdentityError::new(
                "UserAlreadyHasPassword",
                "User already has a password set.",
            )]));
        }
        let errors = validate_password(new_password);
        if !errors.is_empty() {
            return Ok(Err(errors));
        }
        self.save(app_user::ActiveModel {
            id: Unchanged(user.id),
            password_hash: Set(Some(hash_password(new_password)?)),
            ..Default::default()
        })
        .await
    }

    async fn set_email(
        &self,
        user: &AppUser,
        email: &str,
    ) -> Result<IdentityResult, IdentityStoreError> {
        let email = normalize_email(email);
        if email == user.email {
            return Ok(Ok(()));
        }
        if email.is_empty() {
            return Ok(Err(vec![IdentityError::new(
                "InvalidEmail",
                "Email '' is invalid.",
            )]));
        }
        if let Some(existing) = self.find_by_email(&email).await? {
            if existing.id != user.id {
                return Ok(Err(vec![IdentityError::new(
                    "DuplicateEmail",
                    &format!("Email '{email}' is already taken."),
                )]));
            }
        }
        self.save(app_user::ActiveModel {
            id: Unchanged(user.id),
            email: Set(email),
            email_confirmed: Set(false),
            ..Default::default()
        })
        .await
    }

    async fn set_phone_number(
        &self,
        user: &AppUser,
        phone_number: Option<&str>,
    ) -> Result<IdentityResult, IdentityStoreError> {
        let phone_number = phone_number
            .map(str::trim)
            .filter(|number| !number.is_empty())
            .map(str::to_string);
        if phone_number == user.phone_number {
            return Ok(Ok(()));
        }
        self.save(app_user::ActiveModel {
            id: Unchanged(user.id),
            phone_number: Set(phone_number),
            ..Default::default()
        })
        .await
    }

    async fn generate_email_confirmation_token(
        &self,
        user: &AppUser,
    ) -> Result<String, IdentityStoreError> {
        let mac = self.email_token_mac(user)?;
        Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }

    async fn confirm_email(
        &self,
        user: &AppUser,
        token: &str,
    ) -> Result<IdentityResult, IdentityStoreError> {
        let invalid = || -> Result<IdentityResult, IdentityStoreError> {
            Ok(Err(vec![IdentityError::new("InvalidToken", "Invalid token.")]))
        };
        let Ok(signature) = URL_SAFE_NO_PAD.decode(token) else {
            return invalid();
        };
        if self.email_token_mac(user)?.verify_slice(&signature).is_err() {
            return invalid();
        }
        self.save(app_user::ActiveModel {
            id: Unchanged(user.id),
            email_confirmed: Set(true),
            ..Default::default()
        })
        .await
    }

    async fn get_logins(&self, user: &AppUser) -> Result<Vec<UserLoginInfo>, IdentityStoreError> {
        let logins = user_login::Entity::find()
            .filter(user_login::Column::UserId.eq(user.id))
            .all(&self.db_session)
            .await?;
        Ok(logins
            .into_iter()
            .map(|login| UserLoginInfo {
                login_provider: login.login_provider,
                provider_key: login.provider_key,
                provider_display_name: login.provider_display_name,
            })
            .collect())
    }

    async fn add_login(
        &self,
        user: &AppUser,
        login: &UserLoginInfo,
    ) -> Result<IdentityResult, IdentityStoreError> {
        let existing = user_login::Entity::find_by_id((
            login.login_provider.clone(),
            login.provider_key.clone(),
        ))
        .one(&self.db_session)
        .await?;
        if existing.is_some() {
            return Ok(Err(vec![IdentityError::new(
                "LoginAlreadyAssociated",
                "A user with this login already exists.",
            )]));
        }
        user_login::ActiveModel {
            login_provider: Set(login.login_provider.clone()),
            provider_key: Set(login.provider_key.clone()),
            provider_display_name: Set(login.provider_display_name.clone()),
            user_id: Set(user.id),
        }
        .insert(&self.db_session)
        .await?;
        Ok(Ok(()))
    }

    async fn remove_login(
        &self,
        user: &AppUser,
        login_provider: &str,
        provider_key: &str,
    ) -> Result<IdentityResult, IdentityStoreError> {
        let result = user_login::Entity::delete_many()
            .filter(user_login::Column::UserId.eq(user.id))
            .filter(user_login::Column::LoginProvider.eq(login_provider))
            .filter(user_login::Column::ProviderKey.eq(provider_key))
            .exec(&self.db_session)
            .await?;
        if result.rows_affected == 0 {
            return Ok(Err(vec![IdentityError::new(
                "LoginNotFound",
                "The external login was not found.",
            )]));
        }
        Ok(Ok(()))
    }

    async fn set_two_factor_enabled(
        &self,
        user: &AppUser,
        enabled: bool,
    ) -> Result<IdentityResult, IdentityStoreError> {
        self.save(app_user::ActiveModel {
            id: Unchanged(user.id),
            two_factor_enabled: Set(enabled),
            ..Default::default()
        })
        .await
    }

    async fn get_authenticator_key(
        &self,
        user: &AppUser,
    ) -> Result<Option<String>, IdentityStoreError> {
        Ok(self
            .get_user(user.id)
            .await?
            .and_then(|stored| stored.authenticator_key))
    }

    async fn reset_authenticator_key(
        &self,
        user: &AppUser,
    ) -> Result<IdentityResult, IdentityStoreError> {
        self.save(app_user::ActiveModel {
            id: Unchanged(user.id),
            authenticator_key: Set(Some(totp::generate_key())),
            ..Default::default()
        })
        .await
    }

    async fn verify_authenticator_token(
        &self,
        user: &AppUser,
        code: &str,
    ) -> Result<bool, IdentityStoreError> {
        let Some(key) = self.get_authenticator_key(user).await? else {
            return Ok(false);
        };
        let key = totp::decode_key(&key)
            .map_err(|err| IdentityStoreError::AuthenticatorKey(err.to_string()))?;
        let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default();
        Ok(totp::verify_code(&key, code, now))
    }

    async fn generate_recovery_codes(
        &self,
        user: &AppUser,
        count: usize,
    ) -> Result<Vec<String>, IdentityStoreError> {
        let codes: Vec<String> = (0..count).map(|_| new_recovery_code()).collect();

        let txn = self.db_session.begin().await?;
        user_recovery_code::Entity::delete_many()
            .filter(user_recovery_code::Column::UserId.eq(user.id))
            .exec(&txn)
            .await?;
        if !codes.is_empty() {
            user_recovery_code::Entity::insert_many(codes.iter().map(|code| {
                user_recovery_code::ActiveModel {
                    user_id: Set(user.id),
                    code_hash: Set(hash_recovery_code(code)),
                }
            }))
            .exec_without_returning(&txn)
            .await?;
        }
        txn.commit().await?;
        Ok(codes)
    }

    async fn count_recovery_codes(&self, user: &AppUser) -> Result<usize, IdentityStoreError> {
        let count = user_recovery_code::Entity::find()
            .filter(user_recovery_code::Column::UserId.eq(user.id))
            .count(&self.db_session)
            .await?;
        Ok(count as usize)
    }

    async fn redeem_recovery_code(
        &self,
        user: &AppUser,
        code: &str,
    ) -> Result<IdentityResult, IdentityStoreError> {
        let result = user_recovery_code::Entity::delete_many()
            .filter(user_recovery_code::Column::UserId.eq(user.id))
            .filter(user_recovery_code::Column::CodeHash.eq(hash_recovery_code(code)))
            .exec(&self.db_session)
            .await?;
        if result.rows_affected == 0 {
            return Ok(Err(vec![IdentityError::new(
                "RecoveryCodeRedemptionFailed",
                "Recovery code redemption failed.",
            )]));
        }
        Ok(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::museum_repo::MuseumRepo;
    use crate::test_tools::{seed_museum, setup_test_db};
    use pretty_assertions::assert_eq;

    const PASSWORD: &str = "Sunflowers#1888";

    async fn manager_with_user() -> (DBUserManager, AppUser) {
        let db = setup_test_db().await;
        let museum = seed_museum(&MuseumRepo::new(db.clone()), "Van Gogh Museum").await;
        let manager = DBUserManager {
            db_session: db,
            token_secret: "test-secret".to_string(),
        };
        let user = manager
            .create_user(museum.id, "Curator@Example.com", PASSWORD)
            .await
            .unwrap()
            .unwrap();
        (manager, user)
    }

    #[tokio::test]
    async fn created_user_can_sign_in_with_password() {
        let (manager, user) = manager_with_user().await;
        assert_eq!(user.email, "curator@example.com");
        assert!(manager.check_password(&user, PASSWORD).await.unwrap());
        assert!(!manager.check_password(&user, "wrong").await.unwrap());
        let found = manager
            .find_by_email(" CURATOR@example.com ")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn weak_and_duplicate_registrations_are_rejected() {
        let (manager, user) = manager_with_user().await;
        let errors = manager
            .create_user(user.museum_id, "curator@example.com", "abc")
            .await
            .unwrap()
            .unwrap_err();
        let codes: Vec<&str> = errors.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(
            codes,
            vec![
                "DuplicateEmail",
                "PasswordTooShort",
                "PasswordRequiresDigit",
                "PasswordRequiresUpper",
                "PasswordRequiresNonAlphanumeric",
            ]
        );
    }

    #[tokio::test]
    async fn change_password_with_wrong_current_password_keeps_credentials() {
        let (manager, user) = manager_with_user().await;
        let errors = manager
            .change_password(&user, "not-it", "Irises#1889")
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "PasswordMismatch");

        let stored = manager.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(stored.password_hash, user.password_hash);
        assert!(manager.check_password(&stored, PASSWORD).await.unwrap());
    }

    #[tokio::test]
    async fn change_password_replaces_hash() {
        let (manager, user) = manager_with_user().await;
        manager
            .change_password(&user, PASSWORD, "Irises#1889")
            .await
            .unwrap()
            .unwrap();
        let stored = manager.get_user(user.id).await.unwrap().unwrap();
        assert!(manager.check_password(&stored, "Irises#1889").await.unwrap());
        assert!(!manager.check_password(&stored, PASSWORD).await.unwrap());
    }

    #[tokio::test]
    async fn email_token_confirms_current_address_only() {
        let (manager, user) = manager_with_user().await;
        let token = manager.generate_email_confirmation_token(&user).await.unwrap();
        assert!(manager.confirm_email(&user, "bogus").await.unwrap().is_err());

        manager.confirm_email(&user, &token).await.unwrap().unwrap();
        let stored = manager.get_user(user.id).await.unwrap().unwrap();
        assert!(stored.email_confirmed);

        manager
            .set_email(&stored, "registrar@example.com")
            .await
            .unwrap()
            .unwrap();
        let moved = manager.get_user(user.id).await.unwrap().unwrap();
        assert!(!moved.email_confirmed);
        assert!(manager.confirm_email(&moved, &token).await.unwrap().is_err());
    }

    #[tokio::test]
    async fn authenticator_codes_verify_against_reset_key() {
        let (manager, user) = manager_with_user().await;
        assert!(!manager.verify_authenticator_token(&user, "123456").await.unwrap());

        manager.reset_authenticator_key(&user).await.unwrap().unwrap();
        let key = manager.get_authenticator_key(&user).await.unwrap().unwrap();
        let now = chrono::Utc::now().timestamp() as u64;
        let code = totp::code_at(&totp::decode_key(&key).unwrap(), now);
        assert!(manager.verify_authenticator_token(&user, &code).await.unwrap());
    }

    #[tokio::test]
    async fn recovery_codes_are_single_use() {
        let (manager, user) = manager_with_user().await;
        let codes = manager.generate_recovery_codes(&user, 10).await.unwrap();
        assert_eq!(codes.len(), 10);
        assert_eq!(manager.count_recovery_codes(&user).await.unwrap(), 10);

        manager
            .redeem_recovery_code(&user, &codes[0].to_lowercase())
            .await
            .unwrap()
            .unwrap();
        assert!(manager
            .redeem_recovery_code(&user, &codes[0])
            .await
            .unwrap()
            .is_err());
        assert_eq!(manager.count_recovery_codes(&user).await.unwrap(), 9);

        manager.generate_recovery_codes(&user, 10).await.unwrap();
        assert_eq!(manager.count_recovery_codes(&user).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn logins_can_be_added_once_and_removed() {
        let (manager, user) = manager_with_user().await;
        let login = UserLoginInfo {
            login_provider: "Google".to_string(),
            provider_key: "g-123".to_string(),
            provider_display_name: Some("Google".to_string()),
        };
        manager.add_login(&user, &login).await.unwrap().unwrap();
        assert!(manager.add_login(&user, &login).await.unwrap().is_err());
        assert_eq!(manager.get_logins(&user).await.unwrap(), vec![login.clone()]);

        manager
            .remove_login(&user, "Google", "g-123")
            .await
            .unwrap()
            .unwrap();
        assert!(manager.get_logins(&user).await.unwrap().is_empty());
        assert!(manager
            .remove_login(&user, "Google", "g-123")
            .await
            .unwrap()
            .is_err());
    }
}
