//! Builders for the two-factor view models, injected into the manage service.

use crate::identity::{totp, AppUser, IdentityStoreError, UserManager};
use crate::models::manage::{EnableAuthenticatorViewModel, TwoFactorAuthenticationViewModel};
use async_trait::async_trait;
use std::sync::Arc;
use url::form_urlencoded::byte_serialize;

#[async_trait]
pub trait TwoFactorAuthenticationViewModelFactory: Send + Sync {
    async fn create(
        &self,
        user: &AppUser,
    ) -> Result<TwoFactorAuthenticationViewModel, IdentityStoreError>;
}

pub trait EnableAuthenticatorViewModelFactory: Send + Sync {
    /// `unformatted_key` is the stored base32 key.
    fn create(&self, email: &str, unformatted_key: &str) -> EnableAuthenticatorViewModel;
}

#[derive(Clone)]
pub struct DefaultTwoFactorAuthenticationViewModelFactory {
    pub user_manager: Arc<dyn UserManager>,
}

#[async_trait]
impl TwoFactorAuthenticationViewModelFactory for DefaultTwoFactorAuthenticationViewModelFactory {
    async fn create(
        &self,
        user: &AppUser,
    ) -> Result<TwoFactorAuthenticationViewModel, IdentityStoreError> {
        let has_authenticator = self.user_manager.get_authenticator_key(user).await?.is_some();
        let recovery_codes_left = self.user_manager.count_recovery_codes(user).await?;
        Ok(TwoFactorAuthenticationViewModel {
            has_authenticator,
            recovery_codes_left,
            is_2fa_enabled: user.two_factor_enabled,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DefaultEnableAuthenticatorViewModelFactory {
    pub issuer: String,
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect::<String>().replace('+', "%20")
}

impl EnableAuthenticatorViewModelFactory for DefaultEnableAuthenticatorViewModelFactory {
    fn create(&self, email: &str, unformatted_key: &str) -> EnableAuthenticatorViewModel {
        let issuer = encode(&self.issuer);
        let authenticator_uri = format!(
            "otpauth://totp/{issuer}:{}?secret={}&issuer={issuer}&digits=6",
            encode(email),
            unformatted_key
        );
        EnableAuthenticatorViewModel {
            code: String::new(),
            shared_key: totp::format_key(unformatted_key),
            authenticator_uri,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn authenticator_uri_carries_issuer_and_secret() {
        let factory = DefaultEnableAuthenticatorViewModelFactory {
            issuer: "Museum Collections".to_string(),
        };
        let model = factory.create("curator@example.com", "JBSWY3DPEHPK3PXP");
        assert_eq!(
            model.authenticator_uri,
            "otpauth://totp/Museum%20Collections:curator%40example.com?secret=JBSWY3DPEHPK3PXP&issuer=Museum%20Collections&digits=6"
        );
        assert_eq!(model.shared_key, "jbsw y3dp ehpk 3pxp");
        assert!(model.code.is_empty());
    }
}
