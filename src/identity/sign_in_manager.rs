use super::{
    AppUser, AuthenticationProperties, AuthenticationScheme, IdentityStoreError, SignInManager,
    UserLoginInfo, LOGIN_PROVIDER_KEY, XSRF_KEY,
};
use crate::auth::JwtKeys;
use crate::config::ExternalProviderConfig;
use crate::models::auth::{ExternalLoginClaims, JWTClaims};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Header, Validation};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Issues session JWTs and reads the `external_login` cookie left behind by
/// the OAuth proxy. The code exchange with the provider happens upstream.
#[derive(Clone)]
pub struct JwtSignInManager {
    pub jwt_keys: Arc<JwtKeys>,
    pub expiry_hours: i64,
    pub external_providers: Vec<ExternalProviderConfig>,
}

#[async_trait]
impl SignInManager for JwtSignInManager {
    async fn sign_in(&self, user: &AppUser) -> Result<String, IdentityStoreError> {
        let expiry = Utc::now() + Duration::hours(self.expiry_hours);
        let claims = JWTClaims {
            sub: user.id,
            museum_id: user.museum_id,
            email: user.email.clone(),
            exp: expiry.timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.jwt_keys.encoding)?;
        info!("Issued session for user {}", user.id);
        Ok(token)
    }

    fn external_authentication_schemes(&self) -> Vec<AuthenticationScheme> {
        self.external_providers
            .iter()
            .map(|provider| AuthenticationScheme {
                name: provider.name.clone(),
                display_name: Some(provider.name.clone()),
            })
            .collect()
    }

    fn external_authorize_url(&self, provider: &str) -> Option<String> {
        self.external_providers
            .iter()
            .find(|configured| configured.name == provider)
            .map(|configured| configured.authorize_url.clone())
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
        expected_user_id: Uuid,
    ) -> Result<Option<UserLoginInfo>, IdentityStoreError> {
        let Some(token) = external_cookie else {
            return Ok(None);
        };
        let Ok(data) =
            decode::<ExternalLoginClaims>(token, &self.jwt_keys.decoding, &Validation::default())
        else {
            return Ok(None);
        };
        let claims = data.claims;
        if claims.xsrf != expected_user_id.to_string() {
            return Ok(None);
        }
        Ok(Some(UserLoginInfo {
            login_provider: claims.provider,
            provider_key: claims.provider_key,
            provider_display_name: claims.display_name,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn manager() -> JwtSignInManager {
        JwtSignInManager {
            jwt_keys: Arc::new(JwtKeys::new(b"sign-in-secret")),
            expiry_hours: 1,
            external_providers: vec![ExternalProviderConfig {
                name: "Google".to_string(),
                authorize_url: "https://accounts.example.com/auth".to_string(),
            }],
        }
    }

    fn external_cookie(manager: &JwtSignInManager, xsrf: &str) -> String {
        let claims = ExternalLoginClaims {
            provider: "Google".to_string(),
            provider_key: "g-42".to_string(),
            display_name: Some("Google".to_string()),
            xsrf: xsrf.to_string(),
            exp: (Utc::now() + Duration::minutes(5)).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &manager.jwt_keys.encoding).unwrap()
    }

    #[tokio::test]
    async fn session_token_carries_user_and_museum() {
        let manager = manager();
        let user = AppUser {
            id: Uuid::new_v4(),
            museum_id: 7,
            email: "curator@example.com".to_string(),
            email_confirmed: true,
            phone_number: None,
            password_hash: None,
            two_factor_enabled: false,
            authenticator_key: None,
        };
        let token = manager.sign_in(&user).await.unwrap();
        let claims = decode::<JWTClaims>(&token, &manager.jwt_keys.decoding, &Validation::default())
            .unwrap()
            .claims;
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.museum_id, 7);
        assert_eq!(claims.email, "curator@example.com");
    }

    #[tokio::test]
    async fn external_login_info_requires_matching_user() {
        let manager = manager();
        let user_id = Uuid::new_v4();
        let cookie = external_cookie(&manager, &user_id.to_string());

        let info = manager
            .get_external_login_info(Some(&cookie), user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(info.login_provider, "Google");
        assert_eq!(info.provider_key, "g-42");

        assert!(manager
            .get_external_login_info(Some(&cookie), Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
        assert!(manager
            .get_external_login_info(None, user_id)
            .await
            .unwrap()
            .is_none());
        assert!(manager
            .get_external_login_info(Some("garbage"), user_id)
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn challenge_properties_name_provider_and_user() {
        let manager = manager();
        let user_id = Uuid::new_v4();
        let properties = manager.configure_external_authentication_properties(
            "Google",
            "http://localhost/callback",
            user_id,
        );
        assert_eq!(properties.redirect_uri, "http://localhost/callback");
        assert_eq!(properties.items[LOGIN_PROVIDER_KEY], "Google");
        assert_eq!(properties.items[XSRF_KEY], user_id.to_string());
        assert_eq!(
            manager.external_authorize_url("Google").as_deref(),
            Some("https://accounts.example.com/auth")
        );
        assert!(manager.external_authorize_url("Facebook").is_none());
    }
}
