use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The signed-in caller, decoded from the `jwt` cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub museum_id: i32,
    pub email: String,
}

impl fmt::Display for AuthenticatedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User ID: {}\nEmail: {}\nMuseum ID: {}",
            self.user_id, self.email, self.museum_id
        )
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JWTClaims {
    pub sub: Uuid,
    pub museum_id: i32,
    pub email: String,
    pub exp: usize,
}

/// Claims carried by the `external_login` cookie that the OAuth proxy sets
/// after a provider round trip.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExternalLoginClaims {
    pub provider: String,
    pub provider_key: String,
    pub display_name: Option<String>,
    /// User id the challenge was issued for.
    pub xsrf: String,
    pub exp: usize,
}
