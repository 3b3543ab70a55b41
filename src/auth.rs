//! JWT keys and the extractor that turns the `jwt` cookie into an
//! [`AuthenticatedUser`].

use crate::app_factory::AppState;
use crate::models::auth::{AuthenticatedUser, JWTClaims};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, DecodingKey, EncodingKey, Validation};

pub const JWT_COOKIE: &str = "jwt";

/// An http-only cookie scoped to the whole API.
pub fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// A cookie that tells the browser to drop `name`.
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = session_cookie(name, String::new());
    cookie.make_removal();
    cookie
}

pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl JwtKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingCredentials,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingCredentials => "Missing credentials",
            AuthError::InvalidToken => "Invalid token",
        };
        (StatusCode::UNAUTHORIZED, message).into_response()
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(JWT_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .ok_or(AuthError::MissingCredentials)?;
        let token_data = decode::<JWTClaims>(&token, &state.jwt_keys.decoding, &Validation::default())
            .map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthenticatedUser {
            user_id: token_data.claims.sub,
            museum_id: token_data.claims.museum_id,
            email: token_data.claims.email,
        })
    }
}
