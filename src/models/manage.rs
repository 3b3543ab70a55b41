//! View models and outcomes for the account management endpoints.
//!
//! A manage action either renders a named view with its model and any field
//! errors, redirects to the next action with an optional status message, or
//! hands the browser to an external login provider.

use crate::auth::{removal_cookie, session_cookie, JWT_COOKIE};
use crate::identity::{AuthenticationProperties, AuthenticationScheme, UserLoginInfo};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

pub const STATUS_MESSAGE_COOKIE: &str = "status_message";
pub const EXTERNAL_LOGIN_COOKIE: &str = "external_login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManageAction {
    Index,
    ChangePassword,
    SetPassword,
    ExternalLogins,
    TwoFactorAuthentication,
    EnableAuthenticator,
    GenerateRecoveryCodes,
    LinkLoginCallback,
}

impl ManageAction {
    pub fn path(self) -> &'static str {
        match self {
            ManageAction::Index => "/api/v1/manage",
            ManageAction::ChangePassword => "/api/v1/manage/change-password",
            ManageAction::SetPassword => "/api/v1/manage/set-password",
            ManageAction::ExternalLogins => "/api/v1/manage/external-logins",
            ManageAction::TwoFactorAuthentication => "/api/v1/manage/two-factor-authentication",
            ManageAction::EnableAuthenticator => "/api/v1/manage/enable-authenticator",
            ManageAction::GenerateRecoveryCodes => "/api/v1/manage/generate-recovery-codes",
            ManageAction::LinkLoginCallback => "/api/v1/manage/link-login-callback",
        }
    }
}

/// Cookie changes that ride along with a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    None,
    /// A fresh session token was issued.
    SignedIn(String),
    /// The external login cookie is no longer needed.
    ExternalSignedOut,
}

/// Field errors keyed by field name. Errors that belong to no single field
/// use the empty key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ModelState(BTreeMap<String, Vec<String>>);

impl ModelState {
    pub fn add_model_error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(message.into());
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of keys with at least one error.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Vec<String>> {
        self.0.get(key)
    }
}

impl From<ValidationErrors> for ModelState {
    fn from(errors: ValidationErrors) -> Self {
        let mut state = ModelState::default();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                state.add_model_error(field.to_string(), message);
            }
        }
        state
    }
}

#[derive(Debug)]
pub enum ManageOutcome<M> {
    View {
        view: &'static str,
        model: M,
        errors: ModelState,
    },
    Redirect {
        to: ManageAction,
        status_message: Option<String>,
        session: SessionUpdate,
    },
    Challenge {
        provider: String,
        authorize_url: String,
        properties: AuthenticationProperties,
    },
}

impl<M> ManageOutcome<M> {
    pub fn view(view: &'static str, model: M) -> Self {
        ManageOutcome::View {
            view,
            model,
            errors: ModelState::default(),
        }
    }

    pub fn invalid(view: &'static str, model: M, errors: ModelState) -> Self {
        ManageOutcome::View {
            view,
            model,
            errors,
        }
    }

    pub fn redirect(to: ManageAction) -> Self {
        ManageOutcome::Redirect {
            to,
            status_message: None,
            session: SessionUpdate::None,
        }
    }
}

#[derive(Serialize)]
struct ViewBody<'a, M> {
    view: &'a str,
    model: M,
    errors: ModelState,
}

impl<M: Serialize> IntoResponse for ManageOutcome<M> {
    fn into_response(self) -> Response {
        match self {
            ManageOutcome::View {
                view,
                model,
                errors,
            } => {
                let status = if errors.is_valid() {
                    StatusCode::OK
                } else {
                    StatusCode::BAD_REQUEST
                };
                (
                    status,
                    Json(ViewBody {
                        view,
                        model,
                        errors,
                    }),
                )
                    .into_response()
            }
            ManageOutcome::Redirect {
                to,
                status_message,
                session,
            } => {
                let mut jar = CookieJar::new();
                if let Some(message) = status_message {
                    jar = jar.add(session_cookie(STATUS_MESSAGE_COOKIE, message));
                }
                jar = match session {
                    SessionUpdate::None => jar,
                    SessionUpdate::SignedIn(token) => jar.add(session_cookie(JWT_COOKIE, token)),
                    SessionUpdate::ExternalSignedOut => {
                        jar.add(removal_cookie(EXTERNAL_LOGIN_COOKIE))
                    }
                };
                (StatusCode::SEE_OTHER, jar, [(LOCATION, to.path())]).into_response()
            }
            ManageOutcome::Challenge {
                provider,
                authorize_url,
                properties,
            } => {
                let mut params = vec![("redirect_uri", properties.redirect_uri.clone())];
                params.extend(
                    properties
                        .items
                        .iter()
                        .map(|(key, value)| (key.as_str(), value.clone())),
                );
                match url::Url::parse_with_params(&authorize_url, &params) {
                    Ok(location) => {
                        let jar = CookieJar::new().add(removal_cookie(EXTERNAL_LOGIN_COOKIE));
                        (StatusCode::FOUND, jar, [(LOCATION, location.to_string())])
                            .into_response()
                    }
                    Err(err) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Invalid authorize URL for provider {provider}: {err}"),
                    )
                        .into_response(),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate, Serialize, Deserialize, ToSchema)]
pub struct IndexViewModel {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub is_email_confirmed: bool,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 3, max = 30))]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate, Serialize, Deserialize, ToSchema)]
pub struct ChangePasswordViewModel {
    #[serde(default, skip_serializing)]
    #[validate(length(min = 1))]
    pub old_password: String,
    #[serde(default, skip_serializing)]
    #[validate(length(
        min = 6,
        max = 100,
        message = "The password must be at least 6 and at max 100 characters long."
    ))]
    pub new_password: String,
    #[serde(default, skip_serializing)]
    #[validate(must_match(
        other = "new_password",
        message = "The new password and confirmation password do not match."
    ))]
    pub confirm_password: String,
    #[serde(default)]
    pub status_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate, Serialize, Deserialize, ToSchema)]
pub struct SetPasswordViewModel {
    #[serde(default, skip_serializing)]
    #[validate(length(
        min = 6,
        max = 100,
        message = "The password must be at least 6 and at max 100 characters long."
    ))]
    pub new_password: String,
    #[serde(default, skip_serializing)]
    #[validate(must_match(
        other = "new_password",
        message = "The new password and confirmation password do not match."
    ))]
    pub confirm_password: String,
    #[serde(default)]
    pub status_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExternalLoginsViewModel {
    pub current_logins: Vec<UserLoginInfo>,
    pub other_logins: Vec<AuthenticationScheme>,
    pub show_remove_button: bool,
    pub status_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct RemoveLoginViewModel {
    pub login_provider: String,
    pub provider_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct LinkLoginRequest {
    pub provider: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TwoFactorAuthenticationViewModel {
    pub has_authenticator: bool,
    pub recovery_codes_left: usize,
    pub is_2fa_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate, Serialize, Deserialize, ToSchema)]
pub struct EnableAuthenticatorViewModel {
    #[validate(length(
        min = 6,
        max = 7,
        message = "The verification code must be 6 or 7 digits long."
    ))]
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub shared_key: String,
    #[serde(default)]
    pub authenticator_uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GenerateRecoveryCodesViewModel {
    pub recovery_codes: Vec<String>,
}

/// Model for views that only ask for confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConfirmationViewModel {}
