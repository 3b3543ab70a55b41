//! Service layer for the signed-in user's account management.
//!
//! Every operation loads the current user first; a user that cannot be
//! loaded is a fault, not something the caller can fix. Submitted models are
//! validated before any identity call, and a failed validation hands the same
//! model back with its field errors. Successful writes redirect to a fixed
//! follow-up action with a status message.

use crate::error::AppError;
use crate::identity::{AppUser, EmailSender, SignInManager, UserManager};
use crate::models::manage::{
    ChangePasswordViewModel, ConfirmationViewModel, EnableAuthenticatorViewModel,
    ExternalLoginsViewModel, GenerateRecoveryCodesViewModel, IndexViewModel, ManageAction,
    ManageOutcome, ModelState, RemoveLoginViewModel, SessionUpdate, SetPasswordViewModel,
    TwoFactorAuthenticationViewModel,
};
use crate::services::callback_urls::CallbackUrls;
use crate::services::view_model_factories::{
    EnableAuthenticatorViewModelFactory, TwoFactorAuthenticationViewModelFactory,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub const RECOVERY_CODE_COUNT: usize = 10;

/// Uses dynamic traits for dependency injection
#[derive(Clone)]
pub struct ManageService {
    pub user_manager: Arc<dyn UserManager>,
    pub sign_in_manager: Arc<dyn SignInManager>,
    pub email_sender: Arc<dyn EmailSender>,
    pub callback_urls: CallbackUrls,
    pub two_factor_view_models: Arc<dyn TwoFactorAuthenticationViewModelFactory>,
    pub enable_authenticator_view_models: Arc<dyn EnableAuthenticatorViewModelFactory>,
}

fn redirect_with_message<M>(
    to: ManageAction,
    message: &str,
    session: SessionUpdate,
) -> ManageOutcome<M> {
    ManageOutcome::Redirect {
        to,
        status_message: Some(message.to_string()),
        session,
    }
}

impl ManageService {
    async fn load_user(&self, user_id: Uuid) -> Result<AppUser, AppError> {
        self.user_manager
            .get_user(user_id)
            .await?
            .ok_or(AppError::UserNotFound(user_id))
    }

    pub async fn index(
        &self,
        user_id: Uuid,
        status_message: Option<String>,
    ) -> Result<ManageOutcome<IndexViewModel>, AppError> {
        let user = self.load_user(user_id).await?;
        Ok(ManageOutcome::view(
            "Index",
            IndexViewModel {
                username: user.email.clone(),
                is_email_confirmed: user.email_confirmed,
                email: user.email,
                phone_number: user.phone_number,
                status_message,
            },
        ))
    }

    /// Saves a changed e-mail address or phone number.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        model: IndexViewModel,
    ) -> Result<ManageOutcome<IndexViewModel>, AppError> {
        if let Err(errors) = model.validate() {
            return Ok(ManageOutcome::invalid("Index", model, errors.into()));
        }
        let user = self.load_user(user_id).await?;

        if !model.email.trim().eq_ignore_ascii_case(&user.email) {
            if self.user_manager.set_email(&user, &model.email).await?.is_err() {
                return Err(AppError::Unexpected(format!(
                    "Unexpected error occurred setting email for user with ID '{}'.",
                    user.id
                )));
            }
        }
        if model.phone_number != user.phone_number {
            let result = self
                .user_manager
                .set_phone_number(&user, model.phone_number.as_deref())
                .await?;
            if result.is_err() {
                return Err(AppError::Unexpected(format!(
                    "Unexpected error occurred setting phone number for user with ID '{}'.",
                    user.id
                )));
            }
        }

        Ok(redirect_with_message(
            ManageAction::Index,
            "Your profile has been updated",
            SessionUpdate::None,
        ))
    }

    pub async fn send_verification_email(
        &self,
        user_id: Uuid,
        model: IndexViewModel,
    ) -> Result<ManageOutcome<IndexViewModel>, AppError> {
        if let Err(errors) = model.validate() {
            return Ok(ManageOutcome::invalid("Index", model, errors.into()));
        }
        let user = self.load_user(user_id).await?;

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

        Ok(redirect_with_message(
            ManageAction::Index,
            "Verification email sent. Please check your email.",
            SessionUpdate::None,
        ))
    }

    pub async fn change_password_form(
        &self,
        user_id: Uuid,
        status_message: Option<String>,
    ) -> Result<ManageOutcome<ChangePasswordViewModel>, AppError> {
        let user = self.load_user(user_id).await?;
        if !self.user_manager.has_password(&user).await? {
            return Ok(ManageOutcome::redirect(ManageAction::SetPassword));
        }
        Ok(ManageOutcome::view(
            "ChangePassword",
            ChangePasswordViewModel {
                status_message,
                ..Default::default()
            },
        ))
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        model: ChangePasswordViewModel,
    ) -> Result<ManageOutcome<ChangePasswordViewModel>, AppError> {
        if let Err(errors) = model.validate() {
            return Ok(ManageOutcome::invalid("ChangePassword", model, errors.into()));
        }
        let user = self.load_user(user_id).await?;

        let result = self
            .user_manager
            .change_password(&user, &model.old_password, &model.new_password)
            .await?;
        if let Err(identity_errors) = result {
            let mut errors = ModelState::default();
            for identity_error in identity_errors {
                errors.add_model_error("", identity_error.description);
            }
            return Ok(ManageOutcome::invalid("ChangePassword", model, errors));
        }

        let token = self.sign_in_manager.sign_in(&user).await?;
        info!("User {} changed their password successfully.", user.id);
        Ok(redirect_with_message(
            ManageAction::ChangePassword,
            "Your password has been changed.",
            SessionUpdate::SignedIn(token),
        ))
    }

    pub async fn set_password_form(
        &self,
        user_id: Uuid,
        status_message: Option<String>,
    ) -> Result<ManageOutcome<SetPasswordViewModel>, AppError> {
        let user = self.load_user(user_id).await?;
        if self.user_manager.has_password(&user).await? {
            return Ok(ManageOutcome::redirect(ManageAction::ChangePassword));
        }
        Ok(ManageOutcome::view(
            "SetPassword",
            SetPasswordViewModel {
                status_message,
                ..Default::default()
            },
        ))
    }

    pub async fn set_password(
        &self,
        user_id: Uuid,
        model: SetPasswordViewModel,
    ) -> Result<ManageOutcome<SetPasswordViewModel>, AppError> {
        if let Err(errors) = model.validate() {
            return Ok(ManageOutcome::invalid("SetPassword", model, errors.into()));
        }
        let user = self.load_user(user_id).await?;

        let result = self
            .user_manager
            .add_password(&user, &model.new_password)
            .await?;
        if let Err(identity_errors) = result {
            let mut errors = ModelState::default();
            for identity_error in identity_errors {
                errors.add_model_error("", identity_error.description);
            }
            return Ok(ManageOutcome::invalid("SetPassword", model, errors));
        }

        let token = self.sign_in_manager.sign_in(&user).await?;
        Ok(redirect_with_message(
            ManageAction::SetPassword,
            "Your password has been set.",
            SessionUpdate::SignedIn(token),
        ))
    }

    pub async fn external_logins(
        &self,
        user_id: Uuid,
        status_message: Option<String>,
    ) -> Result<ManageOutcome<ExternalLoginsViewModel>, AppError> {
        let user = self.load_user(user_id).await?;
        let current_logins = self.user_manager.get_logins(&user).await?;
        let other_logins = self
            .sign_in_manager
            .external_authentication_schemes()
            .into_iter()
            .filter(|scheme| {
                !current_logins
                    .iter()
                    .any(|login| login.login_provider == scheme.name)
            })
            .collect();
        let show_remove_button =
            self.user_manager.has_password(&user).await? || current_logins.len() > 1;

        Ok(ManageOutcome::view(
            "ExternalLogins",
            ExternalLoginsViewModel {
                current_logins,
                other_logins,
                show_remove_button,
                status_message,
            },
        ))
    }

    /// Sends the browser to `provider`, asking it to come back to the link
    /// login callback for this user.
    pub fn link_login(&self, user_id: Uuid, provider: &str) -> Result<ManageOutcome<()>, AppError> {
        let authorize_url = self
            .sign_in_manager
            .external_authorize_url(provider)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown login provider '{provider}'.")))?;
        let properties = self.sign_in_manager.configure_external_authentication_properties(
            provider,
            &self.callback_urls.link_login_callback(),
            user_id,
        );
        Ok(ManageOutcome::Challenge {
            provider: provider.to_string(),
            authorize_url,
            properties,
        })
    }

    pub async fn link_login_callback(
        &self,
        user_id: Uuid,
        external_cookie: Option<&str>,
    ) -> Result<ManageOutcome<()>, AppError> {
        let user = self.load_user(user_id).await?;
        let info = self
            .sign_in_manager
            .get_external_login_info(external_cookie, user.id)
            .await?
            .ok_or_else(|| {
                AppError::Unexpected(format!(
                    "Unexpected error occurred loading external login info for user with ID '{}'.",
                    user.id
                ))
            })?;

        if self.user_manager.add_login(&user, &info).await?.is_err() {
            return Err(AppError::Unexpected(format!(
                "Unexpected error occurred adding external login for user with ID '{}'.",
                user.id
            )));
        }

        Ok(redirect_with_message(
            ManageAction::ExternalLogins,
            "The external login was added.",
            SessionUpdate::ExternalSignedOut,
        ))
    }

    pub async fn remove_login(
        &self,
        user_id: Uuid,
        model: RemoveLoginViewModel,
    ) -> Result<ManageOutcome<()>, AppError> {
        let user = self.load_user(user_id).await?;
        let result = self
            .user_manager
            .remove_login(&user, &model.login_provider, &model.provider_key)
            .await?;
        if result.is_err() {
            return Err(AppError::Unexpected(format!(
                "Unexpected error occurred removing external login for user with ID '{}'.",
                user.id
            )));
        }

        let token = self.sign_in_manager.sign_in(&user).await?;
        Ok(redirect_with_message(
            ManageAction::ExternalLogins,
            "The external login was removed.",
            SessionUpdate::SignedIn(token),
        ))
    }

    pub async fn two_factor_authentication(
        &self,
        user_id: Uuid,
    ) -> Result<ManageOutcome<TwoFactorAuthenticationViewModel>, AppError> {
        let user = self.load_user(user_id).await?;
        let model = self.two_factor_view_models.create(&user).await?;
        Ok(ManageOutcome::view("TwoFactorAuthentication", model))
    }

    pub async fn disable_2fa_warning(
        &self,
        user_id: Uuid,
    ) -> Result<ManageOutcome<ConfirmationViewModel>, AppError> {
        let user = self.load_user(user_id).await?;
        if !user.two_factor_enabled {
            return Err(AppError::Unexpected(format!(
                "Unexpected error occurred disabling 2FA for user with ID '{}'.",
                user.id
            )));
        }
        Ok(ManageOutcome::view("Disable2fa", ConfirmationViewModel {}))
    }

    pub async fn disable_2fa(&self, user_id: Uuid) -> Result<ManageOutcome<()>, AppError> {
        let user = self.load_user(user_id).await?;
        let disabled = user.two_factor_enabled
            && self
                .user_manager
                .set_two_factor_enabled(&user, false)
                .await?
                .is_ok();
        if !disabled {
            return Err(AppError::Unexpected(format!(
                "Unexpected error occurred disabling 2FA for user with ID '{}'.",
                user.id
            )));
        }

        info!("User with ID {} has disabled 2fa.", user.id);
        Ok(ManageOutcome::redirect(ManageAction::TwoFactorAuthentication))
    }

    /// Shows the shared key and QR URI, creating a key when the user has none.
    pub async fn enable_authenticator_form(
        &self,
        user_id: Uuid,
    ) -> Result<ManageOutcome<EnableAuthenticatorViewModel>, AppError> {
        let user = self.load_user(user_id).await?;
        let key = match self.user_manager.get_authenticator_key(&user).await? {
            Some(key) => key,
            None => {
                if self.user_manager.reset_authenticator_key(&user).await?.is_err() {
                    return Err(AppError::Unexpected(format!(
                        "Unexpected error occurred resetting the authenticator key for user with ID '{}'.",
                        user.id
                    )));
                }
                self.user_manager
                    .get_authenticator_key(&user)
                    .await?
                    .ok_or_else(|| {
                        AppError::Unexpected(format!(
                            "Unable to load the authenticator key for user with ID '{}'.",
                            user.id
                        ))
                    })?
            }
        };

        let model = self
            .enable_authenticator_view_models
            .create(&user.email, &key);
        Ok(ManageOutcome::view("EnableAuthenticator", model))
    }

    pub async fn enable_authenticator(
        &self,
        user_id: Uuid,
        model: EnableAuthenticatorViewModel,
    ) -> Result<ManageOutcome<EnableAuthenticatorViewModel>, AppError> {
        if let Err(errors) = model.validate() {
            return Ok(ManageOutcome::invalid(
                "EnableAuthenticator",
                model,
                errors.into(),
            ));
        }
        let user = self.load_user(user_id).await?;

        let code = model.code.replace([' ', '-'], "");
        if !self
            .user_manager
            .verify_authenticator_token(&user, &code)
            .await?
        {
            let mut errors = ModelState::default();
            errors.add_model_error("code", "Verification code is invalid.");
            return Ok(ManageOutcome::invalid("EnableAuthenticator", model, errors));
        }

        if self
            .user_manager
            .set_two_factor_enabled(&user, true)
            .await?
            .is_err()
        {
            return Err(AppError::Unexpected(format!(
                "Unexpected error occurred enabling 2FA for user with ID '{}'.",
                user.id
            )));
        }
        info!("User with ID {} has enabled 2FA with an authenticator app.", user.id);
        Ok(ManageOutcome::redirect(ManageAction::GenerateRecoveryCodes))
    }

    pub fn reset_authenticator_warning(&self) -> ManageOutcome<ConfirmationViewModel> {
        ManageOutcome::view("ResetAuthenticator", ConfirmationViewModel {})
    }

    pub async fn reset_authenticator(&self, user_id: Uuid) -> Result<ManageOutcome<()>, AppError> {
        let user = self.load_user(user_id).await?;
        let disabled = self.user_manager.set_two_factor_enabled(&user, false).await?;
        let reset = self.user_manager.reset_authenticator_key(&user).await?;
        if disabled.is_err() || reset.is_err() {
            return Err(AppError::Unexpected(format!(
                "Unexpected error occurred resetting the authenticator for user with ID '{}'.",
                user.id
            )));
        }

        info!("User with id '{}' has reset their authentication app key.", user.id);
        Ok(ManageOutcome::redirect(ManageAction::EnableAuthenticator))
    }

    pub async fn generate_recovery_codes(
        &self,
        user_id: Uuid,
    ) -> Result<ManageOutcome<GenerateRecoveryCodesViewModel>, AppError> {
        let user = self.load_user(user_id).await?;
        if !user.two_factor_enabled {
            return Err(AppError::Unexpected(format!(
                "Cannot generate recovery codes for user with ID '{}' as they do not have 2FA enabled.",
                user.id
            )));
        }

        let recovery_codes = self
            .user_manager
            .generate_recovery_codes(&user, RECOVERY_CODE_COUNT)
            .await?;
        info!("User with ID {} has generated new 2FA recovery codes.", user.id);
        Ok(ManageOutcome::view(
            "GenerateRecoveryCodes",
            GenerateRecoveryCodesViewModel { recovery_codes },
        ))
    }
}
