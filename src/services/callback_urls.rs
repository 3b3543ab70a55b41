use crate::models::manage::ManageAction;
use url::form_urlencoded;
use uuid::Uuid;

pub const CONFIRM_EMAIL_PATH: &str = "/api/v1/account/confirm-email";

/// Absolute links handed to mail recipients and external login providers.
#[derive(Debug, Clone)]
pub struct CallbackUrls {
    pub base_url: String,
}

impl CallbackUrls {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn email_confirmation_link(&self, user_id: Uuid, code: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("user_id", &user_id.to_string())
            .append_pair("code", code)
            .finish();
        format!("{}{CONFIRM_EMAIL_PATH}?{query}", self.base_url)
    }

    pub fn link_login_callback(&self) -> String {
        format!("{}{}", self.base_url, ManageAction::LinkLoginCallback.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_links_under_the_base_url() {
        let urls = CallbackUrls::new("https://collections.example.org/");
        let user_id = Uuid::nil();
        assert_eq!(
            urls.email_confirmation_link(user_id, "a+b/c"),
            "https://collections.example.org/api/v1/account/confirm-email?user_id=00000000-0000-0000-0000-000000000000&code=a%2Bb%2Fc"
        );
        assert_eq!(
            urls.link_login_callback(),
            "https://collections.example.org/api/v1/manage/link-login-callback"
        );
    }
}
