//! Response models for the account endpoints. Collection endpoints return the
//! stored rows directly.

use crate::identity::AppUser;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub user_id: Uuid,
    pub museum_id: i32,
    pub email: String,
    pub email_confirmed: bool,
    pub two_factor_enabled: bool,
}

impl From<AppUser> for AccountResponse {
    fn from(user: AppUser) -> Self {
        AccountResponse {
            user_id: user.id,
            museum_id: user.museum_id,
            email: user.email,
            email_confirmed: user.email_confirmed,
            two_factor_enabled: user.two_factor_enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TwoFactorRequiredResponse {
    pub requires_two_factor: bool,
}
