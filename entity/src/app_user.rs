//! `SeaORM` Entity, generated for app_user

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Deserialize, Serialize)]
#[sea_orm(table_name = "app_user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub museum_id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub email_confirmed: bool,
    pub phone_number: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub two_factor_enabled: bool,
    #[serde(skip_serializing)]
    pub authenticator_key: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::museum::Entity",
        from = "Column::MuseumId",
        to = "super::museum::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Museum,
    #[sea_orm(has_many = "super::user_login::Entity")]
    UserLogin,
    #[sea_orm(has_many = "super::user_recovery_code::Entity")]
    UserRecoveryCode,
}

impl Related<super::museum::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Museum.def()
    }
}

impl Related<super::user_login::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserLogin.def()
    }
}

impl Related<super::user_recovery_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRecoveryCode.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
