//! `SeaORM` Entity, generated for artist_subject_matter

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Deserialize, Serialize)]
#[sea_orm(table_name = "artist_subject_matter")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub artist_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub subject_matter_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::artist::Entity",
        from = "Column::ArtistId",
        to = "super::artist::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Artist,
    #[sea_orm(
        belongs_to = "super::subject_matter::Entity",
        from = "Column::SubjectMatterId",
        to = "super::subject_matter::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    SubjectMatter,
}

impl Related<super::artist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artist.def()
    }
}

impl Related<super::subject_matter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectMatter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
