//! `SeaORM` Entity, generated for subject_matter

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Deserialize, Serialize)]
#[sea_orm(table_name = "subject_matter")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub museum_id: i32,
    pub name: String,
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
    #[sea_orm(has_many = "super::artist_subject_matter::Entity")]
    ArtistSubjectMatter,
}

impl Related<super::museum::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Museum.def()
    }
}

impl Related<super::artist_subject_matter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArtistSubjectMatter.def()
    }
}

impl Related<super::artist::Entity> for Entity {
    fn to() -> RelationDef {
        super::artist_subject_matter::Relation::Artist.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::artist_subject_matter::Relation::SubjectMatter.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
