//! `SeaORM` Entity, generated for artist

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Deserialize, Serialize)]
#[sea_orm(table_name = "artist")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub museum_id: i32,
    pub name: String,
    pub also_known_as: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country_id: Option<i32>,
    pub birthdate: Option<Date>,
    pub deathdate: Option<Date>,
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
    #[sea_orm(
        belongs_to = "super::country::Entity",
        from = "Column::CountryId",
        to = "super::country::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Country,
    #[sea_orm(has_many = "super::piece::Entity")]
    Piece,
    #[sea_orm(has_many = "super::artist_subject_matter::Entity")]
    ArtistSubjectMatter,
}

impl Related<super::museum::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Museum.def()
    }
}

impl Related<super::country::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Country.def()
    }
}

impl Related<super::piece::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Piece.def()
    }
}

impl Related<super::artist_subject_matter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArtistSubjectMatter.def()
    }
}

impl Related<super::subject_matter::Entity> for Entity {
    fn to() -> RelationDef {
        super::artist_subject_matter::Relation::SubjectMatter.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::artist_subject_matter::Relation::Artist.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
