//! `SeaORM` Entity, generated for exhibition

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Deserialize, Serialize)]
#[sea_orm(table_name = "exhibition")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub museum_id: i32,
    pub name: String,
    pub curator: Option<String>,
    pub theme: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    pub location_id: Option<i32>,
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
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Location,
    #[sea_orm(has_many = "super::exhibition_piece::Entity")]
    ExhibitionPiece,
    #[sea_orm(has_many = "super::loan::Entity")]
    Loan,
}

impl Related<super::museum::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Museum.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::exhibition_piece::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExhibitionPiece.def()
    }
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loan.def()
    }
}

impl Related<super::piece::Entity> for Entity {
    fn to() -> RelationDef {
        super::exhibition_piece::Relation::Piece.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::exhibition_piece::Relation::Exhibition.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
