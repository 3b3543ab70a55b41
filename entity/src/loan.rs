//! `SeaORM` Entity, generated for loan

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Deserialize, Serialize)]
#[sea_orm(table_name = "loan")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub museum_id: i32,
    pub from_location_id: Option<i32>,
    pub to_location_id: Option<i32>,
    pub from_date: Date,
    pub to_date: Date,
    pub exhibition_id: Option<i32>,
    pub terms: Option<String>,
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
        from = "Column::FromLocationId",
        to = "super::location::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    FromLocation,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::ToLocationId",
        to = "super::location::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    ToLocation,
    #[sea_orm(
        belongs_to = "super::exhibition::Entity",
        from = "Column::ExhibitionId",
        to = "super::exhibition::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Exhibition,
    #[sea_orm(has_many = "super::loan_piece::Entity")]
    LoanPiece,
}

impl Related<super::museum::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Museum.def()
    }
}

impl Related<super::exhibition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exhibition.def()
    }
}

impl Related<super::loan_piece::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanPiece.def()
    }
}

impl Related<super::piece::Entity> for Entity {
    fn to() -> RelationDef {
        super::loan_piece::Relation::Piece.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::loan_piece::Relation::Loan.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
