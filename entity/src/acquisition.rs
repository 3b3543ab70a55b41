//! `SeaORM` Entity, generated for acquisition

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Deserialize, Serialize)]
#[sea_orm(table_name = "acquisition")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub museum_id: i32,
    pub date: Option<Date>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub cost: Option<Decimal>,
    pub piece_source: Option<String>,
    pub funding_source: Option<String>,
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
    #[sea_orm(has_many = "super::piece::Entity")]
    Piece,
}

impl Related<super::museum::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Museum.def()
    }
}

impl Related<super::piece::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Piece.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
