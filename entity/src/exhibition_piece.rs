//! `SeaORM` Entity, generated for exhibition_piece

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Deserialize, Serialize)]
#[sea_orm(table_name = "exhibition_piece")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub exhibition_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub piece_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exhibition::Entity",
        from = "Column::ExhibitionId",
        to = "super::exhibition::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Exhibition,
    #[sea_orm(
        belongs_to = "super::piece::Entity",
        from = "Column::PieceId",
        to = "super::piece::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Piece,
}

impl Related<super::exhibition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exhibition.def()
    }
}

impl Related<super::piece::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Piece.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
