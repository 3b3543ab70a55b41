//! `SeaORM` Entity, generated for piece

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "piece")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub museum_id: i32,
    pub accession_number: Option<String>,
    pub title: String,
    pub subject: Option<String>,
    pub artist_id: Option<i32>,
    pub medium_id: Option<i32>,
    pub genre_id: Option<i32>,
    pub subgenre_id: Option<i32>,
    pub subject_matter_id: Option<i32>,
    pub acquisition_id: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub estimated_value: Option<Decimal>,
    pub is_framed: bool,
    pub creation_year: Option<i32>,
    pub creation_month: Option<i32>,
    pub creation_day: Option<i32>,
    pub origin_city: Option<String>,
    pub origin_state: Option<String>,
    pub origin_country_id: Option<i32>,
    #[sea_orm(column_type = "Double", nullable)]
    pub height: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub width: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub depth: Option<f64>,
    pub unit_of_measure_id: Option<i32>,
    pub copyright_year: Option<i32>,
    pub copyright_owner: Option<String>,
    pub insurance_policy_id: Option<i32>,
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
        belongs_to = "super::artist::Entity",
        from = "Column::ArtistId",
        to = "super::artist::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Artist,
    #[sea_orm(
        belongs_to = "super::medium::Entity",
        from = "Column::MediumId",
        to = "super::medium::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Medium,
    #[sea_orm(
        belongs_to = "super::genre::Entity",
        from = "Column::GenreId",
        to = "super::genre::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Genre,
    #[sea_orm(
        belongs_to = "super::subgenre::Entity",
        from = "Column::SubgenreId",
        to = "super::subgenre::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Subgenre,
    #[sea_orm(
        belongs_to = "super::subject_matter::Entity",
        from = "Column::SubjectMatterId",
        to = "super::subject_matter::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    SubjectMatter,
    #[sea_orm(
        belongs_to = "super::acquisition::Entity",
        from = "Column::AcquisitionId",
        to = "super::acquisition::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Acquisition,
    #[sea_orm(
        belongs_to = "super::country::Entity",
        from = "Column::OriginCountryId",
        to = "super::country::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Country,
    #[sea_orm(
        belongs_to = "super::unit_of_measure::Entity",
        from = "Column::UnitOfMeasureId",
        to = "super::unit_of_measure::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    UnitOfMeasure,
    #[sea_orm(
        belongs_to = "super::insurance_policy::Entity",
        from = "Column::InsurancePolicyId",
        to = "super::insurance_policy::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    InsurancePolicy,
    #[sea_orm(has_many = "super::exhibition_piece::Entity")]
    ExhibitionPiece,
    #[sea_orm(has_many = "super::loan_piece::Entity")]
    LoanPiece,
}

impl Related<super::museum::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Museum.def()
    }
}

impl Related<super::artist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artist.def()
    }
}

impl Related<super::medium::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Medium.def()
    }
}

impl Related<super::genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Genre.def()
    }
}

impl Related<super::subgenre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subgenre.def()
    }
}

impl Related<super::subject_matter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectMatter.def()
    }
}

impl Related<super::acquisition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Acquisition.def()
    }
}

impl Related<super::country::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Country.def()
    }
}

impl Related<super::unit_of_measure::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UnitOfMeasure.def()
    }
}

impl Related<super::insurance_policy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InsurancePolicy.def()
    }
}

impl Related<super::exhibition_piece::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExhibitionPiece.def()
    }
}

impl Related<super::loan_piece::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanPiece.def()
    }
}

impl Related<super::exhibition::Entity> for Entity {
    fn to() -> RelationDef {
        super::exhibition_piece::Relation::Exhibition.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::exhibition_piece::Relation::Piece.def().rev())
    }
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        super::loan_piece::Relation::Loan.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::loan_piece::Relation::Piece.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
