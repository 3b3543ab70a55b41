//! Capabilities an entity must have to be stored through [`MuseumRepo`].
//!
//! [`MuseumRepo`]: super::museum_repo::MuseumRepo

use crate::models::auth::AuthenticatedUser;
use entity::{
    acquisition, artist, country, exhibition, genre, inspector, insurance_policy, loan, location,
    medium, museum, piece, subgenre, subject_matter, unit_of_measure,
};
use sea_orm::EntityTrait;

/// An entity with a single integer identity column.
pub trait IdentifiedEntity: EntityTrait<Model: Send + Sync> {
    fn id_column() -> Self::Column;
}

/// An entity whose rows each belong to exactly one museum.
pub trait MuseumScopedEntity: IdentifiedEntity {
    fn museum_column() -> Self::Column;
}

/// A loaded row that knows its owning museum.
pub trait MuseumOwned {
    fn museum_id(&self) -> i32;
}

impl IdentifiedEntity for museum::Entity {
    fn id_column() -> Self::Column {
        museum::Column::Id
    }
}

impl IdentifiedEntity for country::Entity {
    fn id_column() -> Self::Column {
        country::Column::Id
    }
}

impl IdentifiedEntity for unit_of_measure::Entity {
    fn id_column() -> Self::Column {
        unit_of_measure::Column::Id
    }
}

macro_rules! museum_scoped {
    ($($module:ident),+ $(,)?) => {
        $(
            impl IdentifiedEntity for $module::Entity {
                fn id_column() -> Self::Column {
                    $module::Column::Id
                }
            }

            impl MuseumScopedEntity for $module::Entity {
                fn museum_column() -> Self::Column {
                    $module::Column::MuseumId
                }
            }

            impl MuseumOwned for $module::Model {
                fn museum_id(&self) -> i32 {
                    self.museum_id
                }
            }
        )+
    };
}

museum_scoped!(
    acquisition,
    artist,
    exhibition,
    genre,
    inspector,
    insurance_policy,
    loan,
    location,
    medium,
    piece,
    subgenre,
    subject_matter,
);

impl MuseumOwned for AuthenticatedUser {
    fn museum_id(&self) -> i32 {
        self.museum_id
    }
}
