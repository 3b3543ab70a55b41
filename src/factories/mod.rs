//! Factories that build unsaved reference rows from user-supplied names.
//!
//! The piece-creation workflow uses these when the caller types a new genre,
//! subgenre, medium or subject matter instead of picking an existing one.

use entity::{genre, medium, subgenre, subject_matter};
use sea_orm::ActiveValue::{NotSet, Set};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FactoryError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("museum id {0} is not valid")]
    InvalidMuseum(i32),
}

fn validated_name(name: &str, museum_id: i32) -> Result<String, FactoryError> {
    if museum_id <= 0 {
        return Err(FactoryError::InvalidMuseum(museum_id));
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(FactoryError::EmptyName);
    }
    Ok(name.to_string())
}

pub trait SubgenreFactory: Send + Sync {
    fn create(&self, name: &str, museum_id: i32) -> Result<subgenre::ActiveModel, FactoryError>;
}

pub trait GenreFactory: Send + Sync {
    fn create(&self, name: &str, museum_id: i32) -> Result<genre::ActiveModel, FactoryError>;
}

pub trait MediumFactory: Send + Sync {
    fn create(&self, name: &str, museum_id: i32) -> Result<medium::ActiveModel, FactoryError>;
}

pub trait SubjectMatterFactory: Send + Sync {
    fn create(
        &self,
        name: &str,
        museum_id: i32,
    ) -> Result<subject_matter::ActiveModel, FactoryError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSubgenreFactory;

impl SubgenreFactory for DefaultSubgenreFactory {
    fn create(&self, name: &str, museum_id: i32) -> Result<subgenre::ActiveModel, FactoryError> {
        Ok(subgenre::ActiveModel {
            id: NotSet,
            museum_id: Set(museum_id),
            name: Set(validated_name(name, museum_id)?),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultGenreFactory;

impl GenreFactory for DefaultGenreFactory {
    fn create(&self, name: &str, museum_id: i32) -> Result<genre::ActiveModel, FactoryError> {
        Ok(genre::ActiveModel {
            id: NotSet,
            museum_id: Set(museum_id),
            name: Set(validated_name(name, museum_id)?),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMediumFactory;

impl MediumFactory for DefaultMediumFactory {
    fn create(&self, name: &str, museum_id: i32) -> Result<medium::ActiveModel, FactoryError> {
        Ok(medium::ActiveModel {
            id: NotSet,
            museum_id: Set(museum_id),
            name: Set(validated_name(name, museum_id)?),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSubjectMatterFactory;

impl SubjectMatterFactory for DefaultSubjectMatterFactory {
    fn create(
        &self,
        name: &str,
        museum_id: i32,
    ) -> Result<subject_matter::ActiveModel, FactoryError> {
        Ok(subject_matter::ActiveModel {
            id: NotSet,
            museum_id: Set(museum_id),
            name: Set(validated_name(name, museum_id)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn subgenre_factory_trims_name_and_leaves_id_unset() {
        let model = DefaultSubgenreFactory.create("  Impressionism ", 3).unwrap();
        assert_eq!(model.name, Set("Impressionism".to_string()));
        assert_eq!(model.museum_id, Set(3));
        assert_eq!(model.id, NotSet);
    }

    #[test]
    fn empty_names_are_rejected() {
        assert_eq!(
            DefaultSubgenreFactory.create("   ", 1).unwrap_err(),
            FactoryError::EmptyName
        );
        assert_eq!(
            DefaultGenreFactory.create("", 1).unwrap_err(),
            FactoryError::EmptyName
        );
    }

    #[test]
    fn non_positive_museum_is_rejected() {
        assert_eq!(
            DefaultMediumFactory.create("Oil on canvas", 0).unwrap_err(),
            FactoryError::InvalidMuseum(0)
        );
        assert_eq!(
            DefaultSubjectMatterFactory.create("Portraiture", -4).unwrap_err(),
            FactoryError::InvalidMuseum(-4)
        );
    }
}
