//! Service layer for the museum-scoped collection resources.
//!
//! Every resource shares the same list, get, create, update and delete flow.
//! The tenant always comes from the caller's account, never from the payload.

use crate::error::AppError;
use crate::models::auth::AuthenticatedUser;
use crate::models::resources::{MuseumResource, Reference};
use crate::repos::capabilities::{IdentifiedEntity, MuseumScopedEntity};
use crate::repos::museum_repo::{MuseumRepo, RepoError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use entity::{
    acquisition, artist, country, exhibition, genre, insurance_policy, location, medium, museum,
    subgenre, subject_matter, unit_of_measure,
};
use sea_orm::{ActiveModelTrait, ConnectionTrait};
use tracing::info;

#[derive(Clone)]
pub struct MuseumService {
    pub repo: MuseumRepo,
}

/// Checks that every referenced row exists and, unless it is global reference
/// data, belongs to `museum`.
pub async fn ensure_references_exist<C: ConnectionTrait>(
    repo: &MuseumRepo<C>,
    museum: &museum::Model,
    references: &[Reference],
) -> Result<(), AppError> {
    for reference in references {
        let found = match *reference {
            Reference::Artist(id) => repo
                .get_scoped_entity::<artist::Entity>(museum, id)
                .await?
                .is_some(),
            Reference::Medium(id) => repo
                .get_scoped_entity::<medium::Entity>(museum, id)
                .await?
                .is_some(),
            Reference::Genre(id) => repo
                .get_scoped_entity::<genre::Entity>(museum, id)
                .await?
                .is_some(),
            Reference::Subgenre(id) => repo
                .get_scoped_entity::<subgenre::Entity>(museum, id)
                .await?
                .is_some(),
            Reference::SubjectMatter(id) => repo
                .get_scoped_entity::<subject_matter::Entity>(museum, id)
                .await?
                .is_some(),
            Reference::Acquisition(id) => repo
                .get_scoped_entity::<acquisition::Entity>(museum, id)
                .await?
                .is_some(),
            Reference::Location(id) => repo
                .get_scoped_entity::<location::Entity>(museum, id)
                .await?
                .is_some(),
            Reference::Exhibition(id) => repo
                .get_scoped_entity::<exhibition::Entity>(museum, id)
                .await?
                .is_some(),
            Reference::InsurancePolicy(id) => repo
                .get_scoped_entity::<insurance_policy::Entity>(museum, id)
                .await?
                .is_some(),
            Reference::Country(id) => repo.entity_exists::<country::Entity>(id).await?,
            Reference::UnitOfMeasure(id) => {
                repo.entity_exists::<unit_of_measure::Entity>(id).await?
            }
        };
        if !found {
            return Err(AppError::BadRequest(format!("{reference} does not exist")));
        }
    }
    Ok(())
}

impl MuseumService {
    /// Lists the caller's rows of one resource, ordered by id.
    pub async fn list<R: MuseumResource>(self, user: AuthenticatedUser) -> Result<Response, AppError> {
        info!("Listing {} rows for museum {}", R::LABEL, user.museum_id);
        let museum = self.repo.get_museum(&user).await?;
        let rows = self
            .repo
            .get_entities_as_no_tracking::<R::Entity>(&museum)
            .await?;
        Ok(Json(rows).into_response())
    }

    /// Retrieves a single row. Rows owned by another museum are reported as
    /// missing.
    pub async fn get_one<R: MuseumResource>(
        self,
        user: AuthenticatedUser,
        id: i32,
    ) -> Result<Response, AppError> {
        info!("Getting {} with id {}", R::LABEL, id);
        let museum = self.repo.get_museum(&user).await?;
        match self.repo.get_scoped_entity::<R::Entity>(&museum, id).await? {
            Some(row) => Ok(Json(row).into_response()),
            None => Ok((StatusCode::NOT_FOUND, format!("{} not found", R::LABEL)).into_response()),
        }
    }

    pub async fn create_one<R: MuseumResource>(
        self,
        user: AuthenticatedUser,
        payload: R::Payload,
    ) -> Result<Response, AppError> {
        let museum = self.repo.get_museum(&user).await?;
        ensure_references_exist(&self.repo, &museum, &R::references(&payload)).await?;
        let created = self.repo.insert_scoped(&museum, R::build(payload)).await?;
        info!("Created {} for museum {}", R::LABEL, museum.id);
        Ok((StatusCode::CREATED, Json(created)).into_response())
    }

    /// Replaces every stored field of a row the caller's museum owns.
    pub async fn update_one<R: MuseumResource>(
        self,
        user: AuthenticatedUser,
        id: i32,
        payload: R::Payload,
    ) -> Result<Response, AppError> {
        let museum = self.repo.get_museum(&user).await?;
        if self
            .repo
            .get_scoped_entity::<R::Entity>(&museum, id)
            .await?
            .is_none()
        {
            return Err(RepoError::NotFound {
                entity: R::LABEL.to_string(),
                id: id.to_string(),
            }
            .into());
        }
        ensure_references_exist(&self.repo, &museum, &R::references(&payload)).await?;

        let mut active_model = R::build(payload);
        active_model.set(R::Entity::id_column(), id.into());
        active_model.set(R::Entity::museum_column(), museum.id.into());
        let updated = self.repo.update(active_model).await?;
        info!("Updated {} with id {}", R::LABEL, id);
        Ok(Json(updated).into_response())
    }

    pub async fn delete_one<R: MuseumResource>(
        self,
        user: AuthenticatedUser,
        id: i32,
    ) -> Result<Response, AppError> {
        let museum = self.repo.get_museum(&user).await?;
        self.repo.delete_scoped::<R::Entity>(&museum, id).await?;
        info!("Deleted {} with id {}", R::LABEL, id);
        Ok((StatusCode::OK, format!("{} deleted", R::LABEL)).into_response())
    }

    pub async fn list_countries(self) -> Result<Response, AppError> {
        let countries = self
            .repo
            .get_all_entities_as_no_tracking::<country::Entity>()
            .await?;
        Ok(Json(countries).into_response())
    }

    pub async fn list_units_of_measure(self) -> Result<Response, AppError> {
        let units = self
            .repo
            .get_all_entities_as_no_tracking::<unit_of_measure::Entity>()
            .await?;
        Ok(Json(units).into_response())
    }

    /// The museum the caller works for.
    pub async fn get_museum(self, user: AuthenticatedUser) -> Result<Response, AppError> {
        let museum = self.repo.get_museum(&user).await?;
        Ok(Json(museum).into_response())
    }
}
