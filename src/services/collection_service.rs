//! Service layer for the collection workflows that span several tables.
//!
//! Creating a piece may also create its artist, classification rows,
//! acquisition and insurance policy. All of them are written in one unit of work so a failure
//! part way through leaves nothing behind. Association endpoints link pieces
//! to exhibitions and loans, and subject matters to artists.

use crate::error::AppError;
use crate::factories::{GenreFactory, MediumFactory, SubgenreFactory, SubjectMatterFactory};
use crate::models::auth::AuthenticatedUser;
use crate::models::request::CreatePieceRequest;
use crate::models::resources::{
    AcquisitionResource, ArtistResource, InsurancePolicyResource, MuseumResource, PieceResource,
};
use crate::repos::capabilities::MuseumScopedEntity;
use crate::repos::museum_repo::{ModelOf, MuseumRepo, RepoError};
use crate::services::museum_service::ensure_references_exist;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use entity::{
    artist, artist_subject_matter, exhibition, exhibition_piece, loan, loan_piece, museum, piece,
    subject_matter,
};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction,
    IntoActiveModel,
};
use std::sync::Arc;
use tracing::{error, info};

/// Uses dynamic traits for dependency injection
#[derive(Clone)]
pub struct CollectionService {
    pub repo: MuseumRepo,
    pub genre_factory: Arc<dyn GenreFactory>,
    pub subgenre_factory: Arc<dyn SubgenreFactory>,
    pub medium_factory: Arc<dyn MediumFactory>,
    pub subject_matter_factory: Arc<dyn SubjectMatterFactory>,
}

/// One side of an association, named for error messages.
struct Side {
    label: &'static str,
    id: i32,
}

impl CollectionService {
    /// Creates a piece and any new reference rows in a single transaction.
    ///
    /// # Returns
    /// `201` with the stored piece, or the first error met. Nothing is
    /// committed unless every row was written.
    pub async fn create_piece(
        self,
        user: AuthenticatedUser,
        payload: CreatePieceRequest,
    ) -> Result<Response, AppError> {
        let museum = self.repo.get_museum(&user).await?;
        let unit_of_work = self.repo.begin().await?;
        let created = match self
            .insert_piece_with_references(&unit_of_work, &museum, payload)
            .await
        {
            Ok(created) => created,
            Err(err) => {
                if let Err(rollback_err) = unit_of_work.rollback().await {
                    error!(%rollback_err, "Error rolling back piece creation");
                }
                return Err(err);
            }
        };
        unit_of_work.commit().await?;
        info!(
            "Created piece {} with title '{}' for museum {}",
            created.id, created.title, museum.id
        );
        Ok((StatusCode::CREATED, Json(created)).into_response())
    }

    async fn insert_piece_with_references(
        &self,
        unit_of_work: &MuseumRepo<DatabaseTransaction>,
        museum: &museum::Model,
        payload: CreatePieceRequest,
    ) -> Result<piece::Model, AppError> {
        let CreatePieceRequest {
            piece: mut request,
            new_artist,
            new_medium,
            new_genre,
            new_subgenre,
            new_subject_matter,
            new_acquisition,
            new_insurance_policy,
        } = payload;
        ensure_references_exist(unit_of_work, museum, &PieceResource::references(&request)).await?;

        if let Some(new_artist) = new_artist {
            ensure_references_exist(
                unit_of_work,
                museum,
                &ArtistResource::references(&new_artist),
            )
            .await?;
            let artist = unit_of_work
                .insert_scoped(museum, ArtistResource::build(new_artist))
                .await?;
            request.artist_id = Some(artist.id);
        }
        if let Some(name) = new_medium {
            let medium = unit_of_work
                .insert_scoped(museum, self.medium_factory.create(&name, museum.id)?)
                .await?;
            request.medium_id = Some(medium.id);
        }
        if let Some(name) = new_genre {
            let genre = unit_of_work
                .insert_scoped(museum, self.genre_factory.create(&name, museum.id)?)
                .await?;
            request.genre_id = Some(genre.id);
        }
        if let Some(name) = new_subgenre {
            let subgenre = unit_of_work
                .insert_scoped(museum, self.subgenre_factory.create(&name, museum.id)?)
                .await?;
            request.subgenre_id = Some(subgenre.id);
        }
        if let Some(name) = new_subject_matter {
            let subject_matter = unit_of_work
                .insert_scoped(museum, self.subject_matter_factory.create(&name, museum.id)?)
                .await?;
            request.subject_matter_id = Some(subject_matter.id);
        }
        if let Some(new_acquisition) = new_acquisition {
            let acquisition = unit_of_work
                .insert_scoped(museum, AcquisitionResource::build(new_acquisition))
                .await?;
            request.acquisition_id = Some(acquisition.id);
        }
        if let Some(new_policy) = new_insurance_policy {
            let policy = unit_of_work
                .insert_scoped(museum, InsurancePolicyResource::build(new_policy))
                .await?;
            request.insurance_policy_id = Some(policy.id);
        }

        Ok(unit_of_work
            .insert_scoped(museum, PieceResource::build(request))
            .await?)
    }

    async fn require<E: MuseumScopedEntity>(
        &self,
        museum: &museum::Model,
        side: &Side,
    ) -> Result<(), AppError> {
        if self
            .repo
            .get_scoped_entity::<E>(museum, side.id)
            .await?
            .is_none()
        {
            return Err(RepoError::NotFound {
                entity: side.label.to_string(),
                id: side.id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn link<P, C, A>(
        &self,
        user: AuthenticatedUser,
        parent: Side,
        child: Side,
        condition: Condition,
        link: A,
    ) -> Result<Response, AppError>
    where
        P: MuseumScopedEntity,
        C: MuseumScopedEntity,
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        ModelOf<A::Entity>: IntoActiveModel<A>,
    {
        let museum = self.repo.get_museum(&user).await?;
        self.require::<P>(&museum, &parent).await?;
        self.require::<C>(&museum, &child).await?;

        if !self
            .repo
            .get_matching::<A::Entity>(condition)
            .await?
            .is_empty()
        {
            let message = format!(
                "{} {} is already linked to {} {}",
                child.label, child.id, parent.label, parent.id
            );
            return Ok((StatusCode::OK, message).into_response());
        }
        self.repo.insert(link).await?;
        info!(
            "Linked {} {} to {} {}",
            child.label, child.id, parent.label, parent.id
        );
        let message = format!(
            "{} {} linked to {} {}",
            child.label, child.id, parent.label, parent.id
        );
        Ok((StatusCode::CREATED, message).into_response())
    }

    async fn unlink<P, C, L>(
        &self,
        user: AuthenticatedUser,
        parent: Side,
        child: Side,
        condition: Condition,
    ) -> Result<Response, AppError>
    where
        P: MuseumScopedEntity,
        C: MuseumScopedEntity,
        L: sea_orm::EntityTrait,
    {
        let museum = self.repo.get_museum(&user).await?;
        self.require::<P>(&museum, &parent).await?;
        self.require::<C>(&museum, &child).await?;

        if self.repo.delete_matching::<L>(condition).await? == 0 {
            let message = format!(
                "{} {} is not linked to {} {}",
                child.label, child.id, parent.label, parent.id
            );
            return Ok((StatusCode::NOT_FOUND, message).into_response());
        }
        info!(
            "Unlinked {} {} from {} {}",
            child.label, child.id, parent.label, parent.id
        );
        let message = format!(
            "{} {} unlinked from {} {}",
            child.label, child.id, parent.label, parent.id
        );
        Ok((StatusCode::OK, message).into_response())
    }

    pub async fn add_exhibition_piece(
        self,
        user: AuthenticatedUser,
        exhibition_id: i32,
        piece_id: i32,
    ) -> Result<Response, AppError> {
        self.link::<exhibition::Entity, piece::Entity, _>(
            user,
            Side {
                label: "Exhibition",
                id: exhibition_id,
            },
            Side {
                label: "Piece",
                id: piece_id,
            },
            exhibition_piece_condition(exhibition_id, piece_id),
            exhibition_piece::ActiveModel {
                exhibition_id: Set(exhibition_id),
                piece_id: Set(piece_id),
            },
        )
        .await
    }

    pub async fn remove_exhibition_piece(
        self,
        user: AuthenticatedUser,
        exhibition_id: i32,
        piece_id: i32,
    ) -> Result<Response, AppError> {
        self.unlink::<exhibition::Entity, piece::Entity, exhibition_piece::Entity>(
            user,
            Side {
                label: "Exhibition",
                id: exhibition_id,
            },
            Side {
                label: "Piece",
                id: piece_id,
            },
            exhibition_piece_condition(exhibition_id, piece_id),
        )
        .await
    }

    pub async fn add_loan_piece(
        self,
        user: AuthenticatedUser,
        loan_id: i32,
        piece_id: i32,
    ) -> Result<Response, AppError> {
        self.link::<loan::Entity, piece::Entity, _>(
            user,
            Side {
                label: "Loan",
                id: loan_id,
            },
            Side {
                label: "Piece",
                id: piece_id,
            },
            loan_piece_condition(loan_id, piece_id),
            loan_piece::ActiveModel {
                loan_id: Set(loan_id),
                piece_id: Set(piece_id),
            },
        )
        .await
    }

    pub async fn remove_loan_piece(
        self,
        user: AuthenticatedUser,
        loan_id: i32,
        piece_id: i32,
    ) -> Result<Response, AppError> {
        self.unlink::<loan::Entity, piece::Entity, loan_piece::Entity>(
            user,
            Side {
                label: "Loan",
                id: loan_id,
            },
            Side {
                label: "Piece",
                id: piece_id,
            },
            loan_piece_condition(loan_id, piece_id),
        )
        .await
    }

    pub async fn add_artist_subject_matter(
        self,
        user: AuthenticatedUser,
        artist_id: i32,
        subject_matter_id: i32,
    ) -> Result<Response, AppError> {
        self.link::<artist::Entity, subject_matter::Entity, _>(
            user,
            Side {
                label: "Artist",
                id: artist_id,
            },
            Side {
                label: "Subject matter",
                id: subject_matter_id,
            },
            artist_subject_matter_condition(artist_id, subject_matter_id),
            artist_subject_matter::ActiveModel {
                artist_id: Set(artist_id),
                subject_matter_id: Set(subject_matter_id),
            },
        )
        .await
    }

    pub async fn remove_artist_subject_matter(
        self,
        user: AuthenticatedUser,
        artist_id: i32,
        subject_matter_id: i32,
    ) -> Result<Response, AppError> {
        self.unlink::<artist::Entity, subject_matter::Entity, artist_subject_matter::Entity>(
            user,
            Side {
                label: "Artist",
                id: artist_id,
            },
            Side {
                label: "Subject matter",
                id: subject_matter_id,
            },
            artist_subject_matter_condition(artist_id, subject_matter_id),
        )
        .await
    }
}

fn exhibition_piece_condition(exhibition_id: i32, piece_id: i32) -> Condition {
    Condition::all()
        .add(exhibition_piece::Column::ExhibitionId.eq(exhibition_id))
        .add(exhibition_piece::Column::PieceId.eq(piece_id))
}

fn loan_piece_condition(loan_id: i32, piece_id: i32) -> Condition {
    Condition::all()
        .add(loan_piece::Column::LoanId.eq(loan_id))
        .add(loan_piece::Column::PieceId.eq(piece_id))
}

fn artist_subject_matter_condition(artist_id: i32, subject_matter_id: i32) -> Condition {
    Condition::all()
        .add(artist_subject_matter::Column::ArtistId.eq(artist_id))
        .add(artist_subject_matter::Column::SubjectMatterId.eq(subject_matter_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factories::{
        DefaultGenreFactory, DefaultMediumFactory, DefaultSubgenreFactory,
        DefaultSubjectMatterFactory,
    };
    use crate::test_tools::{seed_museum, setup_test_db};
    use entity::{genre, insurance_policy, medium};
    use rust_decimal::Decimal;
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use uuid::Uuid;

    fn service(repo: MuseumRepo) -> CollectionService {
        CollectionService {
            repo,
            genre_factory: Arc::new(DefaultGenreFactory),
            subgenre_factory: Arc::new(DefaultSubgenreFactory),
            medium_factory: Arc::new(DefaultMediumFactory),
            subject_matter_factory: Arc::new(DefaultSubjectMatterFactory),
        }
    }

    fn caller(museum: &museum::Model) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            museum_id: museum.id,
            email: "registrar@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn create_piece_inserts_new_references_with_the_piece() {
        let repo = MuseumRepo::new(setup_test_db().await);
        let museum = seed_museum(&repo, "Kunsthistorisches").await;
        let payload: CreatePieceRequest = serde_json::from_value(json!({
            "title": "The Tower of Babel",
            "creation_year": 1563,
            "new_artist": { "name": "Pieter Bruegel the Elder" },
            "new_medium": "Oil on panel",
            "new_genre": " Landscape ",
            "new_acquisition": { "piece_source": "Imperial collection" }
        }))
        .unwrap();

        let response = service(repo.clone())
            .create_piece(caller(&museum), payload)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let created: piece::Model = serde_json::from_slice(&body).unwrap();

        let artist = repo
            .get_scoped_entity::<artist::Entity>(&museum, created.artist_id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(artist.name, "Pieter Bruegel the Elder");
        let genre = repo
            .get_scoped_entity::<genre::Entity>(&museum, created.genre_id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(genre.name, "Landscape");
        assert!(created.medium_id.is_some());
        assert!(created.acquisition_id.is_some());
        assert_eq!(created.museum_id, museum.id);
    }

    #[tokio::test]
    async fn create_piece_insures_it_in_the_same_transaction() {
        let repo = MuseumRepo::new(setup_test_db().await);
        let museum = seed_museum(&repo, "Musée de l'Orangerie").await;
        let payload: CreatePieceRequest = serde_json::from_value(json!({
            "title": "Water Lilies",
            "estimated_value": "40000000.10",
            "height": 200.0,
            "width": 425.0,
            "unit_of_measure_id": 3,
            "new_insurance_policy": {
                "policy_number": " FA-1916 ",
                "amount_insured": "45000000.50",
                "carrier": "Lloyd's"
            }
        }))
        .unwrap();

        let response = service(repo.clone())
            .create_piece(caller(&museum), payload)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let created: piece::Model = serde_json::from_slice(&body).unwrap();
        assert_eq!(created.unit_of_measure_id, Some(3));

        let stored = repo
            .get_scoped_entity::<piece::Entity>(&museum, created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.estimated_value, Some(Decimal::new(4_000_000_010, 2)));
        let policy = repo
            .get_scoped_entity::<insurance_policy::Entity>(
                &museum,
                stored.insurance_policy_id.unwrap(),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(policy.policy_number, "FA-1916");
        assert_eq!(policy.amount_insured, Some(Decimal::new(4_500_000_050, 2)));
    }

    #[tokio::test]
    async fn unknown_unit_of_measure_creates_no_policy() {
        let repo = MuseumRepo::new(setup_test_db().await);
        let museum = seed_museum(&repo, "Tate Modern").await;
        let payload: CreatePieceRequest = serde_json::from_value(json!({
            "title": "Fountain",
            "unit_of_measure_id": 99,
            "new_insurance_policy": { "policy_number": "DU-1917" }
        }))
        .unwrap();

        let err = service(repo.clone())
            .create_piece(caller(&museum), payload)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Unit of measure 99 does not exist");

        let policies = repo
            .get_entities::<insurance_policy::Entity>(&museum)
            .await
            .unwrap();
        assert!(policies.is_empty());
    }

    #[tokio::test]
    async fn failed_piece_creation_leaves_no_new_rows() {
        let repo = MuseumRepo::new(setup_test_db().await);
        let museum = seed_museum(&repo, "Hermitage").await;
        let payload: CreatePieceRequest = serde_json::from_value(json!({
            "title": "Danaë",
            "acquisition_id": 404,
            "new_medium": "Oil on canvas"
        }))
        .unwrap();

        let err = service(repo.clone())
            .create_piece(caller(&museum), payload)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let payload: CreatePieceRequest = serde_json::from_value(json!({
            "title": "Danaë",
            "new_medium": "Oil on canvas",
            "new_subgenre": "   "
        }))
        .unwrap();
        let err = service(repo.clone())
            .create_piece(caller(&museum), payload)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let media = repo.get_entities::<medium::Entity>(&museum).await.unwrap();
        assert!(media.is_empty());
        let pieces = repo.get_entities::<piece::Entity>(&museum).await.unwrap();
        assert!(pieces.is_empty());
    }

    #[tokio::test]
    async fn pieces_link_to_exhibitions_once() {
        let repo = MuseumRepo::new(setup_test_db().await);
        let museum = seed_museum(&repo, "National Gallery").await;
        let exhibition = repo
            .insert_scoped(
                &museum,
                exhibition::ActiveModel {
                    name: Set("Sunflowers".to_string()),
                    start_date: Set(chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
                    end_date: Set(chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let piece = repo
            .insert_scoped(
                &museum,
                piece::ActiveModel {
                    title: Set("Sunflowers".to_string()),
                    is_framed: Set(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let service = service(repo.clone());

        let first = service
            .clone()
            .add_exhibition_piece(caller(&museum), exhibition.id, piece.id)
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);
        let second = service
            .clone()
            .add_exhibition_piece(caller(&museum), exhibition.id, piece.id)
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::OK);

        let removed = service
            .clone()
            .remove_exhibition_piece(caller(&museum), exhibition.id, piece.id)
            .await
            .unwrap();
        assert_eq!(removed.status(), StatusCode::OK);
        let missing = service
            .remove_exhibition_piece(caller(&museum), exhibition.id, piece.id)
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn linking_across_museums_is_rejected() {
        let repo = MuseumRepo::new(setup_test_db().await);
        let home = seed_museum(&repo, "Met").await;
        let other = seed_museum(&repo, "MoMA").await;
        let artist = repo
            .insert_scoped(
                &home,
                artist::ActiveModel {
                    name: Set("Claude Monet".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let foreign_subject = repo
            .insert_scoped(
                &other,
                subject_matter::ActiveModel {
                    name: Set("Water lilies".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = service(repo)
            .add_artist_subject_matter(caller(&home), artist.id, foreign_subject.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
