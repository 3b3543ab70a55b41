//! Binds each museum-scoped entity to its request payload so one set of
//! generic handlers can serve every collection endpoint.

use crate::models::request::{
    AcquisitionRequest, ArtistRequest, ExhibitionRequest, InsurancePolicyRequest, LoanRequest,
    LocationRequest, NamedEntityRequest, PieceRequest,
};
use crate::repos::capabilities::{MuseumOwned, MuseumScopedEntity};
use entity::{
    acquisition, artist, exhibition, genre, inspector, insurance_policy, loan, location, medium,
    piece, subgenre, subject_matter,
};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, EntityTrait, FromQueryResult, IntoActiveModel,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use validator::Validate;

/// A row another row points at. Each one must resolve inside the caller's
/// museum (countries and units of measure are global and only need to exist).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Artist(i32),
    Medium(i32),
    Genre(i32),
    Subgenre(i32),
    SubjectMatter(i32),
    Acquisition(i32),
    Location(i32),
    Exhibition(i32),
    InsurancePolicy(i32),
    Country(i32),
    UnitOfMeasure(i32),
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, id) = match *self {
            Reference::Artist(id) => ("Artist", id),
            Reference::Medium(id) => ("Medium", id),
            Reference::Genre(id) => ("Genre", id),
            Reference::Subgenre(id) => ("Subgenre", id),
            Reference::SubjectMatter(id) => ("Subject matter", id),
            Reference::Acquisition(id) => ("Acquisition", id),
            Reference::Location(id) => ("Location", id),
            Reference::Exhibition(id) => ("Exhibition", id),
            Reference::InsurancePolicy(id) => ("Insurance policy", id),
            Reference::Country(id) => ("Country", id),
            Reference::UnitOfMeasure(id) => ("Unit of measure", id),
        };
        write!(f, "{kind} {id}")
    }
}

pub trait MuseumResource: Send + Sync + 'static {
    type Entity: MuseumScopedEntity + EntityTrait<Model = Self::Model>;
    type Model: MuseumOwned
        + FromQueryResult
        + Serialize
        + IntoActiveModel<Self::ActiveModel>
        + Send
        + Sync
        + 'static;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + Send
        + 'static;
    type Payload: DeserializeOwned + Validate + Send + 'static;

    /// Singular name used in responses, e.g. "Artist".
    const LABEL: &'static str;

    /// An unsaved row built from the payload, with `id` and `museum_id` unset.
    fn build(payload: Self::Payload) -> Self::ActiveModel;

    fn references(_payload: &Self::Payload) -> Vec<Reference> {
        Vec::new()
    }
}

fn present<const N: usize>(references: [Option<Reference>; N]) -> Vec<Reference> {
    references.into_iter().flatten().collect()
}

pub struct ArtistResource;

impl MuseumResource for ArtistResource {
    type Entity = artist::Entity;
    type Model = artist::Model;
    type ActiveModel = artist::ActiveModel;
    type Payload = ArtistRequest;
    const LABEL: &'static str = "Artist";

    fn build(payload: ArtistRequest) -> artist::ActiveModel {
        artist::ActiveModel {
            id: NotSet,
            museum_id: NotSet,
            name: Set(payload.name.trim().to_string()),
            also_known_as: Set(payload.also_known_as),
            city: Set(payload.city),
            state: Set(payload.state),
            country_id: Set(payload.country_id),
            birthdate: Set(payload.birthdate),
            deathdate: Set(payload.deathdate),
        }
    }

    fn references(payload: &ArtistRequest) -> Vec<Reference> {
        present([payload.country_id.map(Reference::Country)])
    }
}

pub struct LocationResource;

impl MuseumResource for LocationResource {
    type Entity = location::Entity;
    type Model = location::Model;
    type ActiveModel = location::ActiveModel;
    type Payload = LocationRequest;
    const LABEL: &'static str = "Location";

    fn build(payload: LocationRequest) -> location::ActiveModel {
        location::ActiveModel {
            id: NotSet,
            museum_id: NotSet,
            name: Set(payload.name.trim().to_string()),
            address1: Set(payload.address1),
            address2: Set(payload.address2),
            city: Set(payload.city),
            state: Set(payload.state),
            zip_code: Set(payload.zip_code),
            country_id: Set(payload.country_id),
        }
    }

    fn references(payload: &LocationRequest) -> Vec<Reference> {
        present([payload.country_id.map(Reference::Country)])
    }
}

pub struct AcquisitionResource;

impl MuseumResource for AcquisitionResource {
    type Entity = acquisition::Entity;
    type Model = acquisition::Model;
    type ActiveModel = acquisition::ActiveModel;
    type Payload = AcquisitionRequest;
    const LABEL: &'static str = "Acquisition";

    fn build(payload: AcquisitionRequest) -> acquisition::ActiveModel {
        acquisition::ActiveModel {
            id: NotSet,
            museum_id: NotSet,
            date: Set(payload.date),
            cost: Set(payload.cost),
            piece_source: Set(payload.piece_source),
            funding_source: Set(payload.funding_source),
            terms: Set(payload.terms),
        }
    }
}

pub struct InsurancePolicyResource;

impl MuseumResource for InsurancePolicyResource {
    type Entity = insurance_policy::Entity;
    type Model = insurance_policy::Model;
    type ActiveModel = insurance_policy::ActiveModel;
    type Payload = InsurancePolicyRequest;
    const LABEL: &'static str = "Insurance policy";

    fn build(payload: InsurancePolicyRequest) -> insurance_policy::ActiveModel {
        insurance_policy::ActiveModel {
            id: NotSet,
            museum_id: NotSet,
            policy_number: Set(payload.policy_number.trim().to_string()),
            amount_insured: Set(payload.amount_insured),
            expiration_date: Set(payload.expiration_date),
            carrier: Set(payload.carrier),
        }
    }
}

pub struct ExhibitionResource;

impl MuseumResource for ExhibitionResource {
    type Entity = exhibition::Entity;
    type Model = exhibition::Model;
    type ActiveModel = exhibition::ActiveModel;
    type Payload = ExhibitionRequest;
    const LABEL: &'static str = "Exhibition";

    fn build(payload: ExhibitionRequest) -> exhibition::ActiveModel {
        exhibition::ActiveModel {
            id: NotSet,
            museum_id: NotSet,
            name: Set(payload.name.trim().to_string()),
            curator: Set(payload.curator),
            theme: Set(payload.theme),
            start_date: Set(payload.start_date),
            end_date: Set(payload.end_date),
            location_id: Set(payload.location_id),
        }
    }

    fn references(payload: &ExhibitionRequest) -> Vec<Reference> {
        present([payload.location_id.map(Reference::Location)])
    }
}

pub struct LoanResource;

impl MuseumResource for LoanResource {
    type Entity = loan::Entity;
    type Model = loan::Model;
    type ActiveModel = loan::ActiveModel;
    type Payload = LoanRequest;
    const LABEL: &'static str = "Loan";

    fn build(payload: LoanRequest) -> loan::ActiveModel {
        loan::ActiveModel {
            id: NotSet,
            museum_id: NotSet,
            from_location_id: Set(payload.from_location_id),
            to_location_id: Set(payload.to_location_id),
            from_date: Set(payload.from_date),
            to_date: Set(payload.to_date),
            exhibition_id: Set(payload.exhibition_id),
            terms: Set(payload.terms),
        }
    }

    fn references(payload: &LoanRequest) -> Vec<Reference> {
        present([
            payload.from_location_id.map(Reference::Location),
            payload.to_location_id.map(Reference::Location),
            payload.exhibition_id.map(Reference::Exhibition),
        ])
    }
}

pub struct PieceResource;

impl MuseumResource for PieceResource {
    type Entity = piece::Entity;
    type Model = piece::Model;
    type ActiveModel = piece::ActiveModel;
    type Payload = PieceRequest;
    const LABEL: &'static str = "Piece";

    fn build(payload: PieceRequest) -> piece::ActiveModel {
        piece::ActiveModel {
            id: NotSet,
            museum_id: NotSet,
            accession_number: Set(payload.accession_number),
            title: Set(payload.title.trim().to_string()),
            subject: Set(payload.subject),
            artist_id: Set(payload.artist_id),
            medium_id: Set(payload.medium_id),
            genre_id: Set(payload.genre_id),
            subgenre_id: Set(payload.subgenre_id),
            subject_matter_id: Set(payload.subject_matter_id),
            acquisition_id: Set(payload.acquisition_id),
            estimated_value: Set(payload.estimated_value),
            is_framed: Set(payload.is_framed),
            creation_year: Set(payload.creation_year),
            creation_month: Set(payload.creation_month),
            creation_day: Set(payload.creation_day),
            origin_city: Set(payload.origin_city),
            origin_state: Set(payload.origin_state),
            origin_country_id: Set(payload.origin_country_id),
            height: Set(payload.height),
            width: Set(payload.width),
            depth: Set(payload.depth),
            unit_of_measure_id: Set(payload.unit_of_measure_id),
            copyright_year: Set(payload.copyright_year),
            copyright_owner: Set(payload.copyright_owner),
            insurance_policy_id: Set(payload.insurance_policy_id),
        }
    }

    fn references(payload: &PieceRequest) -> Vec<Reference> {
        present([
            payload.artist_id.map(Reference::Artist),
            payload.medium_id.map(Reference::Medium),
            payload.genre_id.map(Reference::Genre),
            payload.subgenre_id.map(Reference::Subgenre),
            payload.subject_matter_id.map(Reference::SubjectMatter),
            payload.acquisition_id.map(Reference::Acquisition),
            payload.origin_country_id.map(Reference::Country),
            payload.unit_of_measure_id.map(Reference::UnitOfMeasure),
            payload.insurance_policy_id.map(Reference::InsurancePolicy),
        ])
    }
}

macro_rules! named_resource {
    ($resource:ident, $module:ident, $label:literal) => {
        pub struct $resource;

        impl MuseumResource for $resource {
            type Entity = $module::Entity;
            type Model = $module::Model;
            type ActiveModel = $module::ActiveModel;
            type Payload = NamedEntityRequest;
            const LABEL: &'static str = $label;

            fn build(payload: NamedEntityRequest) -> $module::ActiveModel {
                $module::ActiveModel {
                    id: NotSet,
                    museum_id: NotSet,
                    name: Set(payload.name.trim().to_string()),
                }
            }
        }
    };
}

named_resource!(GenreResource, genre, "Genre");
named_resource!(SubgenreResource, subgenre, "Subgenre");
named_resource!(MediumResource, medium, "Medium");
named_resource!(SubjectMatterResource, subject_matter, "Subject matter");
named_resource!(InspectorResource, inspector, "Inspector");
