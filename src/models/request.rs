//! Request models for the API endpoints.
//!
//! This module contains the request structures used by the collection and
//! account endpoints, including validation rules for incoming data.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Request body for the reference entities that only carry a name:
/// genres, subgenres, media, subject matters and inspectors.
#[derive(Debug, Clone, Validate, Deserialize, ToSchema)]
pub struct NamedEntityRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

#[derive(Debug, Clone, Validate, Deserialize, ToSchema)]
#[validate(schema(function = "validate_artist_dates"))]
pub struct ArtistRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 200))]
    pub also_known_as: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    pub country_id: Option<i32>,
    pub birthdate: Option<NaiveDate>,
    pub deathdate: Option<NaiveDate>,
}

fn validate_artist_dates(request: &ArtistRequest) -> Result<(), ValidationError> {
    match (request.birthdate, request.deathdate) {
        (Some(born), Some(died)) if died < born => {
            Err(ValidationError::new("deathdate_before_birthdate"))
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Validate, Deserialize, ToSchema)]
pub struct LocationRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 200))]
    pub address1: Option<String>,
    #[validate(length(max = 200))]
    pub address2: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(max = 20))]
    pub zip_code: Option<String>,
    pub country_id: Option<i32>,
}

fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() {
        return Err(ValidationError::new("negative_amount"));
    }
    Ok(())
}

#[derive(Debug, Clone, Validate, Deserialize, ToSchema)]
pub struct AcquisitionRequest {
    pub date: Option<NaiveDate>,
    #[validate(custom(function = "validate_amount"))]
    pub cost: Option<Decimal>,
    #[validate(length(max = 200))]
    pub piece_source: Option<String>,
    #[validate(length(max = 200))]
    pub funding_source: Option<String>,
    #[validate(length(max = 2000))]
    pub terms: Option<String>,
}

#[derive(Debug, Clone, Validate, Deserialize, ToSchema)]
#[validate(schema(function = "validate_exhibition_dates"))]
pub struct ExhibitionRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 200))]
    pub curator: Option<String>,
    #[validate(length(max = 200))]
    pub theme: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location_id: Option<i32>,
}

fn validate_exhibition_dates(request: &ExhibitionRequest) -> Result<(), ValidationError> {
    if request.end_date < request.start_date {
        return Err(ValidationError::new("end_date_before_start_date"));
    }
    Ok(())
}

#[derive(Debug, Clone, Validate, Deserialize, ToSchema)]
#[validate(schema(function = "validate_loan_dates"))]
pub struct LoanRequest {
    pub from_location_id: Option<i32>,
    pub to_location_id: Option<i32>,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub exhibition_id: Option<i32>,
    #[validate(length(max = 2000))]
    pub terms: Option<String>,
}

fn validate_loan_dates(request: &LoanRequest) -> Result<(), ValidationError> {
    if request.to_date < request.from_date {
        return Err(ValidationError::new("to_date_before_from_date"));
    }
    Ok(())
}

#[derive(Debug, Clone, Validate, Deserialize, ToSchema)]
pub struct InsurancePolicyRequest {
    #[validate(length(min = 1, max = 100))]
    pub policy_number: String,
    #[validate(custom(function = "validate_amount"))]
    pub amount_insured: Option<Decimal>,
    pub expiration_date: Option<NaiveDate>,
    #[validate(length(max = 200))]
    pub carrier: Option<String>,
}

/// Every stored field of a piece. Used as-is for updates and flattened into
/// [`CreatePieceRequest`].
#[derive(Debug, Clone, Validate, Deserialize, ToSchema)]
pub struct PieceRequest {
    #[validate(length(max = 50))]
    pub accession_number: Option<String>,
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(max = 300))]
    pub subject: Option<String>,
    pub artist_id: Option<i32>,
    pub medium_id: Option<i32>,
    pub genre_id: Option<i32>,
    pub subgenre_id: Option<i32>,
    pub subject_matter_id: Option<i32>,
    pub acquisition_id: Option<i32>,
    #[validate(custom(function = "validate_amount"))]
    pub estimated_value: Option<Decimal>,
    #[serde(default)]
    pub is_framed: bool,
    pub creation_year: Option<i32>,
    #[validate(range(min = 1, max = 12))]
    pub creation_month: Option<i32>,
    #[validate(range(min = 1, max = 31))]
    pub creation_day: Option<i32>,
    #[validate(length(max = 100))]
    pub origin_city: Option<String>,
    #[validate(length(max = 100))]
    pub origin_state: Option<String>,
    pub origin_country_id: Option<i32>,
    #[validate(range(min = 0.0))]
    pub height: Option<f64>,
    #[validate(range(min = 0.0))]
    pub width: Option<f64>,
    #[validate(range(min = 0.0))]
    pub depth: Option<f64>,
    pub unit_of_measure_id: Option<i32>,
    pub copyright_year: Option<i32>,
    #[validate(length(max = 200))]
    pub copyright_owner: Option<String>,
    pub insurance_policy_id: Option<i32>,
}

/// Creates a piece together with any reference rows the cataloguer typed in
/// rather than picked. A new value and an existing id for the same reference
/// are mutually exclusive.
#[derive(Debug, Clone, Validate, Deserialize, ToSchema)]
#[validate(schema(function = "validate_piece_references"))]
pub struct CreatePieceRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub piece: PieceRequest,
    #[validate(nested)]
    pub new_artist: Option<ArtistRequest>,
    #[validate(length(min = 1, max = 200))]
    pub new_medium: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub new_genre: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub new_subgenre: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub new_subject_matter: Option<String>,
    #[validate(nested)]
    pub new_acquisition: Option<AcquisitionRequest>,
    #[validate(nested)]
    pub new_insurance_policy: Option<InsurancePolicyRequest>,
}

fn validate_piece_references(request: &CreatePieceRequest) -> Result<(), ValidationError> {
    let piece = &request.piece;
    let conflicts = [
        piece.artist_id.is_some() && request.new_artist.is_some(),
        piece.medium_id.is_some() && request.new_medium.is_some(),
        piece.genre_id.is_some() && request.new_genre.is_some(),
        piece.subgenre_id.is_some() && request.new_subgenre.is_some(),
        piece.subject_matter_id.is_some() && request.new_subject_matter.is_some(),
        piece.acquisition_id.is_some() && request.new_acquisition.is_some(),
        piece.insurance_policy_id.is_some() && request.new_insurance_policy.is_some(),
    ];
    if conflicts.into_iter().any(|conflict| conflict) {
        return Err(ValidationError::new("existing_and_new_reference"));
    }
    Ok(())
}

#[derive(Debug, Clone, Validate, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 100))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Validate, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 6, max = 7))]
    pub two_factor_code: Option<String>,
    pub recovery_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ConfirmEmailParams {
    pub user_id: Uuid,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exhibition_must_not_end_before_it_starts() {
        let request: ExhibitionRequest = serde_json::from_value(json!({
            "name": "Nocturnes",
            "start_date": "2024-05-01",
            "end_date": "2024-04-01"
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn create_piece_rejects_existing_and_new_artist() {
        let request: CreatePieceRequest = serde_json::from_value(json!({
            "title": "Starry Night",
            "artist_id": 3,
            "new_artist": { "name": "Vincent van Gogh" }
        }))
        .unwrap();
        assert!(request.validate().is_err());

        let request: CreatePieceRequest = serde_json::from_value(json!({
            "title": "Starry Night",
            "new_artist": { "name": "Vincent van Gogh" },
            "new_medium": "Oil on canvas"
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.piece.title, "Starry Night");
    }

    #[test]
    fn piece_dimensions_and_dates_are_range_checked() {
        let request: PieceRequest = serde_json::from_value(json!({
            "title": "Untitled",
            "creation_month": 13,
            "height": -1.0
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("creation_month"));
        assert!(fields.contains_key("height"));
    }

    #[test]
    fn money_is_exact_and_never_negative() {
        let request: CreatePieceRequest = serde_json::from_value(json!({
            "title": "Water Lilies",
            "estimated_value": "40000000.10",
            "new_insurance_policy": { "policy_number": "FA-1916", "amount_insured": 0.1 }
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(
            request.piece.estimated_value,
            Some(Decimal::new(4_000_000_010, 2))
        );
        let policy = request.new_insurance_policy.unwrap();
        assert_eq!(policy.amount_insured, Some(Decimal::new(1, 1)));

        let request: AcquisitionRequest = serde_json::from_value(json!({
            "cost": "-0.01"
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("cost"));
    }

    #[test]
    fn create_piece_rejects_existing_and_new_policy() {
        let request: CreatePieceRequest = serde_json::from_value(json!({
            "title": "Impression, Sunrise",
            "insurance_policy_id": 2,
            "new_insurance_policy": { "policy_number": "FA-1872" }
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn register_requires_matching_confirmation() {
        let request: RegisterRequest = serde_json::from_value(json!({
            "email": "curator@example.com",
            "password": "Sunflowers#1888",
            "confirm_password": "Sunflowers#1889"
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }
}
