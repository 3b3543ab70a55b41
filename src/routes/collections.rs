//! Routes for the museum's collection records.
//!
//! Every resource gets list, get, create, update and delete through the
//! generic handlers in [`super::museum_entities`]. Pieces replace the generic
//! create with one that can also create their reference rows, and the
//! association routes link pieces to exhibitions and loans.

use crate::app_factory::AppState;
use crate::error::AppError;
use crate::models::auth::AuthenticatedUser;
use crate::models::request::{CreatePieceRequest, InsurancePolicyRequest};
use crate::models::resources::{
    AcquisitionResource, ArtistResource, ExhibitionResource, GenreResource, InspectorResource,
    InsurancePolicyResource, LoanResource, LocationResource, MediumResource, PieceResource,
    SubgenreResource, SubjectMatterResource,
};
use crate::routes::museum_entities::{museum_entity_router, museum_entity_routes};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use utoipa::OpenApi;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(
    paths(
        create_piece,
        add_exhibition_piece,
        remove_exhibition_piece,
        add_loan_piece,
        remove_loan_piece,
        add_artist_subject_matter,
        remove_artist_subject_matter,
        list_countries,
        list_units_of_measure,
        get_museum
    ),
    components(schemas(CreatePieceRequest, InsurancePolicyRequest))
)]
pub struct CollectionsApi;

/// Creates routes for every collection resource, each nested under its own path.
pub fn get_collection_routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/artists",
            museum_entity_routes::<ArtistResource>()
                .route(
                    "/{artist_id}/subject-matters/{subject_matter_id}",
                    post(add_artist_subject_matter),
                )
                .route(
                    "/{artist_id}/subject-matters/{subject_matter_id}",
                    delete(remove_artist_subject_matter),
                ),
        )
        .nest("/locations", museum_entity_routes::<LocationResource>())
        .nest("/inspectors", museum_entity_routes::<InspectorResource>())
        .nest("/genres", museum_entity_routes::<GenreResource>())
        .nest("/subgenres", museum_entity_routes::<SubgenreResource>())
        .nest("/media", museum_entity_routes::<MediumResource>())
        .nest(
            "/subject-matters",
            museum_entity_routes::<SubjectMatterResource>(),
        )
        .nest(
            "/acquisitions",
            museum_entity_routes::<AcquisitionResource>(),
        )
        .nest(
            "/insurance-policies",
            museum_entity_routes::<InsurancePolicyResource>(),
        )
        .nest(
            "/exhibitions",
            museum_entity_routes::<ExhibitionResource>()
                .route(
                    "/{exhibition_id}/pieces/{piece_id}",
                    post(add_exhibition_piece),
                )
                .route(
                    "/{exhibition_id}/pieces/{piece_id}",
                    delete(remove_exhibition_piece),
                ),
        )
        .nest(
            "/loans",
            museum_entity_routes::<LoanResource>()
                .route("/{loan_id}/pieces/{piece_id}", post(add_loan_piece))
                .route("/{loan_id}/pieces/{piece_id}", delete(remove_loan_piece)),
        )
        .nest(
            "/pieces",
            museum_entity_router::<PieceResource>().route("/", post(create_piece)),
        )
        .route("/countries", get(list_countries))
        .route("/units-of-measure", get(list_units_of_measure))
        .route("/museum", get(get_museum))
}

#[utoipa::path(
    post,
    path = "/api/v1/pieces",
    tag = "Collections",
    request_body = CreatePieceRequest,
    responses(
        (status = 201, description = "Piece created"),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn create_piece(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(payload): Json<CreatePieceRequest>,
) -> Result<Response, AppError> {
    if let Err(err) = payload.validate() {
        return Ok((StatusCode::BAD_REQUEST, err.to_string()).into_response());
    }
    state
        .collection_service
        .create_piece(authenticated_user, payload)
        .await
}

#[utoipa::path(
    post,
    path = "/api/v1/exhibitions/{exhibition_id}/pieces/{piece_id}",
    tag = "Collections",
    params(
        ("exhibition_id" = i32, Path, description = "Exhibition ID"),
        ("piece_id" = i32, Path, description = "Piece ID")
    ),
    responses(
        (status = 201, description = "Piece added to exhibition"),
        (status = 200, description = "Piece already in exhibition"),
        (status = 404, description = "Not found")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn add_exhibition_piece(
    State(state): State<AppState>,
    Path((exhibition_id, piece_id)): Path<(i32, i32)>,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    state
        .collection_service
        .add_exhibition_piece(authenticated_user, exhibition_id, piece_id)
        .await
}

#[utoipa::path(
    delete,
    path = "/api/v1/exhibitions/{exhibition_id}/pieces/{piece_id}",
    tag = "Collections",
    params(
        ("exhibition_id" = i32, Path, description = "Exhibition ID"),
        ("piece_id" = i32, Path, description = "Piece ID")
    ),
    responses(
        (status = 200, description = "Piece removed from exhibition"),
        (status = 404, description = "Not found")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn remove_exhibition_piece(
    State(state): State<AppState>,
    Path((exhibition_id, piece_id)): Path<(i32, i32)>,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    state
        .collection_service
        .remove_exhibition_piece(authenticated_user, exhibition_id, piece_id)
        .await
}

#[utoipa::path(
    post,
    path = "/api/v1/loans/{loan_id}/pieces/{piece_id}",
    tag = "Collections",
    params(
        ("loan_id" = i32, Path, description = "Loan ID"),
        ("piece_id" = i32, Path, description = "Piece ID")
    ),
    responses(
        (status = 201, description = "Piece added to loan"),
        (status = 200, description = "Piece already on loan"),
        (status = 404, description = "Not found")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn add_loan_piece(
    State(state): State<AppState>,
    Path((loan_id, piece_id)): Path<(i32, i32)>,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    state
        .collection_service
        .add_loan_piece(authenticated_user, loan_id, piece_id)
        .await
}

#[utoipa::path(
    delete,
    path = "/api/v1/loans/{loan_id}/pieces/{piece_id}",
    tag = "Collections",
    params(
        ("loan_id" = i32, Path, description = "Loan ID"),
        ("piece_id" = i32, Path, description = "Piece ID")
    ),
    responses(
        (status = 200, description = "Piece removed from loan"),
        (status = 404, description = "Not found")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn remove_loan_piece(
    State(state): State<AppState>,
    Path((loan_id, piece_id)): Path<(i32, i32)>,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    state
        .collection_service
        .remove_loan_piece(authenticated_user, loan_id, piece_id)
        .await
}

#[utoipa::path(
    post,
    path = "/api/v1/artists/{artist_id}/subject-matters/{subject_matter_id}",
    tag = "Collections",
    params(
        ("artist_id" = i32, Path, description = "Artist ID"),
        ("subject_matter_id" = i32, Path, description = "Subject matter ID")
    ),
    responses(
        (status = 201, description = "Subject matter linked"),
        (status = 200, description = "Subject matter already linked"),
        (status = 404, description = "Not found")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn add_artist_subject_matter(
    State(state): State<AppState>,
    Path((artist_id, subject_matter_id)): Path<(i32, i32)>,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    state
        .collection_service
        .add_artist_subject_matter(authenticated_user, artist_id, subject_matter_id)
        .await
}

#[utoipa::path(
    delete,
    path = "/api/v1/artists/{artist_id}/subject-matters/{subject_matter_id}",
    tag = "Collections",
    params(
        ("artist_id" = i32, Path, description = "Artist ID"),
        ("subject_matter_id" = i32, Path, description = "Subject matter ID")
    ),
    responses(
        (status = 200, description = "Subject matter unlinked"),
        (status = 404, description = "Not found")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn remove_artist_subject_matter(
    State(state): State<AppState>,
    Path((artist_id, subject_matter_id)): Path<(i32, i32)>,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    state
        .collection_service
        .remove_artist_subject_matter(authenticated_user, artist_id, subject_matter_id)
        .await
}

#[utoipa::path(
    get,
    path = "/api/v1/countries",
    tag = "Collections",
    responses(
        (status = 200, description = "OK"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn list_countries(
    State(state): State<AppState>,
    _authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    state.museum_service.list_countries().await
}

#[utoipa::path(
    get,
    path = "/api/v1/units-of-measure",
    tag = "Collections",
    responses(
        (status = 200, description = "OK"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn list_units_of_measure(
    State(state): State<AppState>,
    _authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    state.museum_service.list_units_of_measure().await
}

#[utoipa::path(
    get,
    path = "/api/v1/museum",
    tag = "Collections",
    responses(
        (status = 200, description = "OK"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("jwt_cookie_auth" = [])
    )
)]
async fn get_museum(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    state.museum_service.get_museum(authenticated_user).await
}

#[cfg(test)]
mod tests {
    use crate::test_tools::{build_test_app, get_mock_jwt};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(
        app: &Router,
        method: http::Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .header(http::header::COOKIE, format!("jwt={}", get_mock_jwt()));
        let body = match body {
            Some(body) => {
                request =
                    request.header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
                Body::from(serde_json::to_vec(&body).unwrap())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn list_artists_no_auth() {
        let app = build_test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/artists")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn create_and_get_genre_with_auth() {
        let app = build_test_app().await;
        let (status, body) = send(
            &app,
            http::Method::POST,
            "/api/v1/genres",
            Some(json!({ "name": "Romanticism" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(created["name"], "Romanticism");

        let uri = format!("/api/v1/genres/{}", created["id"]);
        let (status, body) = send(&app, http::Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let fetched: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(fetched, created);

        let (status, body) = send(&app, http::Method::GET, "/api/v1/genres", None).await;
        assert_eq!(status, StatusCode::OK);
        let listed: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_exhibition_with_bad_dates() {
        let app = build_test_app().await;
        let (status, _) = send(
            &app,
            http::Method::POST,
            "/api/v1/exhibitions",
            Some(json!({
                "name": "Nocturnes",
                "start_date": "2024-05-01",
                "end_date": "2024-04-01"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_missing_location() {
        let app = build_test_app().await;
        let (status, body) = send(&app, http::Method::GET, "/api/v1/locations/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(String::from_utf8(body).unwrap(), "Location not found");
    }

    #[tokio::test]
    async fn update_and_delete_inspector() {
        let app = build_test_app().await;
        let (_, body) = send(
            &app,
            http::Method::POST,
            "/api/v1/inspectors",
            Some(json!({ "name": "J. Smith" })),
        )
        .await;
        let created: Value = serde_json::from_slice(&body).unwrap();
        let uri = format!("/api/v1/inspectors/{}", created["id"]);

        let (status, body) = send(
            &app,
            http::Method::PUT,
            &uri,
            Some(json!({ "name": "Jane Smith" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let updated: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(updated["name"], "Jane Smith");

        let (status, body) = send(&app, http::Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(String::from_utf8(body).unwrap(), "Inspector deleted");

        let (status, _) = send(&app, http::Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_piece_with_new_artist_and_link_to_loan() {
        let app = build_test_app().await;
        let (status, body) = send(
            &app,
            http::Method::POST,
            "/api/v1/pieces",
            Some(json!({
                "title": "Girl with a Pearl Earring",
                "creation_year": 1665,
                "height": 44.5,
                "width": 39.0,
                "new_artist": { "name": "Johannes Vermeer", "city": "Delft" },
                "new_medium": "Oil on canvas"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let piece: Value = serde_json::from_slice(&body).unwrap();
        assert!(piece["artist_id"].is_number());
        assert!(piece["medium_id"].is_number());

        let (status, body) = send(
            &app,
            http::Method::POST,
            "/api/v1/loans",
            Some(json!({ "from_date": "2025-01-10", "to_date": "2025-04-10" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let loan: Value = serde_json::from_slice(&body).unwrap();

        let uri = format!("/api/v1/loans/{}/pieces/{}", loan["id"], piece["id"]);
        let (status, _) = send(&app, http::Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = send(&app, http::Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn create_piece_with_conflicting_artist() {
        let app = build_test_app().await;
        let (status, _) = send(
            &app,
            http::Method::POST,
            "/api/v1/pieces",
            Some(json!({
                "title": "The Milkmaid",
                "artist_id": 1,
                "new_artist": { "name": "Johannes Vermeer" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_countries_and_museum() {
        let app = build_test_app().await;
        let (status, body) = send(&app, http::Method::GET, "/api/v1/countries", None).await;
        assert_eq!(status, StatusCode::OK);
        let countries: Value = serde_json::from_slice(&body).unwrap();
        assert!(!countries.as_array().unwrap().is_empty());

        let (status, body) = send(&app, http::Method::GET, "/api/v1/museum", None).await;
        assert_eq!(status, StatusCode::OK);
        let museum: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(museum["name"], "Test Museum");
    }

    #[tokio::test]
    async fn units_of_measure_and_insurance_policies() {
        let app = build_test_app().await;
        let (status, body) =
            send(&app, http::Method::GET, "/api/v1/units-of-measure", None).await;
        assert_eq!(status, StatusCode::OK);
        let units: Value = serde_json::from_slice(&body).unwrap();
        let centimeters = units
            .as_array()
            .unwrap()
            .iter()
            .find(|unit| unit["name"] == "Centimeters")
            .unwrap();
        assert_eq!(centimeters["abbreviation"], "cm");

        let (status, body) = send(
            &app,
            http::Method::POST,
            "/api/v1/insurance-policies",
            Some(json!({
                "policy_number": "AXA-2210",
                "amount_insured": "1250000.75",
                "expiration_date": "2027-06-30"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let policy: Value = serde_json::from_slice(&body).unwrap();
        let amount: rust_decimal::Decimal = policy["amount_insured"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(amount, rust_decimal::Decimal::new(125_000_075, 2));

        let (status, _) = send(
            &app,
            http::Method::POST,
            "/api/v1/insurance-policies",
            Some(json!({ "policy_number": "AXA-2211", "amount_insured": -5 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
