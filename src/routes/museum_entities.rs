//! Generic routes shared by every museum-scoped collection resource.
//!
//! Each resource is mounted with [`museum_entity_routes`], or with
//! [`museum_entity_router`] when it needs its own create handler.

use crate::app_factory::AppState;
use crate::error::AppError;
use crate::models::auth::AuthenticatedUser;
use crate::models::resources::MuseumResource;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use validator::Validate;

/// List, get, update and delete for `R`, without create.
pub fn museum_entity_router<R: MuseumResource>() -> Router<AppState> {
    Router::new()
        .route("/", get(list_entities::<R>))
        .route("/{id}", get(get_entity::<R>))
        .route("/{id}", put(update_entity::<R>))
        .route("/{id}", delete(delete_entity::<R>))
}

pub fn museum_entity_routes<R: MuseumResource>() -> Router<AppState> {
    museum_entity_router::<R>().route("/", post(create_entity::<R>))
}

async fn list_entities<R: MuseumResource>(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    state.museum_service.list::<R>(authenticated_user).await
}

async fn get_entity<R: MuseumResource>(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    state.museum_service.get_one::<R>(authenticated_user, id).await
}

async fn create_entity<R: MuseumResource>(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(payload): Json<R::Payload>,
) -> Result<Response, AppError> {
    if let Err(err) = payload.validate() {
        return Ok((StatusCode::BAD_REQUEST, err.to_string()).into_response());
    }
    state
        .museum_service
        .create_one::<R>(authenticated_user, payload)
        .await
}

async fn update_entity<R: MuseumResource>(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    authenticated_user: AuthenticatedUser,
    Json(payload): Json<R::Payload>,
) -> Result<Response, AppError> {
    if let Err(err) = payload.validate() {
        return Ok((StatusCode::BAD_REQUEST, err.to_string()).into_response());
    }
    state
        .museum_service
        .update_one::<R>(authenticated_user, id, payload)
        .await
}

async fn delete_entity<R: MuseumResource>(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, AppError> {
    state
        .museum_service
        .delete_one::<R>(authenticated_user, id)
        .await
}
