//! Wires configuration, collaborators and routes into the axum application.

use crate::auth::{JwtKeys, JWT_COOKIE};
use crate::config::AppConfig;
use crate::factories::{
    DefaultGenreFactory, DefaultMediumFactory, DefaultSubgenreFactory, DefaultSubjectMatterFactory,
};
use crate::identity::email_sender::TracingEmailSender;
use crate::identity::sign_in_manager::JwtSignInManager;
use crate::identity::user_manager::DBUserManager;
use crate::identity::{EmailSender, IdentityError, SignInManager, UserManager};
use crate::repos::museum_repo::MuseumRepo;
use crate::routes::account::{get_account_routes, AccountApi};
use crate::routes::collections::{get_collection_routes, CollectionsApi};
use crate::routes::manage::{get_manage_routes, ManageApi};
use crate::services::account_service::AccountService;
use crate::services::callback_urls::CallbackUrls;
use crate::services::collection_service::CollectionService;
use crate::services::manage_service::ManageService;
use crate::services::museum_service::MuseumService;
use crate::services::view_model_factories::{
    DefaultEnableAuthenticatorViewModelFactory, DefaultTwoFactorAuthenticationViewModelFactory,
};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(Clone)]
pub struct AppState {
    pub museum_service: MuseumService,
    pub collection_service: CollectionService,
    pub manage_service: ManageService,
    pub account_service: AccountService,
    pub jwt_keys: Arc<JwtKeys>,
}

/// Builds every service over one connection pool.
pub fn build_state(db_session: DatabaseConnection, config: &AppConfig) -> AppState {
    let jwt_keys = Arc::new(JwtKeys::new(config.jwt_secret.as_bytes()));
    let repo = MuseumRepo::new(db_session.clone());
    let callback_urls = CallbackUrls::new(&config.app_base_url);

    let user_manager: Arc<dyn UserManager> = Arc::new(DBUserManager {
        db_session,
        token_secret: config.jwt_secret.clone(),
    });
    let sign_in_manager: Arc<dyn SignInManager> = Arc::new(JwtSignInManager {
        jwt_keys: jwt_keys.clone(),
        expiry_hours: config.jwt_expiry_hours,
        external_providers: config.external_providers.clone(),
    });
    let email_sender: Arc<dyn EmailSender> = Arc::new(TracingEmailSender);

    AppState {
        museum_service: MuseumService { repo: repo.clone() },
        collection_service: CollectionService {
            repo: repo.clone(),
            genre_factory: Arc::new(DefaultGenreFactory),
            subgenre_factory: Arc::new(DefaultSubgenreFactory),
            medium_factory: Arc::new(DefaultMediumFactory),
            subject_matter_factory: Arc::new(DefaultSubjectMatterFactory),
        },
        manage_service: ManageService {
            user_manager: user_manager.clone(),
            sign_in_manager: sign_in_manager.clone(),
            email_sender: email_sender.clone(),
            callback_urls: callback_urls.clone(),
            two_factor_view_models: Arc::new(DefaultTwoFactorAuthenticationViewModelFactory {
                user_manager: user_manager.clone(),
            }),
            enable_authenticator_view_models: Arc::new(
                DefaultEnableAuthenticatorViewModelFactory {
                    issuer: config.authenticator_issuer.clone(),
                },
            ),
        },
        account_service: AccountService {
            repo,
            user_manager,
            sign_in_manager,
            email_sender,
            callback_urls,
        },
        jwt_keys,
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "jwt_cookie_auth",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(JWT_COOKIE))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Museum Collections API"),
    modifiers(&SecurityAddon),
    components(schemas(IdentityError))
)]
struct ApiDoc;

pub fn api_doc() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.merge(CollectionsApi::openapi());
    doc.merge(ManageApi::openapi());
    doc.merge(AccountApi::openapi());
    doc
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(api_doc())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(%err, "Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
}

pub fn create_app(state: AppState, cors_origins: &[String]) -> Router {
    let api = Router::new()
        .merge(get_collection_routes())
        .merge(get_manage_routes())
        .merge(get_account_routes())
        .route("/openapi.json", get(openapi_json));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use crate::test_tools::build_test_app;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    #[tokio::test]
    async fn serves_openapi_document() {
        let app = build_test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(doc["paths"]["/api/v1/pieces"].is_object());
        assert!(doc["paths"]["/api/v1/manage/change-password"].is_object());
        assert!(doc["components"]["securitySchemes"]["jwt_cookie_auth"].is_object());
    }
}
