use anyhow::Result;
use clap::Parser;
use entity::museum;
use migration::{Migrator, MigratorTrait};
use museum_collections_api::app_factory::{build_state, create_app};
use museum_collections_api::config::AppConfig;
use museum_collections_api::repos::museum_repo::MuseumRepo;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::Database;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::parse();
    info!(
        "Starting museum-collections-api v{}",
        env!("CARGO_PKG_VERSION")
    );

    let db_session = match Database::connect(&config.database_url).await {
        Ok(db_session) => db_session,
        Err(err) => {
            error!(%err, "Failed to connect to database");
            return Err(err.into());
        }
    };
    Migrator::up(&db_session, None).await?;
    info!("Database migrations applied");

    // Registration joins the first museum, so there must always be one.
    let repo = MuseumRepo::new(db_session.clone());
    if repo.get_first_entity::<museum::Entity>().await?.is_none() {
        let created = repo
            .insert(museum::ActiveModel {
                id: NotSet,
                name: Set(config.default_museum_name.clone()),
                short_name: Set(None),
            })
            .await?;
        info!("Created default museum {} ({})", created.name, created.id);
    }

    let app = create_app(build_state(db_session, &config), &config.cors_origins);
    let listener = tokio::net::TcpListener::bind(&config.listen_address).await?;
    info!("Listening on http://{}", config.listen_address);
    axum::serve(listener, app).await?;

    Ok(())
}
