use clap::Parser;

/// Runtime configuration, read from the command line or the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "museum-collections-api", version, about)]
pub struct AppConfig {
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    #[arg(long, env = "LISTEN_ADDRESS", default_value = "0.0.0.0:5000")]
    pub listen_address: String,

    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    #[arg(long, env = "JWT_EXPIRY_HOURS", default_value_t = 24)]
    pub jwt_expiry_hours: i64,

    /// Public base URL used to build e-mail confirmation and login callback links.
    #[arg(long, env = "APP_BASE_URL", default_value = "http://localhost:5000")]
    pub app_base_url: String,

    /// Issuer label shown by authenticator apps.
    #[arg(long, env = "AUTHENTICATOR_ISSUER", default_value = "Museum Collections")]
    pub authenticator_issuer: String,

    /// Name of the museum created on first start when the store has none.
    #[arg(long, env = "DEFAULT_MUSEUM_NAME", default_value = "My Museum")]
    pub default_museum_name: String,

    /// External login providers as `name=authorize_url` pairs.
    #[arg(long, env = "EXTERNAL_PROVIDERS", value_delimiter = ',', value_parser = parse_external_provider)]
    pub external_providers: Vec<ExternalProviderConfig>,

    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProviderConfig {
    pub name: String,
    pub authorize_url: String,
}

fn parse_external_provider(raw: &str) -> Result<ExternalProviderConfig, String> {
    let (name, authorize_url) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=authorize_url, got '{raw}'"))?;
    let name = name.trim();
    let authorize_url = authorize_url.trim();
    if name.is_empty() || authorize_url.is_empty() {
        return Err(format!("expected name=authorize_url, got '{raw}'"));
    }
    Ok(ExternalProviderConfig {
        name: name.to_string(),
        authorize_url: authorize_url.to_string(),
    })
}
