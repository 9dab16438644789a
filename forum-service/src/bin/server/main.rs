use std::sync::Arc;

use auth::Authenticator;
use chrono::Duration;
use forum_service::config::Config;
use forum_service::inbound::http::router::create_router;
use forum_service::inbound::http::router::AppState;
use forum_service::repositories::InMemoryStore;
use forum_service::repositories::PostgresLikeRepository;
use forum_service::repositories::PostgresPostRepository;
use forum_service::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forum_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "forum-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        jwt_expiration_hours = config.jwt.expiration_hours,
        database_configured = config.database.url.is_some(),
        "Configuration loaded"
    );

    let authenticator = Arc::new(
        Authenticator::new(config.jwt.secret.as_bytes())
            .with_token_ttl(Duration::hours(config.jwt.expiration_hours)),
    );

    let state = match &config.database.url {
        Some(url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            AppState::from_repositories(
                Arc::new(PostgresUserRepository::new(pg_pool.clone())),
                Arc::new(PostgresPostRepository::new(pg_pool.clone())),
                Arc::new(PostgresLikeRepository::new(pg_pool)),
                authenticator,
            )
        }
        None => {
            tracing::warn!(
                storage = "memory",
                "No database URL configured, data will not survive a restart"
            );
            let store = Arc::new(InMemoryStore::new());
            AppState::from_repositories(
                Arc::clone(&store),
                Arc::clone(&store),
                store,
                authenticator,
            )
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state)).await?;
    tracing::info!("Server exited");

    Ok(())
}
