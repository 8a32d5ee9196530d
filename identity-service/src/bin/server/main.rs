use std::sync::Arc;
use std::time::Duration;

use auth::PasswordHasher;
use auth::TokenCodec;
use auth::TokenLifetimes;
use identity_service::account::directory::AccountStores;
use identity_service::account::directory::UserDirectory;
use identity_service::account::models::AccountKind;
use identity_service::authentication::credentials::CredentialChecker;
use identity_service::authentication::service::AuthService;
use identity_service::config::Config;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::events::KafkaEventProducer;
use identity_service::outbound::repositories::PostgresAccountStore;
use identity_service::outbound::revocation::InMemoryRevocationRegistry;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        kafka_brokers = %config.kafka.brokers,
        kafka_topic = %config.kafka.topic,
        access_token_ttl_secs = config.jwt.access_token_ttl_secs,
        refresh_token_ttl_secs = config.jwt.refresh_token_ttl_secs,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let stores = AccountStores {
        customers: Arc::new(PostgresAccountStore::new(pg_pool.clone(), AccountKind::Customer)),
        administrators: Arc::new(PostgresAccountStore::new(pg_pool.clone(), AccountKind::Admin)),
        operators: Arc::new(PostgresAccountStore::new(pg_pool.clone(), AccountKind::Operator)),
        kitchen: Arc::new(PostgresAccountStore::new(pg_pool, AccountKind::Kitchen)),
    };

    let hasher = Arc::new(PasswordHasher::new());
    let codec = TokenCodec::new(
        config.jwt.secret.as_bytes(),
        TokenLifetimes::from_secs(
            config.jwt.access_token_ttl_secs,
            config.jwt.refresh_token_ttl_secs,
        ),
    )?;
    let revocations = Arc::new(InMemoryRevocationRegistry::new());
    let event_producer = Arc::new(KafkaEventProducer::new(&config)?);

    let auth_service = Arc::new(
        AuthService::new(
            UserDirectory::new(stores, hasher.clone()),
            CredentialChecker::new(hasher),
            Arc::new(codec),
            revocations,
            event_producer,
        )
        .with_event_timeout(Duration::from_millis(config.events.publish_timeout_ms)),
    );

    if let Some(admin) = &config.bootstrap_admin {
        match auth_service.seed_account(admin.to_command()?).await? {
            Some(profile) => tracing::info!(
                user_id = %profile.id,
                username = %profile.username,
                "Bootstrap administrator created"
            ),
            None => tracing::info!(
                username = %admin.username,
                "Bootstrap administrator already present"
            ),
        }
    }

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(auth_service)).await?;
    tracing::info!("Server exited");

    Ok(())
}
