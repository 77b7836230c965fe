use std::sync::Arc;

use auth::Authenticator;
use auth::JwtHandler;
use auth::KeyManager;
use auth::KeyPaths;
use auth::PasswordHasher;
use auth_service::config::Config;
use auth_service::domain::identity::models::DefaultAccount;
use auth_service::domain::identity::models::Username;
use auth_service::domain::identity::ports::AuthServicePort;
use auth_service::domain::identity::ports::IdentityRepository;
use auth_service::domain::identity::service::AuthService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryIdentityRepository;
use auth_service::outbound::repositories::PostgresIdentityRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        private_key_path = %config.keys.private_key_path,
        public_key_path = %config.keys.public_key_path,
        issuer = %config.jwt.issuer,
        expiration_hours = config.jwt.expiration_hours,
        persistent_store = config.database.is_some(),
        "Configuration loaded"
    );

    let key_paths = KeyPaths::new(&config.keys.private_key_path, &config.keys.public_key_path);
    let keys = Arc::new(KeyManager::load_or_generate(&key_paths)?);

    let jwt_handler = JwtHandler::new(keys)
        .with_issuer(config.jwt.issuer.clone())
        .with_ttl(chrono::Duration::hours(config.jwt.expiration_hours))
        .with_leeway(config.jwt.leeway_seconds);
    let password_hasher = PasswordHasher::with_cost(config.password.cost)?;
    let authenticator = Arc::new(Authenticator::new(password_hasher, jwt_handler));

    let default_account = DefaultAccount::new(
        Username::new(config.bootstrap.username.clone())?,
        config.bootstrap.password.clone(),
    );

    let auth_service: Arc<dyn AuthServicePort> = match &config.database {
        Some(database) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(&database.url)
                .await?;
            tracing::info!(
                max_connections = database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            build_service(
                PostgresIdentityRepository::new(pg_pool),
                authenticator,
                default_account,
            )
        }
        None => {
            tracing::warn!("No database configured, identities are kept in memory");
            build_service(
                InMemoryIdentityRepository::new(),
                authenticator,
                default_account,
            )
        }
    };

    match auth_service.bootstrap_default_account().await {
        Ok(outcome) => tracing::info!(outcome = ?outcome, "Default account bootstrap completed"),
        Err(e) => tracing::error!(error = %e, "Default account bootstrap failed"),
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

    tracing::info!("Server exited successfully");

    Ok(())
}

fn build_service<IR: IdentityRepository>(
    repository: IR,
    authenticator: Arc<Authenticator>,
    default_account: DefaultAccount,
) -> Arc<dyn AuthServicePort> {
    Arc::new(AuthService::new(
        Arc::new(repository),
        authenticator,
        default_account,
    ))
}
