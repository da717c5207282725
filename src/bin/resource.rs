use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ridehail::{
    config::ResourceConfig,
    db::{self, PgFleetStore},
    routes,
    services::verifier::IdentityClient,
    state::ResourceState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ResourceConfig::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_resource_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let http = reqwest::Client::new();
    let state = ResourceState {
        store: Arc::new(PgFleetStore::new(pool)),
        verifier: Arc::new(IdentityClient::new(http, &config.identity_url)),
    };
    info!("Verifying tokens against {}", config.identity_url);

    let app = routes::resource_router(state).layer(routes::cors(&config.server));

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Resource service listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
