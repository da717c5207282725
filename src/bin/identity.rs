use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ridehail::{
    config::IdentityConfig,
    db::{self, PgUserStore},
    routes,
    services::token::TokenKeys,
    state::IdentityState,
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

    let config = IdentityConfig::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_identity_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let state = IdentityState {
        store: Arc::new(PgUserStore::new(pool)),
        keys: Arc::new(TokenKeys::new(&config.jwt_secret, config.token_ttl_hours)),
        bcrypt_cost: config.bcrypt_cost,
    };

    let app = routes::identity_router(state).layer(routes::cors(&config.server));

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Identity provider listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
