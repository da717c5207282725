use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ridehail::{
    config::GatewayConfig,
    routes,
    services::{gateway::Downstream, verifier::IdentityClient},
    state::GatewayState,
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

    let config = GatewayConfig::from_env()?;

    // one connection pool shared by both downstream clients
    let http = reqwest::Client::new();
    let state = GatewayState {
        downstream: Downstream::new(http.clone(), &config.identity_url, &config.resource_url),
        verifier: Arc::new(IdentityClient::new(http, &config.identity_url)),
    };

    let app = routes::gateway_router(state).layer(routes::cors(&config.server));

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "Gateway listening on {} (identity: {}, resource: {})",
        addr, config.identity_url, config.resource_url
    );
    axum::serve(listener, app).await?;

    Ok(())
}
