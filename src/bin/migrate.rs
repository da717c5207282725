/// Apply the schema migrations of one service and exit.
///
/// Usage: migrate --service identity|resource
///   DATABASE_URL must point at that service's database.
use clap::{Parser, ValueEnum};

use ridehail::db;

#[derive(Clone, Copy, ValueEnum)]
enum Service {
    Identity,
    Resource,
}

#[derive(Parser)]
#[command(name = "migrate", about = "Apply database migrations for a ridehail service")]
struct Args {
    /// Which service's schema to migrate
    #[arg(long, value_enum)]
    service: Service,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("Missing required env var: DATABASE_URL"))?;
    let pool = db::create_pool(&database_url).await?;

    match args.service {
        Service::Identity => db::run_identity_migrations(&pool).await?,
        Service::Resource => db::run_resource_migrations(&pool).await?,
    }
    tracing::info!("Migrations applied");

    Ok(())
}
