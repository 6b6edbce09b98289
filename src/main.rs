use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rentavenue_api::app::{self, AppState};
use rentavenue_api::config;
use rentavenue_api::database::{DatabaseManager, Fixtures, MemoryStore, PgStore};
use rentavenue_api::geo::{CoordinateCodec, Geocoder, NominatimGeocoder, WktPointCodec};

#[derive(Parser)]
#[command(name = "rentavenue-api")]
#[command(about = "Rental listing API server", version)]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Serve from a YAML fixture file instead of PostgreSQL
    #[arg(long, value_name = "PATH")]
    fixtures: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, GEOCODER_BASE_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = config::config();
    tracing::info!("Starting RentAvenue API in {:?} mode", config.environment);

    let codec: Arc<dyn CoordinateCodec> = Arc::new(WktPointCodec);
    let geocoder: Arc<dyn Geocoder> =
        Arc::new(NominatimGeocoder::new(&config.geocoding).context("failed to build geocoder client")?);

    let state = match &cli.fixtures {
        Some(path) => {
            if rentavenue_api::is_production!() {
                tracing::warn!("Serving fixture data in production mode");
            }
            let fixtures = Fixtures::load(path).with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Loaded {} listings from {}", fixtures.listings.len(), path.display());
            let store = MemoryStore::from_fixtures(fixtures).with_codec(codec.clone());
            AppState::new(Arc::new(store), codec, geocoder)
        }
        None => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::migrate(&pool).await?;
            AppState::new(Arc::new(PgStore::new(pool)), codec, geocoder)
        }
    };

    let app = app::router(state, config);

    let port = cli.port.unwrap_or(config.api.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("RentAvenue API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
