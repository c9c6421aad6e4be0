use dotenvy::dotenv;
use marmita_connect::{
    api::{self, AppState},
    config::{database, seed, server::ServerConfig},
    core::seed::seed_initial_data,
    errors::Result,
    service::{MarketplaceService, SimulatedLatency},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load server settings
    let server_config = ServerConfig::from_env()
        .inspect_err(|e| error!("Failed to load server configuration: {}", e))?;

    // 4. Connect and create tables
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed initial data on an empty store
    let seed_config = seed::load_seed_or_demo(&server_config.seed_file)?;
    seed_initial_data(&db, &seed_config)
        .await
        .inspect_err(|e| error!("Failed to seed initial data: {}", e))?;

    // 6. Serve the API until Ctrl+C
    let service = MarketplaceService::new(
        db,
        SimulatedLatency::from_flag(server_config.simulated_latency),
    );
    let state = AppState::new(service, &server_config.token_secret);

    tokio::select! {
        result = api::serve(state, server_config.addr) => {
            if let Err(e) = result {
                error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
