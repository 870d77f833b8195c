use boostgate::api;
use boostgate::api::auth::StaticTokenAuthenticator;
use boostgate::catalog::SqlitePricingCatalog;
use boostgate::engine::{AdmissionController, LifecycleEngine, SweepDriver, WalletLedger};
use boostgate::{config::Config, db::init_db, Repository, TimeMs};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let port = config.port;

    // Initialize database and dependencies
    let pool = match init_db(&config.database_path).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let repo = Arc::new(Repository::new(pool));
    if let Err(e) = repo.seed_default_prices(TimeMs::now()).await {
        eprintln!("Failed to seed pricing table: {}", e);
        std::process::exit(1);
    }

    let catalog = Arc::new(SqlitePricingCatalog::new(repo.clone()));
    let admission = Arc::new(AdmissionController::new(repo.clone(), catalog));
    let lifecycle = Arc::new(LifecycleEngine::new(repo.clone()));
    let wallet = Arc::new(WalletLedger::new(repo.clone()));
    let authenticator = Arc::new(StaticTokenAuthenticator::from_tokens(&config.api_tokens));

    // Start the expiry/activation sweep on its own loop
    let driver = Arc::new(SweepDriver::new(
        repo.clone(),
        Duration::from_secs(config.sweep_interval_secs),
    ));
    tokio::spawn(driver.run());

    // Create router
    let app = api::create_router(api::AppState::new(
        repo,
        admission,
        lifecycle,
        wallet,
        authenticator,
    ));

    // Bind to address
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
