use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use igprofile_cloud::S3AssetStore;
use igprofile_core::ports::AssetStore;
use igprofile_db::PgProfileStore;
use igprofile_provider::ProviderApi;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use igprofile_api::config::ServerConfig;
use igprofile_api::lookup::ProfileLookupService;
use igprofile_api::router::build_app_router;
use igprofile_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        cache_ttl_days = config.cache_policy.ttl().num_days(),
        mirroring = config.storage.is_some() && config.mirror_profile_pictures,
        "Loaded server configuration",
    );

    // --- Database ---
    let pool = igprofile_db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    igprofile_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    igprofile_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Collaborators ---
    let store = Arc::new(PgProfileStore::new(pool));
    let source = Arc::new(ProviderApi::new(
        config.provider.base_url.clone(),
        config.provider.access_key.clone(),
    ));

    let assets: Option<Arc<dyn AssetStore>> = match &config.storage {
        Some(settings) if config.mirror_profile_pictures => {
            let bucket = S3AssetStore::connect(settings.clone()).await;
            tracing::info!(bucket = bucket.bucket(), "Picture mirroring enabled");
            Some(Arc::new(bucket) as Arc<dyn AssetStore>)
        }
        _ => {
            tracing::info!("Picture mirroring disabled");
            None
        }
    };

    // --- App state ---
    let lookup = ProfileLookupService::new(store, source, assets, config.cache_policy);
    let state = AppState {
        lookup: Arc::new(lookup),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let host = config
        .host
        .parse::<IpAddr>()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Install the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "igprofile_api=debug,tower_http=debug".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Wait for SIGINT or SIGTERM to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
