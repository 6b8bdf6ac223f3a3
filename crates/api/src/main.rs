use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use polyfaq_cache::{Cache, MemoryCache, NoopCache, RedisCache};
use polyfaq_db::store::{FaqStore, MemoryStore, PgStore, UserStore};
use polyfaq_service::FaqService;
use polyfaq_translate::{GoogleTranslator, GoogleTranslatorConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use polyfaq_api::config::{CacheBackend, ServerConfig, StoreBackend};
use polyfaq_api::router::build_app_router;
use polyfaq_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "polyfaq_api=debug,polyfaq_service=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        store = ?config.store_backend,
        cache = ?config.cache_backend,
        "Loaded server configuration",
    );

    // --- Store ---
    let (faq_store, user_store, pg_store) = open_store(&config).await?;

    // --- Cache ---
    let cache = open_cache(&config).await?;

    // --- Translator ---
    let translator = GoogleTranslator::new(GoogleTranslatorConfig {
        base_url: config.translate_url.clone(),
        timeout: config.translate_timeout(),
    })
    .context("Failed to build translation client")?;

    // --- App state ---
    let faqs = FaqService::new(Arc::clone(&faq_store), Arc::clone(&cache), Arc::new(translator))
        .with_cache_ttl(config.faq_cache_ttl());

    let state = AppState {
        users: user_store,
        faqs: Arc::new(faqs),
        store: faq_store,
        cache,
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let host = config
        .host
        .parse()
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

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    if let Some(pg) = pg_store {
        pg.close().await;
        tracing::info!("Database pool closed");
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

type Stores = (Arc<dyn FaqStore>, Arc<dyn UserStore>, Option<Arc<PgStore>>);

/// Connect the configured store. Postgres is migrated before use.
async fn open_store(config: &ServerConfig) -> anyhow::Result<Stores> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;

            let pool = polyfaq_db::create_pool(url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connection pool created");

            polyfaq_db::health_check(&pool)
                .await
                .context("Database health check failed")?;

            polyfaq_db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            let store = Arc::new(PgStore::new(pool));
            let faqs: Arc<dyn FaqStore> = store.clone();
            let users: Arc<dyn UserStore> = store.clone();
            Ok((faqs, users, Some(store)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; all data is lost on restart");
            let store = Arc::new(MemoryStore::new());
            let faqs: Arc<dyn FaqStore> = store.clone();
            let users: Arc<dyn UserStore> = store;
            Ok((faqs, users, None))
        }
    }
}

/// Connect the configured cache.
async fn open_cache(config: &ServerConfig) -> anyhow::Result<Arc<dyn Cache>> {
    let cache: Arc<dyn Cache> = match config.cache_backend {
        CacheBackend::Redis => {
            let redis = RedisCache::connect(&config.redis_url)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!("Redis cache connected");
            Arc::new(redis)
        }
        CacheBackend::Memory => {
            Arc::new(MemoryCache::with_capacity(config.memory_cache_capacity))
        }
        CacheBackend::None => {
            tracing::warn!("FAQ caching disabled; every read goes to the store");
            Arc::new(NoopCache)
        }
    };
    Ok(cache)
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
