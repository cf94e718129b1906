use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chomp_api::{
    build_router,
    config::Config,
    purge::spawn_purge_task,
    state::AppState,
    votes::VoteEventWorker,
};
use chomp_classroom::ClassroomClient;
use chomp_persist::{ForumStore, MongoForumStoreBuilder, ScorePropagator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Chomp API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    tracing::info!("Connecting to MongoDB");
    let store: Arc<dyn ForumStore> = Arc::new(
        MongoForumStoreBuilder::new()
            .mongodb_uri(&config.mongodb_uri)
            .database(&config.mongodb.database)
            .max_pool_size(config.mongodb.pool_size)
            .connect_timeout(Duration::from_millis(config.mongodb.timeout_ms))
            .app_name("chomp-api")
            .build()
            .await?,
    );
    if let Err(e) = store.ping().await {
        tracing::warn!(error = %e, "MongoDB not reachable yet");
    }

    let classroom = ClassroomClient::new(config.classroom.clone())?;

    let (publisher, worker) =
        VoteEventWorker::new(ScorePropagator::new(store.clone()), config.votes.channel_capacity);
    worker.spawn();
    spawn_purge_task(store.clone(), config.purge.clone());

    let state = Arc::new(AppState::new(config.clone(), store, classroom, publisher));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api/docs", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry.with(tracing_subscriber::fmt::layer().json()).init();
        }
        _ => {
            registry.with(tracing_subscriber::fmt::layer().pretty()).init();
        }
    }
}
