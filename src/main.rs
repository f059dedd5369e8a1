// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use character_quiz::config::Config;
use character_quiz::error::LoadError;
use character_quiz::ml::artifacts::{ArtifactPaths, load_artifacts};
use character_quiz::quiz::dataset::QuizDataset;
use character_quiz::quiz::recorder::SqliteSubmissionSink;
use character_quiz::quiz::store::SessionStore;
use character_quiz::routes;
use character_quiz::state::{AppState, QuizResources};
use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Load model artifacts and questions. Nothing is served without them.
    tracing::info!("Loading model artifacts...");
    let resources = match load_resources(&config) {
        Ok(resources) => resources,
        Err(e) => {
            tracing::error!("Failed to load quiz resources: {}", e);
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&config.database_url)
        .await
        .unwrap_or_else(|e| panic!("Failed to open submissions database: {}", e));

    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    // Create AppState
    let state = AppState {
        config: config.clone(),
        resources: Arc::new(resources),
        sessions: Arc::new(SessionStore::new(Duration::from_secs(config.session_ttl))),
        sink: Arc::new(SqliteSubmissionSink::new(pool)),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .unwrap_or_else(|e| panic!("Invalid BIND_ADDR '{}': {}", config.bind_addr, e));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}

fn load_resources(config: &Config) -> Result<QuizResources, LoadError> {
    let artifacts = load_artifacts(&ArtifactPaths::from(config))?;
    let dataset = QuizDataset::load(&config.quiz_data_path)?;

    Ok(QuizResources {
        dataset,
        pipeline: artifacts.into_pipeline(),
    })
}
