//! Fabler API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use fabler_api::error::AppError;
use fabler_api::routes;
use fabler_api::state::AppState;
use fabler_core::clock::SystemClock;
use fabler_engine::runner::JobRunner;
use fabler_generator::AnthropicGenerator;
use fabler_store::{PgJobRepository, PgStoryRepository, schema};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Fabler API server");

    // Read configuration from environment.
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| AppError::Config("DATABASE_URL environment variable must be set".into()))?;
    let api_key = std::env::var("ANTHROPIC_API_KEY")
        .map_err(|_| AppError::Config("ANTHROPIC_API_KEY environment variable must be set".into()))?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
    let generation_timeout: u64 = std::env::var("GENERATION_TIMEOUT_SECS")
        .unwrap_or_else(|_| "120".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("GENERATION_TIMEOUT_SECS must be a u64: {e}")))?;

    // Create database connection pool and ensure the schema exists.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;
    schema::apply(&pool).await?;

    // Build collaborators and application state.
    let jobs = Arc::new(PgJobRepository::new(pool.clone()));
    let stories = Arc::new(PgStoryRepository::new(pool));
    let generator = match std::env::var("GENERATOR_BASE_URL") {
        Ok(base_url) => AnthropicGenerator::with_base_url(api_key, base_url),
        Err(_) => AnthropicGenerator::new(api_key),
    };
    let clock = Arc::new(SystemClock);

    let runner = JobRunner::new(
        jobs.clone(),
        stories.clone(),
        Arc::new(generator),
        clock.clone(),
    )
    .with_generation_timeout(Duration::from_secs(generation_timeout));

    let app_state = AppState::new(jobs, stories, runner, clock);

    // Build router.
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/jobs", routes::jobs::router())
        .nest("/api/stories", routes::stories::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
