//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::TimeZone;
use http_body_util::BodyExt;
use tower::ServiceExt;

use fabler_api::routes;
use fabler_api::state::AppState;
use fabler_core::clock::Clock;
use fabler_core::generator::StoryGenerator;
use fabler_engine::runner::JobRunner;
use fabler_test_support::{FixedClock, InMemoryJobRepository, InMemoryStoryRepository};

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router with in-memory storage and the given generator.
/// Uses the same route structure as `main.rs`.
pub fn build_test_app(generator: Arc<dyn StoryGenerator>) -> Router {
    let jobs = Arc::new(InMemoryJobRepository::new());
    let stories = Arc::new(InMemoryStoryRepository::new());
    let clock = fixed_clock();
    let runner = JobRunner::new(jobs.clone(), stories.clone(), generator, clock.clone());
    let app_state = AppState::new(jobs, stories, runner, clock);

    Router::new()
        .merge(routes::health::router())
        .nest("/api/jobs", routes::jobs::router())
        .nest("/api/stories", routes::stories::router())
        .with_state(app_state)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Polls job status until the spawned runner reaches a terminal state.
///
/// # Panics
///
/// Panics if the job is still pending or processing after ~2 seconds.
pub async fn poll_until_terminal(app: &Router, job_id: &str) -> serde_json::Value {
    for _ in 0..200 {
        let (status, json) = get_json(app, &format!("/api/jobs/{job_id}")).await;
        assert_eq!(status, StatusCode::OK);
        match json["status"].as_str() {
            Some("completed" | "failed") => return json,
            _ => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    panic!("job {job_id} never reached a terminal state");
}
