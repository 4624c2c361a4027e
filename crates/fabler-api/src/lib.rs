//! Fabler API — axum HTTP surface for the story engine.

pub mod error;
pub mod routes;
pub mod state;
