//! Fabler Generator — the adapter around the external generative model.
//!
//! This crate is the trust boundary for model output: the raw response text
//! is extracted, parsed, and structurally validated here, so everything
//! downstream operates on a guaranteed [`fabler_core::blueprint`] shape.

pub mod client;
pub mod parse;
mod types;

pub use client::AnthropicGenerator;
