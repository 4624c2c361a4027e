//! Fabler Core — shared domain types and abstractions.
//!
//! This crate defines the records, errors, and trait seams that every other
//! crate depends on. It contains no infrastructure code.

pub mod blueprint;
pub mod clock;
pub mod error;
pub mod generator;
pub mod job;
pub mod repository;
pub mod story;
