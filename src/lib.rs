//! MatchInsight: fixture statistics aggregation for prediction grounding
//!
//! Library crate exposing all modules for use by integration tests
//! and the command-line binary.

pub mod config;
pub mod types;
pub mod provider;
pub mod resolver;
pub mod engine;

pub use engine::MatchInsight;
