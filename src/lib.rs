//! Affine evaluation environment CLI.
//!
//! Exposes modules for integration testing

pub mod cli;
pub mod config;

pub use config::{AgentSettings, AppConfig, ServerSettings};
