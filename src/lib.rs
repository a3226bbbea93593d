pub mod api;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;
pub mod telemetry;
pub mod vector_store;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod errors_tests;

pub use crate::config::AppConfig;
pub use errors::*;
