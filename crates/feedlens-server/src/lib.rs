//! Feedlens Server
//!
//! HTTP API over the feedlens analysis pipeline: single and batch analysis,
//! theme classification, stored results and statistics, plus health and
//! Prometheus metrics endpoints.

pub mod cli;
pub mod config;
pub mod routes;
pub mod state;

pub use cli::Cli;
pub use config::{CorsConfig, ServerConfig};
pub use routes::{create_router, AppError};
pub use state::AppState;
