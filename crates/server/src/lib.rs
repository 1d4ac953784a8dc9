//! HTTP shell for the EcoFlow waste management service

pub mod api;
pub mod config;
pub mod pages;

pub use api::{create_router, AppState};
pub use config::ServerConfig;
