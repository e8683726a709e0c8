//! Bookshelf
//!
//! A small REST JSON server managing a collection of books held in memory.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build the state around a fresh, empty book store
    pub fn new(config: AppConfig) -> Self {
        let services = services::Services::new(repository::Repository::new(), &config.books);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
