//! Libris Library Loan Ledger
//!
//! Book catalog, patron registry, loan checkout/return with availability
//! accounting, reporting and keyword search, exposed as a REST JSON API.

use std::sync::Arc;

use sqlx::SqlitePool;

pub mod api;
pub mod config;
pub mod db;
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
    pub pool: SqlitePool,
}

impl AppState {
    /// Wire repositories and services on top of an open pool
    pub fn new(config: AppConfig, pool: SqlitePool) -> Self {
        let repository = repository::Repository::new(pool.clone());
        let services = services::Services::new(
            repository,
            config.loans.clone(),
            config.reports.clone(),
        );

        Self {
            config: Arc::new(config),
            services: Arc::new(services),
            pool,
        }
    }
}
