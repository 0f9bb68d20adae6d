//! Business logic services

pub mod catalog;
pub mod loans;
pub mod search;
pub mod stats;

use crate::{
    config::{LoansConfig, ReportsConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub stats: stats::StatsService,
    pub search: search::SearchService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, loans_config: LoansConfig, reports_config: ReportsConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone(), loans_config),
            stats: stats::StatsService::new(repository.clone(), reports_config),
            search: search::SearchService::new(repository),
        }
    }
}
