//! Business logic services

pub mod auth;
pub mod catalog;
pub mod lending;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub lending: lending::LendingService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            lending: lending::LendingService::new(repository.clone()),
            repository,
        }
    }
}
