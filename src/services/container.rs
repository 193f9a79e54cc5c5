//! Service Container - Centralized service access.
//!
//! Depends on service traits, not implementations, so handlers and
//! tests can swap either service independently.

use std::sync::Arc;

use super::{AuthService, TodoService};
use crate::config::Config;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get todo service
    fn todos(&self) -> Arc<dyn TodoService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    todo_service: Arc<dyn TodoService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(auth_service: Arc<dyn AuthService>, todo_service: Arc<dyn TodoService>) -> Self {
        Self {
            auth_service,
            todo_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        use super::{Authenticator, TodoManager};

        let uow = Arc::new(Persistence::new(db));
        let auth_service = Arc::new(Authenticator::new(uow.clone(), config));
        let todo_service = Arc::new(TodoManager::new(uow));

        Self {
            auth_service,
            todo_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn todos(&self) -> Arc<dyn TodoService> {
        self.todo_service.clone()
    }
}
