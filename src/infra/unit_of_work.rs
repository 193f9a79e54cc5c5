//! Unit of Work pattern implementation.
//!
//! Centralizes access to all repositories behind one injection point.
//! Every operation in this application is a single per-row statement,
//! so no multi-statement transaction API is exposed here.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{TodoRepository, TodoStore, UserRepository, UserStore};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get todo repository
    fn todos(&self) -> Arc<dyn TodoRepository>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    user_repo: Arc<UserStore>,
    todo_repo: Arc<TodoStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let todo_repo = Arc::new(TodoStore::new(db));
        Self {
            user_repo,
            todo_repo,
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn todos(&self) -> Arc<dyn TodoRepository> {
        self.todo_repo.clone()
    }
}
