//! Todo service - Handles todo-related business logic.
//!
//! All operations take the verified caller identity as `owner_id`;
//! ownership never comes from request input.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Todo;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Todo service trait for dependency injection.
///
/// Update and delete treat a mismatched owner the same as a missing
/// record: both come back as not found, with no mutation.
#[async_trait]
pub trait TodoService: Send + Sync {
    /// Create a new todo owned by the caller
    async fn create_todo(&self, owner_id: Uuid, text: String) -> AppResult<Todo>;

    /// List all todos owned by the caller
    async fn list_todos(&self, owner_id: Uuid) -> AppResult<Vec<Todo>>;

    /// Replace the text of an owned todo
    async fn update_todo(&self, owner_id: Uuid, id: Uuid, text: String) -> AppResult<Todo>;

    /// Permanently delete an owned todo, returning the removed record
    async fn delete_todo(&self, owner_id: Uuid, id: Uuid) -> AppResult<Todo>;
}

/// Reject empty or whitespace-only todo text before any persistence write.
fn validate_text(text: &str) -> AppResult<()> {
    if text.trim().is_empty() {
        return Err(AppError::validation("Todo text must not be empty"));
    }
    Ok(())
}

/// Concrete implementation of TodoService using Unit of Work.
pub struct TodoManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> TodoManager<U> {
    /// Create new todo service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> TodoService for TodoManager<U> {
    async fn create_todo(&self, owner_id: Uuid, text: String) -> AppResult<Todo> {
        validate_text(&text)?;

        let todo = Todo::new(owner_id, text);
        self.uow.todos().insert(todo).await
    }

    async fn list_todos(&self, owner_id: Uuid) -> AppResult<Vec<Todo>> {
        self.uow.todos().list_by_owner(owner_id).await
    }

    async fn update_todo(&self, owner_id: Uuid, id: Uuid, text: String) -> AppResult<Todo> {
        validate_text(&text)?;

        self.uow
            .todos()
            .update_text(id, owner_id, text)
            .await?
            .ok_or_not_found()
    }

    async fn delete_todo(&self, owner_id: Uuid, id: Uuid) -> AppResult<Todo> {
        self.uow
            .todos()
            .delete(id, owner_id)
            .await?
            .ok_or_not_found()
    }
}
