//! Todo repository implementation.
//!
//! Every lookup that mutates or removes a row filters by `(id, owner_id)`,
//! so a foreign id and an absent id are indistinguishable to the caller.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::todo::{self, ActiveModel, Entity as TodoEntity};
use crate::domain::Todo;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Todo repository trait for dependency injection.
///
/// `update_text` and `delete` return `None` when no row matches the
/// `(id, owner_id)` pair; callers map that to a not-found error.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Insert a new todo record
    async fn insert(&self, todo: Todo) -> AppResult<Todo>;

    /// List all todos owned by the given user, oldest first
    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Todo>>;

    /// Replace the text of an owned todo
    async fn update_text(&self, id: Uuid, owner_id: Uuid, text: String)
        -> AppResult<Option<Todo>>;

    /// Permanently delete an owned todo, returning the removed record
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<Option<Todo>>;
}

/// Concrete implementation of TodoRepository
pub struct TodoStore {
    db: DatabaseConnection,
}

impl TodoStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoRepository for TodoStore {
    async fn insert(&self, todo: Todo) -> AppResult<Todo> {
        let active_model = ActiveModel {
            id: Set(todo.id),
            text: Set(todo.text),
            owner_id: Set(todo.owner_id),
            created_at: Set(todo.created_at),
            updated_at: Set(todo.updated_at),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Todo::from(model))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Todo>> {
        let models = TodoEntity::find()
            .filter(todo::Column::OwnerId.eq(owner_id))
            .order_by_asc(todo::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Todo::from).collect())
    }

    async fn update_text(
        &self,
        id: Uuid,
        owner_id: Uuid,
        text: String,
    ) -> AppResult<Option<Todo>> {
        let Some(existing) = TodoEntity::find_by_id(id)
            .filter(todo::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?
        else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        active.text = Set(text);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Some(Todo::from(model)))
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<Option<Todo>> {
        let Some(existing) = TodoEntity::find_by_id(id)
            .filter(todo::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?
        else {
            return Ok(None);
        };

        let snapshot = Todo::from(existing);

        let result = TodoEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        // Lost a race with a concurrent delete
        if result.rows_affected == 0 {
            return Ok(None);
        }

        Ok(Some(snapshot))
    }
}
