//! Todo domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Todo domain entity
///
/// A todo belongs to exactly one owner, fixed at creation. The id is
/// generated here and never reused after deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Create a new todo owned by the given user.
    pub fn new(owner_id: Uuid, text: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            text,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the todo text in place. Owner and id never change.
    pub fn update_text(&mut self, text: String) {
        self.text = text;
        self.updated_at = Utc::now();
    }
}

/// Todo response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TodoResponse {
    /// Unique todo identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Todo content
    #[schema(example = "Buy milk")]
    pub text: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            text: todo.text,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}
