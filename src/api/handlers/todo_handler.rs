//! Todo CRUD handlers.
//!
//! All routes here sit behind the JWT middleware; the owner identity
//! comes from request extensions, never from the request body.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, patch, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::TodoResponse;
use crate::errors::AppResult;

/// Todo creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTodoRequest {
    /// Todo content
    #[validate(length(min = 1, max = 1000, message = "Todo text must not be empty"))]
    #[schema(example = "Buy milk")]
    pub text: String,
}

/// Todo update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTodoRequest {
    /// Replacement todo content
    #[validate(length(min = 1, max = 1000, message = "Todo text must not be empty"))]
    #[schema(example = "Buy oat milk")]
    pub text: String,
}

/// Response envelope carrying a single todo
#[derive(Debug, Serialize, ToSchema)]
pub struct TodoEnvelope {
    /// Status message
    #[schema(example = "Todo created successfully")]
    pub message: String,
    /// The affected todo
    pub todo: TodoResponse,
}

/// Response envelope carrying the caller's todo list
#[derive(Debug, Serialize, ToSchema)]
pub struct TodoListEnvelope {
    /// Status message
    #[schema(example = "Todos retrieved successfully")]
    pub message: String,
    /// All todos owned by the caller
    pub todos: Vec<TodoResponse>,
}

/// Create todo routes (all require authentication)
pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/create-todo", post(create_todo))
        .route("/read-todos", get(read_todos))
        .route("/update-todo/:id", patch(update_todo))
        .route("/delete-todo/:id", delete(delete_todo))
}

/// Create a new todo for the authenticated user
#[utoipa::path(
    post,
    path = "/api/create-todo",
    tag = "Todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created successfully", body = TodoEnvelope),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateTodoRequest>,
) -> AppResult<(StatusCode, Json<TodoEnvelope>)> {
    let todo = state.todo_service.create_todo(user.id, payload.text).await?;

    Ok((
        StatusCode::CREATED,
        Json(TodoEnvelope {
            message: "Todo created successfully".to_string(),
            todo: TodoResponse::from(todo),
        }),
    ))
}

/// List all todos owned by the authenticated user
#[utoipa::path(
    get,
    path = "/api/read-todos",
    tag = "Todos",
    responses(
        (status = 200, description = "Todos retrieved successfully", body = TodoListEnvelope),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn read_todos(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<TodoListEnvelope>> {
    let todos = state.todo_service.list_todos(user.id).await?;

    Ok(Json(TodoListEnvelope {
        message: "Todos retrieved successfully".to_string(),
        todos: todos.into_iter().map(TodoResponse::from).collect(),
    }))
}

/// Update the text of an owned todo
#[utoipa::path(
    patch,
    path = "/api/update-todo/{id}",
    tag = "Todos",
    params(
        ("id" = Uuid, Path, description = "Todo identifier")
    ),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated successfully", body = TodoEnvelope),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Todo not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateTodoRequest>,
) -> AppResult<Json<TodoEnvelope>> {
    let todo = state
        .todo_service
        .update_todo(user.id, id, payload.text)
        .await?;

    Ok(Json(TodoEnvelope {
        message: "Todo updated successfully".to_string(),
        todo: TodoResponse::from(todo),
    }))
}

/// Delete an owned todo
#[utoipa::path(
    delete,
    path = "/api/delete-todo/{id}",
    tag = "Todos",
    params(
        ("id" = Uuid, Path, description = "Todo identifier")
    ),
    responses(
        (status = 200, description = "Todo deleted successfully", body = TodoEnvelope),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Todo not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TodoEnvelope>> {
    let todo = state.todo_service.delete_todo(user.id, id).await?;

    Ok(Json(TodoEnvelope {
        message: "Todo deleted successfully".to_string(),
        todo: TodoResponse::from(todo),
    }))
}
