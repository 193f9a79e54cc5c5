//! Integration tests for API endpoints.
//!
//! These tests drive the real router with real services over in-memory
//! repositories, so no database or network connections are required.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use todo_api::api::create_router;
use todo_api::config::Config;
use todo_api::domain::{Todo, User};
use todo_api::errors::AppResult;
use todo_api::infra::{Database, TodoRepository, UnitOfWork, UserRepository};
use todo_api::services::{Authenticator, TodoManager};
use todo_api::AppState;

// =============================================================================
// In-Memory Repositories
// =============================================================================

/// In-memory user repository backed by a mutex-guarded vector
#[derive(Default)]
struct InMemoryUserRepo {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepo {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, email: String, password_hash: String, name: String) -> AppResult<User> {
        let user = User::new(Uuid::new_v4(), email, password_hash, name);
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }
}

/// In-memory todo repository with the same ownership filtering as the
/// real store: a foreign (id, owner_id) pair behaves like a missing row.
#[derive(Default)]
struct InMemoryTodoRepo {
    todos: Mutex<Vec<Todo>>,
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepo {
    async fn insert(&self, todo: Todo) -> AppResult<Todo> {
        self.todos.lock().unwrap().push(todo.clone());
        Ok(todo)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Todo>> {
        let todos = self.todos.lock().unwrap();
        let mut owned: Vec<Todo> = todos
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by_key(|t| t.created_at);
        Ok(owned)
    }

    async fn update_text(&self, id: Uuid, owner_id: Uuid, text: String) -> AppResult<Option<Todo>> {
        let mut todos = self.todos.lock().unwrap();
        match todos
            .iter_mut()
            .find(|t| t.id == id && t.owner_id == owner_id)
        {
            Some(todo) => {
                todo.update_text(text);
                Ok(Some(todo.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<Option<Todo>> {
        let mut todos = self.todos.lock().unwrap();
        match todos
            .iter()
            .position(|t| t.id == id && t.owner_id == owner_id)
        {
            Some(index) => Ok(Some(todos.remove(index))),
            None => Ok(None),
        }
    }
}

/// Test mock for UnitOfWork that wraps the in-memory repositories
struct TestUnitOfWork {
    user_repo: Arc<InMemoryUserRepo>,
    todo_repo: Arc<InMemoryTodoRepo>,
}

impl TestUnitOfWork {
    fn new() -> Self {
        Self {
            user_repo: Arc::new(InMemoryUserRepo::default()),
            todo_repo: Arc::new(InMemoryTodoRepo::default()),
        }
    }
}

impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn todos(&self) -> Arc<dyn TodoRepository> {
        self.todo_repo.clone()
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

fn test_app_with_database(connection: DatabaseConnection) -> Router {
    let config = Config::new(
        "postgres://unused",
        "test-secret-key-for-testing-only-32chars",
        24,
    );
    let uow = Arc::new(TestUnitOfWork::new());
    let auth_service = Arc::new(Authenticator::new(uow.clone(), config));
    let todo_service = Arc::new(TodoManager::new(uow));
    let database = Arc::new(Database::from_connection(connection));

    create_router(AppState::new(auth_service, todo_service, database))
}

fn test_app() -> Router {
    test_app_with_database(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user and return a bearer token for them
async fn register_and_login(app: &Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": email, "password": "password123", "name": "Test User"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": email, "password": "password123"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    body["access_token"].as_str().unwrap().to_string()
}

// =============================================================================
// Root and Health Endpoints
// =============================================================================

#[tokio::test]
async fn test_root_returns_running_message() {
    let app = test_app();

    let response = app
        .oneshot(json_request(Method::GET, "/", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Todo API is running");
}

#[tokio::test]
async fn test_health_reports_database_healthy() {
    let connection = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let app = test_app_with_database(connection);

    let response = app
        .oneshot(json_request(Method::GET, "/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
}

// =============================================================================
// Authentication Endpoints
// =============================================================================

#[tokio::test]
async fn test_register_returns_created_user() {
    let app = test_app();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "new@example.com", "password": "password123", "name": "New User"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["email"], "new@example.com");
    assert_eq!(body["name"], "New User");
    // The password hash must never appear in a response
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflict() {
    let app = test_app();
    register_and_login(&app, "taken@example.com").await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "taken@example.com", "password": "password123", "name": "Copycat"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let app = test_app();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "not-an-email", "password": "password123", "name": "Test User"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_wrong_password_unauthorized() {
    let app = test_app();
    register_and_login(&app, "user@example.com").await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "user@example.com", "password": "wrong_password"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_login_unknown_email_unauthorized() {
    let app = test_app();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "nobody@example.com", "password": "password123"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Authentication Middleware
// =============================================================================

#[tokio::test]
async fn test_todo_routes_require_token() {
    let app = test_app();
    let id = Uuid::new_v4();

    let requests = vec![
        json_request(
            Method::POST,
            "/api/create-todo",
            None,
            Some(json!({"text": "Buy milk"})),
        ),
        json_request(Method::GET, "/api/read-todos", None, None),
        json_request(
            Method::PATCH,
            &format!("/api/update-todo/{}", id),
            None,
            Some(json!({"text": "Buy oat milk"})),
        ),
        json_request(Method::DELETE, &format!("/api/delete-todo/{}", id), None, None),
    ];

    for request in requests {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_invalid_token_rejected() {
    let app = test_app();

    let response = app
        .oneshot(json_request(
            Method::GET,
            "/api/read-todos",
            Some("garbage-token"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    // Negative expiration mints tokens that are already expired
    let config = Config::new(
        "postgres://unused",
        "test-secret-key-for-testing-only-32chars",
        -1,
    );
    let uow = Arc::new(TestUnitOfWork::new());
    let auth_service = Arc::new(Authenticator::new(uow.clone(), config));
    let todo_service = Arc::new(TodoManager::new(uow));
    let database = Arc::new(Database::from_connection(
        MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
    ));
    let app = create_router(AppState::new(auth_service, todo_service, database));

    let token = register_and_login(&app, "expired@example.com").await;

    let response = app
        .oneshot(json_request(
            Method::GET,
            "/api/read-todos",
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_scheme_rejected() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/read-todos")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Todo CRUD Flow
// =============================================================================

#[tokio::test]
async fn test_todo_crud_flow() {
    let app = test_app();
    let token = register_and_login(&app, "crud@example.com").await;

    // Create
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/create-todo",
            Some(&token),
            Some(json!({"text": "Buy milk"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Todo created successfully");
    assert_eq!(body["todo"]["text"], "Buy milk");
    let todo_id = body["todo"]["id"].as_str().unwrap().to_string();

    // Read
    let response = app
        .clone()
        .oneshot(json_request(Method::GET, "/api/read-todos", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Todos retrieved successfully");
    assert_eq!(body["todos"].as_array().unwrap().len(), 1);

    // Update
    let response = app
        .clone()
        .oneshot(json_request(
            Method::PATCH,
            &format!("/api/update-todo/{}", todo_id),
            Some(&token),
            Some(json!({"text": "Buy oat milk"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Todo updated successfully");
    assert_eq!(body["todo"]["text"], "Buy oat milk");
    assert_eq!(body["todo"]["id"], todo_id.as_str());

    // Delete
    let response = app
        .clone()
        .oneshot(json_request(
            Method::DELETE,
            &format!("/api/delete-todo/{}", todo_id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Todo deleted successfully");
    assert_eq!(body["todo"]["id"], todo_id.as_str());

    // The list is empty again
    let response = app
        .clone()
        .oneshot(json_request(Method::GET, "/api/read-todos", Some(&token), None))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert!(body["todos"].as_array().unwrap().is_empty());

    // Operations on the deleted id behave like the id never existed
    let response = app
        .clone()
        .oneshot(json_request(
            Method::PATCH,
            &format!("/api/update-todo/{}", todo_id),
            Some(&token),
            Some(json!({"text": "Resurrect"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::DELETE,
            &format!("/api/delete-todo/{}", todo_id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_todos_are_scoped_to_owner() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@example.com").await;
    let bob = register_and_login(&app, "bob@example.com").await;

    // Alice creates a todo
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/create-todo",
            Some(&alice),
            Some(json!({"text": "Alice's secret"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    let todo_id = body["todo"]["id"].as_str().unwrap().to_string();

    // Bob sees an empty list
    let response = app
        .clone()
        .oneshot(json_request(Method::GET, "/api/read-todos", Some(&bob), None))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert!(body["todos"].as_array().unwrap().is_empty());

    // Bob cannot update Alice's todo, even knowing its id
    let response = app
        .clone()
        .oneshot(json_request(
            Method::PATCH,
            &format!("/api/update-todo/{}", todo_id),
            Some(&bob),
            Some(json!({"text": "Bob was here"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Bob cannot delete it either
    let response = app
        .clone()
        .oneshot(json_request(
            Method::DELETE,
            &format!("/api/delete-todo/{}", todo_id),
            Some(&bob),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Alice's todo is untouched
    let response = app
        .clone()
        .oneshot(json_request(Method::GET, "/api/read-todos", Some(&alice), None))
        .await
        .unwrap();
    let body = response_json(response).await;
    let todos = body["todos"].as_array().unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["text"], "Alice's secret");
}

#[tokio::test]
async fn test_create_todo_rejects_empty_text() {
    let app = test_app();
    let token = register_and_login(&app, "empty@example.com").await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/create-todo",
            Some(&token),
            Some(json!({"text": ""})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_missing_todo_not_found() {
    let app = test_app();
    let token = register_and_login(&app, "missing@example.com").await;

    let response = app
        .oneshot(json_request(
            Method::PATCH,
            &format!("/api/update-todo/{}", Uuid::new_v4()),
            Some(&token),
            Some(json!({"text": "Buy oat milk"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
