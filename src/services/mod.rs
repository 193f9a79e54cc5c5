//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use Unit of Work pattern for centralized repository access.

mod auth_service;
pub mod container;
mod todo_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use todo_service::{TodoManager, TodoService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
