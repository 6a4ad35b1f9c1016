pub mod error;
pub mod organization;
pub mod repositories;
pub mod role;
pub mod user;

// Re-export commonly used types
pub use error::{DomainError, DomainResult};
pub use organization::UserOrganizationRepositoryInterface;
pub use repositories::RepositoryProvider;
pub use role::{Role, RoleRepositoryInterface};
pub use user::{User, UserRepositoryInterface};
