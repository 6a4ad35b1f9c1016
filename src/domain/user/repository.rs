use async_trait::async_trait;

use super::User;
use crate::domain::DomainResult;

/// Data-access contract for users.
///
/// Lookups signal `DomainError::NotFound` themselves; the service layer
/// never synthesizes a not-found condition.
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn create(&self, user: User) -> DomainResult<User>;

    async fn find_by_id(&self, id: i64) -> DomainResult<User>;
    /// Fetch the half-open row range `[from, to)` ordered by id.
    /// An out-of-range upper bound yields a short (or empty) page.
    async fn find_all(&self, from: u64, to: u64) -> DomainResult<Vec<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<User>;
    async fn find_by_organization_id(&self, organization_id: i64) -> DomainResult<Vec<User>>;
    async fn find_by_role_id(&self, role_id: i64) -> DomainResult<Vec<User>>;
    async fn find_user_by_comment_id(&self, comment_id: i64) -> DomainResult<Vec<User>>;

    async fn update(&self, user: User) -> DomainResult<User>;
    async fn update_password(&self, user_id: i64, new_password: &str) -> DomainResult<bool>;
    async fn delete(&self, id: i64) -> DomainResult<bool>;
}
