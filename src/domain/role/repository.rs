use async_trait::async_trait;

use super::Role;
use crate::domain::DomainResult;

/// Data-access contract for roles and the user-role join.
#[async_trait]
pub trait RoleRepositoryInterface: Send + Sync {
    async fn find_all(&self) -> DomainResult<Vec<Role>>;
    async fn get_roles_by_user_id(&self, user_id: i64) -> DomainResult<Vec<Role>>;

    async fn add_role_to_user(&self, user_id: i64, role_id: i64) -> DomainResult<bool>;
    async fn remove_role_from_user(&self, user_id: i64, role_id: i64) -> DomainResult<bool>;
}
