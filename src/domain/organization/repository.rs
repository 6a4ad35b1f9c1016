use async_trait::async_trait;

use crate::domain::DomainResult;

/// Data-access contract for user-organization link rows.
///
/// Only the reverse lookup is needed: resolve the owning user id from a
/// link id. Organization management itself lives in another module.
#[async_trait]
pub trait UserOrganizationRepositoryInterface: Send + Sync {
    async fn find_user_id_by_id(&self, users_organizations_id: i64) -> DomainResult<i64>;
}
