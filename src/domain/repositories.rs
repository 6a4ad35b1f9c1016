//! Repository aggregation

use crate::domain::organization::UserOrganizationRepositoryInterface;
use crate::domain::role::RoleRepositoryInterface;
use crate::domain::user::UserRepositoryInterface;

/// Unified access point to every data-access contract.
///
/// The service layer depends on this single trait; the SeaORM-backed
/// implementation lives in the infrastructure layer and tests substitute
/// in-memory fakes.
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepositoryInterface;
    fn roles(&self) -> &dyn RoleRepositoryInterface;
    fn user_organizations(&self) -> &dyn UserOrganizationRepositoryInterface;
}
