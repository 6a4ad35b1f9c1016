//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::organization::UserOrganizationRepositoryInterface;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::role::RoleRepositoryInterface;
use crate::domain::user::UserRepositoryInterface;

use super::role_repository::SeaOrmRoleRepository;
use super::user_organization_repository::SeaOrmUserOrganizationRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    roles: SeaOrmRoleRepository,
    user_organizations: SeaOrmUserOrganizationRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            roles: SeaOrmRoleRepository::new(db.clone()),
            user_organizations: SeaOrmUserOrganizationRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepositoryInterface {
        &self.users
    }

    fn roles(&self) -> &dyn RoleRepositoryInterface {
        &self.roles
    }

    fn user_organizations(&self) -> &dyn UserOrganizationRepositoryInterface {
        &self.user_organizations
    }
}
