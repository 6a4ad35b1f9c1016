use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::domain::{DomainError, DomainResult, UserOrganizationRepositoryInterface};
use crate::infrastructure::database::entities::user_organization;

pub struct SeaOrmUserOrganizationRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserOrganizationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserOrganizationRepositoryInterface for SeaOrmUserOrganizationRepository {
    async fn find_user_id_by_id(&self, users_organizations_id: i64) -> DomainResult<i64> {
        let link = user_organization::Entity::find_by_id(users_organizations_id)
            .one(&self.db)
            .await
            .map_err(DomainError::from)?;

        link.map(|l| l.user_id).ok_or_else(|| DomainError::NotFound {
            entity: "UserOrganization",
            field: "id",
            value: users_organizations_id.to_string(),
        })
    }
}
