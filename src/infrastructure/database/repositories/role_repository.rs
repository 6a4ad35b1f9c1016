use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::domain::{DomainError, DomainResult, Role, RoleRepositoryInterface};
use crate::infrastructure::database::entities::{role, user_role};

pub struct SeaOrmRoleRepository {
    db: DatabaseConnection,
}

impl SeaOrmRoleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn role_model_to_domain(model: role::Model) -> Role {
    Role {
        id: model.id,
        name: model.name,
    }
}

#[async_trait]
impl RoleRepositoryInterface for SeaOrmRoleRepository {
    async fn find_all(&self) -> DomainResult<Vec<Role>> {
        let models = role::Entity::find()
            .order_by_asc(role::Column::Id)
            .all(&self.db)
            .await
            .map_err(DomainError::from)?;

        Ok(models.into_iter().map(role_model_to_domain).collect())
    }

    async fn get_roles_by_user_id(&self, user_id: i64) -> DomainResult<Vec<Role>> {
        let models = role::Entity::find()
            .join(JoinType::InnerJoin, role::Relation::UserRoles.def())
            .filter(user_role::Column::UserId.eq(user_id))
            .order_by_asc(role::Column::Id)
            .all(&self.db)
            .await
            .map_err(DomainError::from)?;

        Ok(models.into_iter().map(role_model_to_domain).collect())
    }

    async fn add_role_to_user(&self, user_id: i64, role_id: i64) -> DomainResult<bool> {
        let grant = user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
        };

        grant.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") || e.to_string().contains("duplicate") {
                DomainError::Conflict(format!(
                    "User {} already has role {}",
                    user_id, role_id
                ))
            } else {
                DomainError::from(e)
            }
        })?;

        Ok(true)
    }

    async fn remove_role_from_user(&self, user_id: i64, role_id: i64) -> DomainResult<bool> {
        let result = user_role::Entity::delete_by_id((user_id, role_id))
            .exec(&self.db)
            .await
            .map_err(DomainError::from)?;

        Ok(result.rows_affected > 0)
    }
}
