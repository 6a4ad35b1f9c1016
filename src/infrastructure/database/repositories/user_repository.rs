use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::domain::{DomainError, DomainResult, User, UserRepositoryInterface};
use crate::infrastructure::database::entities::{comment, user, user_organization, user_role};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        name: model.name,
        surname: model.surname,
        email: model.email,
        phone_number: model.phone_number,
        password: model.password,
        active: model.active,
        created_at: model.created_at,
        updated_at: model.updated_at,
        authorities: Vec::new(),
    }
}

fn map_insert_err(e: sea_orm::DbErr) -> DomainError {
    if e.to_string().contains("UNIQUE") || e.to_string().contains("duplicate") {
        DomainError::Conflict("Email already exists".to_string())
    } else {
        DomainError::from(e)
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for SeaOrmUserRepository {
    async fn create(&self, user: User) -> DomainResult<User> {
        let now = Utc::now();

        let new_user = user::ActiveModel {
            id: NotSet,
            name: Set(user.name),
            surname: Set(user.surname),
            email: Set(user.email),
            phone_number: Set(user.phone_number),
            password: Set(user.password),
            active: Set(user.active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = new_user.insert(&self.db).await.map_err(map_insert_err)?;

        Ok(user_model_to_domain(created))
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<User> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(DomainError::from)?;

        model
            .map(user_model_to_domain)
            .ok_or_else(|| DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            })
    }

    async fn find_all(&self, from: u64, to: u64) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .offset(from)
            .limit(to.saturating_sub(from))
            .all(&self.db)
            .await
            .map_err(DomainError::from)?;

        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<User> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(DomainError::from)?;

        model
            .map(user_model_to_domain)
            .ok_or_else(|| DomainError::NotFound {
                entity: "User",
                field: "email",
                value: email.to_string(),
            })
    }

    async fn find_by_organization_id(&self, organization_id: i64) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .join(JoinType::InnerJoin, user::Relation::UserOrganizations.def())
            .filter(user_organization::Column::OrganizationId.eq(organization_id))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(DomainError::from)?;

        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn find_by_role_id(&self, role_id: i64) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .join(JoinType::InnerJoin, user::Relation::UserRoles.def())
            .filter(user_role::Column::RoleId.eq(role_id))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(DomainError::from)?;

        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn find_user_by_comment_id(&self, comment_id: i64) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .join(JoinType::InnerJoin, user::Relation::Comments.def())
            .filter(comment::Column::Id.eq(comment_id))
            .all(&self.db)
            .await
            .map_err(DomainError::from)?;

        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn update(&self, user: User) -> DomainResult<User> {
        let existing = user::Entity::find_by_id(user.id)
            .one(&self.db)
            .await
            .map_err(DomainError::from)?;

        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: user.id.to_string(),
            });
        };

        let mut active: user::ActiveModel = existing.into();

        active.name = Set(user.name);
        active.surname = Set(user.surname);
        active.email = Set(user.email);
        active.phone_number = Set(user.phone_number);
        active.active = Set(user.active);
        // An empty credential means "leave the stored one alone"
        if !user.password.is_empty() {
            active.password = Set(user.password);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(map_insert_err)?;

        Ok(user_model_to_domain(updated))
    }

    async fn update_password(&self, user_id: i64, new_password: &str) -> DomainResult<bool> {
        let existing = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(DomainError::from)?;

        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: user_id.to_string(),
            });
        };

        let mut active: user::ActiveModel = existing.into();
        active.password = Set(new_password.to_string());
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(DomainError::from)?;

        Ok(true)
    }

    async fn delete(&self, id: i64) -> DomainResult<bool> {
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(DomainError::from)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            });
        }

        Ok(true)
    }
}
