//! User business logic service

use std::sync::Arc;

use tracing::info;

use crate::application::dto::{RoleDto, UserDto};
use crate::domain::{DomainError, DomainResult, RepositoryProvider, User};

/// Number of users returned per `find_all` page
pub const PAGINATION_PAGE_SIZE: u64 = 10;

/// Service for user management operations.
///
/// Thin orchestration over the data-access contracts. The policy held here:
/// the activity-flag lifecycle (forced on create, frozen on generic update,
/// flipped only by `activate`) and role-set synchronization.
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create(&self, dto: UserDto) -> DomainResult<UserDto> {
        let mut user = User::from(dto);

        // New accounts always start active
        user.active = true;

        let created = self.repos.users().create(user).await?;
        info!("User created: {} ({})", created.id, created.email);

        Ok(UserDto::from(created))
    }

    pub async fn find_by_id(&self, id: i64) -> DomainResult<UserDto> {
        Ok(UserDto::from(self.repos.users().find_by_id(id).await?))
    }

    pub async fn find_all(&self, page_id: i64) -> DomainResult<Vec<UserDto>> {
        if page_id < 1 {
            return Err(DomainError::Validation(
                "Page id should be greater than 0".to_string(),
            ));
        }

        let from = (page_id as u64 - 1) * PAGINATION_PAGE_SIZE;
        let to = from + PAGINATION_PAGE_SIZE;

        let users = self.repos.users().find_all(from, to).await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    pub async fn find_by_email(&self, email: &str) -> DomainResult<UserDto> {
        Ok(UserDto::from(self.repos.users().find_by_email(email).await?))
    }

    /// Resolve a user through an organization-membership link id.
    ///
    /// Two sequential reads; a deletion racing between them surfaces as the
    /// second read's not-found.
    pub async fn find_by_users_organizations_id(&self, users_org_id: i64) -> DomainResult<UserDto> {
        let user_id = self
            .repos
            .user_organizations()
            .find_user_id_by_id(users_org_id)
            .await?;

        Ok(UserDto::from(self.repos.users().find_by_id(user_id).await?))
    }

    pub async fn update(&self, dto: UserDto) -> DomainResult<UserDto> {
        let mut updated = User::from(dto);

        // Activity state cannot be changed through the generic update path
        let stored = self.repos.users().find_by_id(updated.id).await?;
        updated.active = stored.active;

        Ok(UserDto::from(self.repos.users().update(updated).await?))
    }

    pub async fn find_by_organization_id(
        &self,
        organization_id: i64,
    ) -> DomainResult<Vec<UserDto>> {
        let users = self
            .repos
            .users()
            .find_by_organization_id(organization_id)
            .await?;

        Ok(users.into_iter().map(UserDto::from).collect())
    }

    pub async fn find_by_role_id(&self, role_id: i64) -> DomainResult<Vec<UserDto>> {
        let users = self.repos.users().find_by_role_id(role_id).await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    pub async fn delete(&self, id: i64) -> DomainResult<bool> {
        self.repos.users().delete(id).await
    }

    /// Re-enable an account. Idempotent: already-active users are rewritten
    /// as active and the call still reports success.
    pub async fn activate(&self, id: i64) -> DomainResult<bool> {
        let mut user = self.repos.users().find_by_id(id).await?;
        user.active = true;
        self.repos.users().update(user).await?;
        Ok(true)
    }

    /// Load a user plus authorities for the authentication layer.
    ///
    /// The username is the account email; an unknown email is a not-found
    /// condition, as the login contract requires.
    pub async fn load_user_by_username(&self, username: &str) -> DomainResult<User> {
        let mut user = self.repos.users().find_by_email(username).await?;
        user.authorities = self.repos.roles().get_roles_by_user_id(user.id).await?;
        Ok(user)
    }

    pub async fn update_password(&self, user_id: i64, new_password: &str) -> DomainResult<bool> {
        self.repos
            .users()
            .update_password(user_id, new_password)
            .await
    }

    pub async fn get_roles(&self, id: i64) -> DomainResult<Vec<RoleDto>> {
        let roles = self.repos.roles().get_roles_by_user_id(id).await?;
        Ok(roles.into_iter().map(RoleDto::from).collect())
    }

    /// Synchronize a user's role set with `new_role_ids`.
    ///
    /// Ids that do not name an existing role are silently ignored. Grants
    /// are issued before revocations; there is no atomicity across the two
    /// passes.
    pub async fn set_roles(&self, user_id: i64, new_role_ids: &[i64]) -> DomainResult<bool> {
        let existing_ids: Vec<i64> = self
            .repos
            .roles()
            .find_all()
            .await?
            .iter()
            .map(|r| r.id)
            .collect();

        let current_ids: Vec<i64> = self
            .repos
            .roles()
            .get_roles_by_user_id(user_id)
            .await?
            .iter()
            .map(|r| r.id)
            .collect();

        // Grant newly requested roles
        for role_id in new_role_ids {
            if !current_ids.contains(role_id) && existing_ids.contains(role_id) {
                self.repos
                    .roles()
                    .add_role_to_user(user_id, *role_id)
                    .await?;
            }
        }

        // Revoke roles that are no longer requested
        for role_id in &current_ids {
            if !new_role_ids.contains(role_id) {
                self.repos
                    .roles()
                    .remove_role_from_user(user_id, *role_id)
                    .await?;
            }
        }

        Ok(true)
    }

    pub async fn find_user_by_comment_id(&self, comment_id: i64) -> DomainResult<Vec<UserDto>> {
        let users = self
            .repos
            .users()
            .find_user_by_comment_id(comment_id)
            .await?;

        Ok(users.into_iter().map(UserDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::domain::{
        Role, RoleRepositoryInterface, UserOrganizationRepositoryInterface,
        UserRepositoryInterface,
    };

    fn sample_user(id: i64, active: bool) -> User {
        User {
            id,
            name: "User".to_string(),
            surname: "Test".to_string(),
            email: format!("user{}@example.com", id),
            phone_number: Some("06558818".to_string()),
            password: "stored-hash".to_string(),
            active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            authorities: Vec::new(),
        }
    }

    #[derive(Default)]
    struct FakeUserRepo {
        users: Mutex<Vec<User>>,
        find_all_calls: Mutex<Vec<(u64, u64)>>,
    }

    impl FakeUserRepo {
        fn with_users(users: Vec<User>) -> Self {
            Self {
                users: Mutex::new(users),
                find_all_calls: Mutex::new(Vec::new()),
            }
        }

        fn stored(&self, id: i64) -> Option<User> {
            self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
        }
    }

    #[async_trait]
    impl UserRepositoryInterface for FakeUserRepo {
        async fn create(&self, mut user: User) -> DomainResult<User> {
            let mut users = self.users.lock().unwrap();
            user.id = users.len() as i64 + 1;
            users.push(user.clone());
            Ok(user)
        }

        async fn find_by_id(&self, id: i64) -> DomainResult<User> {
            self.stored(id).ok_or(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            })
        }

        async fn find_all(&self, from: u64, to: u64) -> DomainResult<Vec<User>> {
            self.find_all_calls.lock().unwrap().push((from, to));
            Ok(Vec::new())
        }

        async fn find_by_email(&self, email: &str) -> DomainResult<User> {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned()
                .ok_or(DomainError::NotFound {
                    entity: "User",
                    field: "email",
                    value: email.to_string(),
                })
        }

        async fn find_by_organization_id(&self, _organization_id: i64) -> DomainResult<Vec<User>> {
            Ok(self.users.lock().unwrap().clone())
        }

        async fn find_by_role_id(&self, _role_id: i64) -> DomainResult<Vec<User>> {
            Ok(self.users.lock().unwrap().clone())
        }

        async fn find_user_by_comment_id(&self, _comment_id: i64) -> DomainResult<Vec<User>> {
            Ok(self.users.lock().unwrap().clone())
        }

        async fn update(&self, mut user: User) -> DomainResult<User> {
            let mut users = self.users.lock().unwrap();
            let Some(slot) = users.iter_mut().find(|u| u.id == user.id) else {
                return Err(DomainError::NotFound {
                    entity: "User",
                    field: "id",
                    value: user.id.to_string(),
                });
            };
            // Same contract as the SeaORM repository: an empty credential
            // leaves the stored one alone
            if user.password.is_empty() {
                user.password = slot.password.clone();
            }
            *slot = user.clone();
            Ok(user)
        }

        async fn update_password(&self, user_id: i64, new_password: &str) -> DomainResult<bool> {
            let mut users = self.users.lock().unwrap();
            let Some(slot) = users.iter_mut().find(|u| u.id == user_id) else {
                return Err(DomainError::NotFound {
                    entity: "User",
                    field: "id",
                    value: user_id.to_string(),
                });
            };
            slot.password = new_password.to_string();
            Ok(true)
        }

        async fn delete(&self, id: i64) -> DomainResult<bool> {
            let mut users = self.users.lock().unwrap();
            let before = users.len();
            users.retain(|u| u.id != id);
            if users.len() == before {
                return Err(DomainError::NotFound {
                    entity: "User",
                    field: "id",
                    value: id.to_string(),
                });
            }
            Ok(true)
        }
    }

    #[derive(Default)]
    struct FakeRoleRepo {
        all: Vec<Role>,
        granted: Mutex<Vec<(i64, i64)>>,
        added: Mutex<Vec<i64>>,
        removed: Mutex<Vec<i64>>,
    }

    impl FakeRoleRepo {
        fn with_roles(all: Vec<Role>, granted: Vec<(i64, i64)>) -> Self {
            Self {
                all,
                granted: Mutex::new(granted),
                added: Mutex::new(Vec::new()),
                removed: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RoleRepositoryInterface for FakeRoleRepo {
        async fn find_all(&self) -> DomainResult<Vec<Role>> {
            Ok(self.all.clone())
        }

        async fn get_roles_by_user_id(&self, user_id: i64) -> DomainResult<Vec<Role>> {
            let granted = self.granted.lock().unwrap();
            Ok(self
                .all
                .iter()
                .filter(|r| granted.contains(&(user_id, r.id)))
                .cloned()
                .collect())
        }

        async fn add_role_to_user(&self, user_id: i64, role_id: i64) -> DomainResult<bool> {
            self.added.lock().unwrap().push(role_id);
            self.granted.lock().unwrap().push((user_id, role_id));
            Ok(true)
        }

        async fn remove_role_from_user(&self, user_id: i64, role_id: i64) -> DomainResult<bool> {
            self.removed.lock().unwrap().push(role_id);
            self.granted
                .lock()
                .unwrap()
                .retain(|&pair| pair != (user_id, role_id));
            Ok(true)
        }
    }

    #[derive(Default)]
    struct FakeUserOrgRepo {
        links: HashMap<i64, i64>,
    }

    #[async_trait]
    impl UserOrganizationRepositoryInterface for FakeUserOrgRepo {
        async fn find_user_id_by_id(&self, users_organizations_id: i64) -> DomainResult<i64> {
            self.links
                .get(&users_organizations_id)
                .copied()
                .ok_or(DomainError::NotFound {
                    entity: "UserOrganization",
                    field: "id",
                    value: users_organizations_id.to_string(),
                })
        }
    }

    struct FakeProvider {
        users: FakeUserRepo,
        roles: FakeRoleRepo,
        user_organizations: FakeUserOrgRepo,
    }

    impl FakeProvider {
        fn with_users(users: Vec<User>) -> Self {
            Self {
                users: FakeUserRepo::with_users(users),
                roles: FakeRoleRepo::default(),
                user_organizations: FakeUserOrgRepo::default(),
            }
        }
    }

    impl RepositoryProvider for FakeProvider {
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

    fn service(provider: Arc<FakeProvider>) -> UserService {
        UserService::new(provider)
    }

    #[tokio::test]
    async fn create_forces_active_flag() {
        let provider = Arc::new(FakeProvider::with_users(Vec::new()));
        let svc = service(provider.clone());

        let dto = UserDto {
            name: "User".to_string(),
            surname: "Test".to_string(),
            email: "example@gmail.com".to_string(),
            password: Some("hash".to_string()),
            active: Some(false),
            ..Default::default()
        };

        let created = svc.create(dto).await.unwrap();

        assert_eq!(created.active, Some(true));
        assert!(provider.users.stored(created.id.unwrap()).unwrap().active);
    }

    #[tokio::test]
    async fn update_preserves_stored_activity() {
        let provider = Arc::new(FakeProvider::with_users(vec![sample_user(1, false)]));
        let svc = service(provider.clone());

        let dto = UserDto {
            id: Some(1),
            name: "Renamed".to_string(),
            surname: "Test".to_string(),
            email: "user1@example.com".to_string(),
            active: Some(true),
            ..Default::default()
        };

        let updated = svc.update(dto).await.unwrap();

        assert_eq!(updated.active, Some(false));
        let stored = provider.users.stored(1).unwrap();
        assert!(!stored.active);
        assert_eq!(stored.name, "Renamed");
    }

    #[tokio::test]
    async fn update_keeps_stored_password_when_none_supplied() {
        let provider = Arc::new(FakeProvider::with_users(vec![sample_user(1, true)]));
        let svc = service(provider.clone());

        let dto = UserDto {
            id: Some(1),
            name: "User".to_string(),
            surname: "Test".to_string(),
            email: "user1@example.com".to_string(),
            ..Default::default()
        };

        svc.update(dto).await.unwrap();

        let stored = provider.users.stored(1).unwrap();
        assert_eq!(stored.password, "stored-hash");
    }

    #[tokio::test]
    async fn find_all_computes_page_ranges() {
        let provider = Arc::new(FakeProvider::with_users(Vec::new()));
        let svc = service(provider.clone());

        svc.find_all(1).await.unwrap();
        svc.find_all(2).await.unwrap();

        let calls = provider.users.find_all_calls.lock().unwrap().clone();
        assert_eq!(calls, vec![(0, 10), (10, 20)]);
    }

    #[tokio::test]
    async fn find_all_rejects_non_positive_page() {
        let provider = Arc::new(FakeProvider::with_users(Vec::new()));
        let svc = service(provider.clone());

        let err = svc.find_all(0).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = svc.find_all(-3).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        assert!(provider.users.find_all_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn activate_is_idempotent() {
        let provider = Arc::new(FakeProvider::with_users(vec![sample_user(1, false)]));
        let svc = service(provider.clone());

        assert!(svc.activate(1).await.unwrap());
        assert!(provider.users.stored(1).unwrap().active);

        // Second call on an already-active user still succeeds
        assert!(svc.activate(1).await.unwrap());
        assert!(provider.users.stored(1).unwrap().active);
    }

    #[tokio::test]
    async fn set_roles_issues_minimal_grant_and_revoke_calls() {
        let all = vec![
            Role { id: 1, name: "ADMIN".to_string() },
            Role { id: 2, name: "SUPERVISOR".to_string() },
            Role { id: 3, name: "USER".to_string() },
        ];
        let provider = Arc::new(FakeProvider {
            users: FakeUserRepo::default(),
            roles: FakeRoleRepo::with_roles(all, vec![(7, 1), (7, 2)]),
            user_organizations: FakeUserOrgRepo::default(),
        });
        let svc = service(provider.clone());

        // Desired {1, 3, 4}: 3 must be granted, 2 revoked, 4 does not exist
        assert!(svc.set_roles(7, &[1, 3, 4]).await.unwrap());

        assert_eq!(*provider.roles.added.lock().unwrap(), vec![3]);
        assert_eq!(*provider.roles.removed.lock().unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn set_roles_is_a_no_op_when_already_in_sync() {
        let all = vec![
            Role { id: 1, name: "ADMIN".to_string() },
            Role { id: 2, name: "SUPERVISOR".to_string() },
        ];
        let provider = Arc::new(FakeProvider {
            users: FakeUserRepo::default(),
            roles: FakeRoleRepo::with_roles(all, vec![(7, 1), (7, 2)]),
            user_organizations: FakeUserOrgRepo::default(),
        });
        let svc = service(provider.clone());

        assert!(svc.set_roles(7, &[1, 2]).await.unwrap());

        assert!(provider.roles.added.lock().unwrap().is_empty());
        assert!(provider.roles.removed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn load_user_by_username_attaches_authorities() {
        let all = vec![Role { id: 1, name: "ADMIN".to_string() }];
        let provider = Arc::new(FakeProvider {
            users: FakeUserRepo::with_users(vec![sample_user(1, true)]),
            roles: FakeRoleRepo::with_roles(all, vec![(1, 1)]),
            user_organizations: FakeUserOrgRepo::default(),
        });
        let svc = service(provider.clone());

        let user = svc.load_user_by_username("user1@example.com").await.unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.authorities.len(), 1);
        assert_eq!(user.authorities[0].name, "ADMIN");
    }

    #[tokio::test]
    async fn load_user_by_username_signals_unknown_email() {
        let provider = Arc::new(FakeProvider::with_users(Vec::new()));
        let svc = service(provider.clone());

        let err = svc.load_user_by_username("none@x.com").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn find_by_users_organizations_id_chains_both_lookups() {
        let mut links = HashMap::new();
        links.insert(42, 1);
        let provider = Arc::new(FakeProvider {
            users: FakeUserRepo::with_users(vec![sample_user(1, true)]),
            roles: FakeRoleRepo::default(),
            user_organizations: FakeUserOrgRepo { links },
        });
        let svc = service(provider.clone());

        let dto = svc.find_by_users_organizations_id(42).await.unwrap();
        assert_eq!(dto.id, Some(1));

        let err = svc.find_by_users_organizations_id(99).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn get_roles_maps_to_transport_shape() {
        let all = vec![
            Role { id: 1, name: "ADMIN".to_string() },
            Role { id: 2, name: "SUPERVISOR".to_string() },
        ];
        let provider = Arc::new(FakeProvider {
            users: FakeUserRepo::default(),
            roles: FakeRoleRepo::with_roles(all, vec![(1, 1), (1, 2)]),
            user_organizations: FakeUserOrgRepo::default(),
        });
        let svc = service(provider.clone());

        let roles = svc.get_roles(1).await.unwrap();
        assert_eq!(
            roles,
            vec![
                RoleDto { id: 1, name: "ADMIN".to_string() },
                RoleDto { id: 2, name: "SUPERVISOR".to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn responses_never_carry_the_credential() {
        let provider = Arc::new(FakeProvider::with_users(vec![sample_user(1, true)]));
        let svc = service(provider.clone());

        let dto = svc.find_by_id(1).await.unwrap();
        assert!(dto.password.is_none());
    }
}
