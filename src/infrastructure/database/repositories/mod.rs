//! SeaORM-backed repository implementations

pub mod repository_provider;
pub mod role_repository;
pub mod user_organization_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
pub use role_repository::SeaOrmRoleRepository;
pub use user_organization_repository::SeaOrmUserOrganizationRepository;
pub use user_repository::SeaOrmUserRepository;
