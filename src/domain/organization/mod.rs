//! User-organization link

pub mod repository;

pub use repository::UserOrganizationRepositoryInterface;
