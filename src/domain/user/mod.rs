//! User aggregate
//!
//! Contains the User domain model and its data-access contract.

pub mod model;
pub mod repository;

pub use model::User;
pub use repository::UserRepositoryInterface;
