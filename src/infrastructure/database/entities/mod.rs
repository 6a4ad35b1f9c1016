//! Database entities

pub mod comment;
pub mod role;
pub mod user;
pub mod user_organization;
pub mod user_role;
