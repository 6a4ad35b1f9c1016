//! Application services

pub mod user_service;

pub use user_service::{UserService, PAGINATION_PAGE_SIZE};
