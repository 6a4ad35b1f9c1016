//! API Handlers

pub mod auth;
pub mod health;
pub mod users;

pub use auth::*;
pub use health::*;
pub use users::UserHandlerState;
