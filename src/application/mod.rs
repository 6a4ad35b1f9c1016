pub mod dto;
pub mod services;

pub use dto::{RoleDto, UserDto};
pub use services::UserService;
