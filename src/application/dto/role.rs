//! Role transport DTO and mapping

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Role;

/// Wire-level representation of a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleDto {
    pub id: i64,
    pub name: String,
}

impl From<Role> for RoleDto {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
        }
    }
}

impl From<RoleDto> for Role {
    fn from(dto: RoleDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
        }
    }
}
