//! User transport DTO and mapping

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::User;

use super::role::RoleDto;

/// Wire-level representation of a user.
///
/// The same shape is accepted on create/update and rendered on reads.
/// `password` is write-only: inbound payloads may carry it, responses never
/// do. `active` supplied by a caller is advisory at best — the service
/// overrides it on both create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UserDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub surname: String,
    #[validate(email)]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Write-only credential, already hashed by the REST boundary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authorities: Vec<RoleDto>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: Some(user.id),
            name: user.name,
            surname: user.surname,
            email: user.email,
            phone_number: user.phone_number,
            password: None,
            active: Some(user.active),
            created_at: Some(user.created_at),
            updated_at: Some(user.updated_at),
            authorities: user.authorities.into_iter().map(RoleDto::from).collect(),
        }
    }
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        let now = Utc::now();
        Self {
            id: dto.id.unwrap_or_default(),
            name: dto.name,
            surname: dto.surname,
            email: dto.email,
            phone_number: dto.phone_number,
            password: dto.password.unwrap_or_default(),
            active: dto.active.unwrap_or(false),
            created_at: dto.created_at.unwrap_or(now),
            updated_at: dto.updated_at.unwrap_or(now),
            authorities: dto.authorities.into_iter().map(Into::into).collect(),
        }
    }
}
