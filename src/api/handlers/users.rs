//! User management handlers
//!
//! Thin routing layer over `UserService`: deserialize, delegate, translate
//! errors. Password material is hashed here before it enters the service.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::error::{ApiError, ErrorBody};
use crate::application::dto::{RoleDto, UserDto};
use crate::application::services::UserService;
use crate::auth::hash_password;

/// State shared by all user handlers
#[derive(Clone)]
pub struct UserHandlerState {
    pub service: Arc<UserService>,
}

/// Query parameters for the email lookup
#[derive(Debug, Deserialize, IntoParams)]
pub struct EmailQuery {
    /// Account email to look up
    pub email: String,
}

/// Password replacement payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePasswordRequest {
    /// New plaintext password; hashed before leaving this layer
    pub new_password: String,
}

fn hash_credential(uri: &axum::http::Uri, dto: &mut UserDto) -> Result<(), ApiError> {
    if let Some(password) = dto.password.take() {
        let hashed = hash_password(&password)
            .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, uri, e.to_string()))?;
        dto.password = Some(hashed);
    }
    Ok(())
}

/// Create a new user
///
/// The account always starts active, whatever the payload says.
#[utoipa::path(
    post,
    path = "/users/",
    tag = "Users",
    request_body = UserDto,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    OriginalUri(uri): OriginalUri,
    Json(mut request): Json<UserDto>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, &uri, e.to_string()))?;

    hash_credential(&uri, &mut request)?;

    let created = state
        .service
        .create(request)
        .await
        .map_err(|e| ApiError::from_domain(&uri, e))?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub async fn find_user_by_id(
    State(state): State<UserHandlerState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<Json<UserDto>, ApiError> {
    state
        .service
        .find_by_id(id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_domain(&uri, e))
}

/// Look a user up by email
#[utoipa::path(
    get,
    path = "/users/",
    tag = "Users",
    params(EmailQuery),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "No user with that email")
    )
)]
pub async fn find_user_by_email(
    State(state): State<UserHandlerState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<EmailQuery>,
) -> Result<Json<UserDto>, ApiError> {
    state
        .service
        .find_by_email(&params.email)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_domain(&uri, e))
}

/// List users page by page
///
/// Pages are 1-based and ten users long.
#[utoipa::path(
    get,
    path = "/users/all/{page_id}",
    tag = "Users",
    params(("page_id" = i64, Path, description = "1-based page number")),
    responses(
        (status = 200, description = "Requested page of users", body = [UserDto]),
        (status = 400, description = "Page id below 1")
    )
)]
pub async fn find_all_users(
    State(state): State<UserHandlerState>,
    OriginalUri(uri): OriginalUri,
    Path(page_id): Path<i64>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    state
        .service
        .find_all(page_id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_domain(&uri, e))
}

/// List the users belonging to an organization
#[utoipa::path(
    get,
    path = "/users/organization/{organization_id}",
    tag = "Users",
    params(("organization_id" = i64, Path, description = "Organization id")),
    responses((status = 200, description = "Members of the organization", body = [UserDto]))
)]
pub async fn find_users_by_organization_id(
    State(state): State<UserHandlerState>,
    OriginalUri(uri): OriginalUri,
    Path(organization_id): Path<i64>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    state
        .service
        .find_by_organization_id(organization_id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_domain(&uri, e))
}

/// List the users holding a role
#[utoipa::path(
    get,
    path = "/users/role/{role_id}",
    tag = "Users",
    params(("role_id" = i64, Path, description = "Role id")),
    responses((status = 200, description = "Users granted the role", body = [UserDto]))
)]
pub async fn find_users_by_role_id(
    State(state): State<UserHandlerState>,
    OriginalUri(uri): OriginalUri,
    Path(role_id): Path<i64>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    state
        .service
        .find_by_role_id(role_id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_domain(&uri, e))
}

/// Find the author of a comment
#[utoipa::path(
    get,
    path = "/users/comment/{comment_id}",
    tag = "Users",
    params(("comment_id" = i64, Path, description = "Comment id")),
    responses((status = 200, description = "Comment author", body = [UserDto]))
)]
pub async fn find_users_by_comment_id(
    State(state): State<UserHandlerState>,
    OriginalUri(uri): OriginalUri,
    Path(comment_id): Path<i64>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    state
        .service
        .find_user_by_comment_id(comment_id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_domain(&uri, e))
}

/// Resolve a user from an organization-membership link id
#[utoipa::path(
    get,
    path = "/users/users-organizations/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User-organization link id")),
    responses(
        (status = 200, description = "Linked user", body = UserDto),
        (status = 404, description = "Link or user not found")
    )
)]
pub async fn find_user_by_users_organizations_id(
    State(state): State<UserHandlerState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<Json<UserDto>, ApiError> {
    state
        .service
        .find_by_users_organizations_id(id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_domain(&uri, e))
}

/// Update a user
///
/// The activity flag cannot be changed here; use the activate endpoint.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UserDto,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
    Json(mut request): Json<UserDto>,
) -> Result<Json<UserDto>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, &uri, e.to_string()))?;

    // The path names the record; a mismatching body id is ignored
    request.id = Some(id);

    hash_credential(&uri, &mut request)?;

    state
        .service
        .update(request)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_domain(&uri, e))
}

/// Replace a user's password
#[utoipa::path(
    put,
    path = "/users/{id}/update-password",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password replaced", body = bool),
        (status = 400, description = "Password too short"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user_password(
    State(state): State<UserHandlerState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<Json<bool>, ApiError> {
    if request.new_password.len() < 8 {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            &uri,
            "Password must be at least 8 characters",
        ));
    }

    let hashed = hash_password(&request.new_password)
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, &uri, e.to_string()))?;

    state
        .service
        .update_password(id, &hashed)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_domain(&uri, e))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = bool),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<Json<bool>, ApiError> {
    state
        .service
        .delete(id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_domain(&uri, e))
}

/// Re-enable a user account
///
/// Activating an already-active account succeeds as well.
#[utoipa::path(
    post,
    path = "/users/activate/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Account active", body = bool),
        (status = 404, description = "User not found")
    )
)]
pub async fn activate_user(
    State(state): State<UserHandlerState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<Json<bool>, ApiError> {
    state
        .service
        .activate(id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_domain(&uri, e))
}

/// List the roles granted to a user
#[utoipa::path(
    get,
    path = "/users/{id}/get-roles",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses((status = 200, description = "Granted roles", body = [RoleDto]))
)]
pub async fn get_user_roles(
    State(state): State<UserHandlerState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<Json<Vec<RoleDto>>, ApiError> {
    state
        .service
        .get_roles(id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_domain(&uri, e))
}

/// Replace a user's role set
///
/// The body is the desired set of role ids. Ids that do not name an
/// existing role are ignored.
#[utoipa::path(
    put,
    path = "/users/{id}/set-roles",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    request_body = Vec<i64>,
    responses((status = 200, description = "Role set synchronized", body = bool))
)]
pub async fn set_user_roles(
    State(state): State<UserHandlerState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
    Json(role_ids): Json<Vec<i64>>,
) -> Result<Json<bool>, ApiError> {
    state
        .service
        .set_roles(id, &role_ids)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_domain(&uri, e))
}
