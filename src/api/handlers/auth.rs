//! Authentication API handlers

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::application::dto::UserDto;
use crate::application::services::UserService;
use crate::auth::{create_token, verify_password, AuthenticatedUser, JwtConfig};
use crate::domain::DomainError;

/// State for authentication handlers
#[derive(Clone)]
pub struct AuthHandlerState {
    pub service: Arc<UserService>,
    pub jwt_config: JwtConfig,
}

/// Login payload. The username of an account is its email.
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "email": "admin@example.com",
    "password": "secret123"
}))]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response carrying the bearer token
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// JWT access token; send as `Authorization: Bearer <token>`
    pub token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    /// The authenticated user, authorities included
    pub user: UserDto,
}

/// Authenticate a user
///
/// Verifies the password against the stored hash and issues a JWT whose
/// claims carry the user's authorities. Disabled accounts are rejected.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated, token issued", body = LoginResponse),
        (status = 401, description = "Unknown email, wrong password or disabled account")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    OriginalUri(uri): OriginalUri,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = match state.service.load_user_by_username(&request.email).await {
        Ok(user) => user,
        // Unknown emails look exactly like wrong passwords
        Err(DomainError::NotFound { .. }) => {
            return Err(ApiError::new(
                StatusCode::UNAUTHORIZED,
                &uri,
                "Invalid credentials",
            ));
        }
        Err(e) => return Err(ApiError::from_domain(&uri, e)),
    };

    if !user.active {
        return Err(ApiError::new(
            StatusCode::UNAUTHORIZED,
            &uri,
            "Account is disabled",
        ));
    }

    let password_valid = verify_password(&request.password, &user.password).unwrap_or(false);
    if !password_valid {
        return Err(ApiError::new(
            StatusCode::UNAUTHORIZED,
            &uri,
            "Invalid credentials",
        ));
    }

    let token = create_token(&user, &state.jwt_config)
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, &uri, e.to_string()))?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_config.expiration_hours * 3600,
        user: UserDto::from(user),
    }))
}

/// Return the user behind the presented token
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    OriginalUri(uri): OriginalUri,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserDto>, ApiError> {
    state
        .service
        .find_by_id(user.user_id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_domain(&uri, e))
}
