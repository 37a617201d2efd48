use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::ValidJson;
use crate::auth::{self, AuthUser, TokenKeys};
use crate::db::DbPool;
use crate::dto::{AuthResponse, LoginDto, SignupDto, UpdateProfileDto, UserView};
use crate::errors::ApiError;
use crate::models::User;
use crate::repo;

fn issue_token(keys: &TokenKeys, user: &User) -> Result<String, ApiError> {
    keys.issue(&user.get_id(), user.get_role())
        .map_err(|e| ApiError::Internal(e.into()))
}

/// Handler for registering a new user
///
/// This function handles POST requests to `/api/auth/signup`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `keys` - The token signing keys
/// * `payload` - Email, password, name and role of the new user
///
/// ### Returns
///
/// `201 Created` with the user and a bearer token
#[instrument(skip(pool, keys, payload), fields(email = %payload.email, role = %payload.role))]
pub async fn signup_handler(
    State(pool): State<Arc<DbPool>>,
    State(keys): State<TokenKeys>,
    ValidJson(payload): ValidJson<SignupDto>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    info!("Signing up new user");

    let password_hash = auth::hash_password(&payload.password)?;
    let user = repo::create_user(&pool, payload.email, password_hash, payload.name, payload.role)?;
    let token = issue_token(&keys, &user)?;

    info!("Created user {}", user.get_id());
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserView::from(&user),
            token,
        }),
    ))
}

/// Handler for logging in
///
/// This function handles POST requests to `/api/auth/login`. An unknown
/// email and a wrong password give the same answer.
#[instrument(skip(pool, keys, payload), fields(email = %payload.email))]
pub async fn login_handler(
    State(pool): State<Arc<DbPool>>,
    State(keys): State<TokenKeys>,
    ValidJson(payload): ValidJson<LoginDto>,
) -> Result<Json<AuthResponse>, ApiError> {
    let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());

    let user = repo::find_user_by_email(&pool, &payload.email)?.ok_or_else(invalid)?;
    if !auth::verify_password(user.get_password_hash(), &payload.password)? {
        debug!("Wrong password for {}", user.get_id());
        return Err(invalid());
    }

    let token = issue_token(&keys, &user)?;
    info!("User {} logged in", user.get_id());
    Ok(Json(AuthResponse {
        user: UserView::identity(&user),
        token,
    }))
}

/// Handler for `GET /api/auth/me`
#[instrument(skip(pool, caller), fields(user_id = %caller.user_id))]
pub async fn get_profile_handler(
    State(pool): State<Arc<DbPool>>,
    caller: AuthUser,
) -> Result<Json<UserView>, ApiError> {
    let user = repo::get_user(&pool, &caller.user_id)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(Json(UserView::from(&user)))
}

/// Handler for `PATCH /api/auth/me`
///
/// Updates the caller's name and/or email. Taking an email that belongs to
/// someone else is rejected with `User already exists`.
#[instrument(skip(pool, caller, payload), fields(user_id = %caller.user_id))]
pub async fn update_profile_handler(
    State(pool): State<Arc<DbPool>>,
    caller: AuthUser,
    ValidJson(payload): ValidJson<UpdateProfileDto>,
) -> Result<Json<UserView>, ApiError> {
    let user = repo::update_profile(&pool, &caller.user_id, payload.name, payload.email)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!("Updated profile of {}", user.get_id());
    Ok(Json(UserView::from(&user)))
}
