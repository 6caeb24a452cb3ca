//! User profile endpoints.

use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::info;

use crate::db::{User, UserPatch, UserResponse};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::extract::{ApiJson, ApiPath};
use super::validation::{validate_email, validate_image_url, validate_optional_text, validate_required_text};

fn validate_patch(patch: &UserPatch) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Some(ref name) = patch.name {
        errors.check("name", validate_required_text(name, "Name", 100));
    }
    if let Some(ref email) = patch.email {
        errors.check("email", validate_email(email));
    }
    errors.check("bio", validate_optional_text(&patch.bio, "Bio", 1000));
    errors.check("location", validate_optional_text(&patch.location, "Location", 200));
    errors.check("profileImage", validate_image_url(&patch.profile_image));

    errors.finish()
}

/// Public profile of a user
///
/// GET /api/users/:id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .store
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(user)))
}

/// Update the current user's profile
///
/// PUT /api/users/me
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    user: User,
    ApiJson(patch): ApiJson<UserPatch>,
) -> Result<Json<UserResponse>, ApiError> {
    validate_patch(&patch)?;

    let updated = state
        .store
        .update_user(user.id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    info!(user_id = updated.id, "Profile updated");
    Ok(Json(UserResponse::from(updated)))
}
