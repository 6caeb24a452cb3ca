//! Favorites endpoints for the current user.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

use crate::db::{AddFavoriteRequest, Favorite, FavoriteStatus, PetResponse, User};
use crate::AppState;

use super::error::ApiError;
use super::extract::{ApiJson, ApiPath};

/// Pets the current user has favorited. Favorites whose pet has since been
/// deleted are skipped.
///
/// GET /api/favorites
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    user: User,
) -> Result<Json<Vec<PetResponse>>, ApiError> {
    let pets = state.store.favorite_pets(user.id).await?;

    Ok(Json(
        pets.into_iter()
            .map(|pet| PetResponse {
                pet,
                is_favorite: Some(true),
            })
            .collect(),
    ))
}

/// Favorite a pet. Repeating the call returns the existing record.
///
/// POST /api/favorites
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    user: User,
    ApiJson(req): ApiJson<AddFavoriteRequest>,
) -> Result<(StatusCode, Json<Favorite>), ApiError> {
    let favorite = state.store.add_favorite(user.id, req.pet_id).await?;

    info!(user_id = user.id, pet_id = req.pet_id, favorite_id = favorite.id, "Pet favorited");
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// Remove a pet from the current user's favorites
///
/// DELETE /api/favorites/:pet_id
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    user: User,
    ApiPath(pet_id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    if !state.store.remove_favorite(user.id, pet_id).await? {
        return Err(ApiError::not_found("Favorite not found"));
    }

    debug!(user_id = user.id, pet_id, "Favorite removed");
    Ok(Json(json!({ "message": "Removed from favorites" })))
}

/// Whether the current user has favorited a pet
///
/// GET /api/favorites/check/:pet_id
pub async fn check_favorite(
    State(state): State<Arc<AppState>>,
    user: User,
    ApiPath(pet_id): ApiPath<i64>,
) -> Result<Json<FavoriteStatus>, ApiError> {
    let is_favorite = state.store.is_favorite(user.id, pet_id).await?;
    Ok(Json(FavoriteStatus { is_favorite }))
}
