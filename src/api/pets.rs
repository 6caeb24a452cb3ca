//! Pet listing endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::config::ListingConfig;
use crate::db::{CreatePetRequest, Pet, PetPatch, PetResponse, User};
use crate::engine::filter::{Page, PetFilter};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::extract::{ApiJson, ApiPath};
use super::validation::{
    validate_age, validate_images, validate_optional_text, validate_price, validate_required_text,
};

/// Raw listing query parameters. Everything arrives as text so that a bad
/// value is reported per field instead of rejecting the whole query.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPetsQuery {
    #[serde(rename = "type")]
    pub species: Option<String>,
    pub breed: Option<String>,
    pub min_age: Option<String>,
    pub max_age: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub location: Option<String>,
    pub seller_id: Option<String>,
    pub is_featured: Option<String>,
    pub listing_type: Option<String>,
    pub status: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Empty parameters count as absent
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_field<T: FromStr>(
    errors: &mut ValidationErrorBuilder,
    field: &str,
    value: Option<String>,
    expected: &str,
) -> Option<T> {
    let raw = present(value)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            errors.add(field, format!("{} must be {}", field, expected));
            None
        }
    }
}

fn parse_price(errors: &mut ValidationErrorBuilder, field: &str, value: Option<String>) -> Option<f64> {
    let price = parse_field::<f64>(errors, field, value, "a number")?;
    if price.is_finite() {
        Some(price)
    } else {
        errors.add(field, format!("{} must be a number", field));
        None
    }
}

impl ListPetsQuery {
    pub fn into_filter(self, listing: &ListingConfig) -> Result<(PetFilter, Page), ApiError> {
        let mut errors = ValidationErrorBuilder::new();

        let min_age = parse_field(&mut errors, "minAge", self.min_age, "a whole number");
        let max_age = parse_field(&mut errors, "maxAge", self.max_age, "a whole number");
        let min_price = parse_price(&mut errors, "minPrice", self.min_price);
        let max_price = parse_price(&mut errors, "maxPrice", self.max_price);
        let seller_id = parse_field(&mut errors, "sellerId", self.seller_id, "a whole number");
        let is_featured = parse_field(&mut errors, "isFeatured", self.is_featured, "true or false");
        let listing_type = parse_field(
            &mut errors,
            "listingType",
            self.listing_type,
            "one of sale, adoption, rehome",
        );
        let status = parse_field(
            &mut errors,
            "status",
            self.status,
            "one of available, pending, sold",
        );
        let limit: Option<i64> = parse_field(&mut errors, "limit", self.limit, "a whole number");
        let offset: Option<i64> = parse_field(&mut errors, "offset", self.offset, "a whole number");

        errors.finish()?;

        let filter = PetFilter {
            species: present(self.species),
            breed: present(self.breed),
            min_age,
            max_age,
            min_price,
            max_price,
            location: present(self.location),
            seller_id,
            is_featured,
            listing_type,
            status,
        };

        let default_limit = i64::try_from(listing.default_page_size).unwrap_or(i64::MAX);
        let page = Page::new(limit.unwrap_or(default_limit), offset.unwrap_or(0))
            .capped(listing.max_page_size);

        Ok((filter, page))
    }
}

/// Attach the caller's favorite flag to each pet
fn to_responses(pets: Vec<Pet>, favorites: Option<&HashSet<i64>>) -> Vec<PetResponse> {
    pets.into_iter()
        .map(|pet| {
            let is_favorite = favorites.map(|ids| ids.contains(&pet.id));
            PetResponse { pet, is_favorite }
        })
        .collect()
}

fn validate_create_request(req: &CreatePetRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    errors.check("name", validate_required_text(&req.name, "Name", 100));
    errors.check("type", validate_required_text(&req.species, "Type", 50));
    errors.check("breed", validate_optional_text(&req.breed, "Breed", 100));
    errors.check("age", validate_age(req.age));
    errors.check("price", validate_price(req.price));
    errors.check("description", validate_optional_text(&req.description, "Description", 5000));
    errors.check("location", validate_optional_text(&req.location, "Location", 200));
    errors.check("images", validate_images(&req.images));

    errors.finish()
}

fn validate_update_request(req: &PetPatch) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Some(ref name) = req.name {
        errors.check("name", validate_required_text(name, "Name", 100));
    }
    if let Some(ref species) = req.species {
        errors.check("type", validate_required_text(species, "Type", 50));
    }
    errors.check("breed", validate_optional_text(&req.breed, "Breed", 100));
    errors.check("age", validate_age(req.age));
    errors.check("price", validate_price(req.price));
    errors.check("description", validate_optional_text(&req.description, "Description", 5000));
    errors.check("location", validate_optional_text(&req.location, "Location", 200));
    if let Some(ref images) = req.images {
        errors.check("images", validate_images(images));
    }

    errors.finish()
}

/// Load a pet and make sure the caller is its seller
async fn owned_pet(state: &AppState, user: &User, id: i64, action: &str) -> Result<Pet, ApiError> {
    let pet = state
        .store
        .get_pet(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pet not found"))?;

    if pet.seller_id != user.id {
        return Err(ApiError::forbidden(format!(
            "You don't have permission to {} this pet",
            action
        )));
    }

    Ok(pet)
}

/// List pets matching the query, newest first
///
/// GET /api/pets
pub async fn list_pets(
    State(state): State<Arc<AppState>>,
    user: Option<User>,
    Query(query): Query<ListPetsQuery>,
) -> Result<Json<Vec<PetResponse>>, ApiError> {
    let (filter, page) = query.into_filter(&state.config.listing)?;
    let pets = state.store.list_pets(&filter, page).await?;

    let favorites = match &user {
        Some(u) => Some(state.store.favorite_pet_ids(u.id).await?),
        None => None,
    };

    Ok(Json(to_responses(pets, favorites.as_ref())))
}

/// Get a single pet
///
/// GET /api/pets/:id
pub async fn get_pet(
    State(state): State<Arc<AppState>>,
    user: Option<User>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<PetResponse>, ApiError> {
    let pet = state
        .store
        .get_pet(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pet not found"))?;

    let is_favorite = match &user {
        Some(u) => Some(state.store.is_favorite(u.id, pet.id).await?),
        None => None,
    };

    Ok(Json(PetResponse { pet, is_favorite }))
}

/// Create a listing owned by the caller
///
/// POST /api/pets
pub async fn create_pet(
    State(state): State<Arc<AppState>>,
    user: User,
    ApiJson(req): ApiJson<CreatePetRequest>,
) -> Result<(StatusCode, Json<Pet>), ApiError> {
    validate_create_request(&req)?;

    let pet = state.store.create_pet(req.into_new_pet(user.id)).await?;

    info!(pet_id = pet.id, seller_id = user.id, name = %pet.name, "Pet listed");
    Ok((StatusCode::CREATED, Json(pet)))
}

/// Update a listing; only its seller may do this
///
/// PUT /api/pets/:id
pub async fn update_pet(
    State(state): State<Arc<AppState>>,
    user: User,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<PetPatch>,
) -> Result<Json<Pet>, ApiError> {
    validate_update_request(&patch)?;
    owned_pet(&state, &user, id, "update").await?;

    let pet = state
        .store
        .update_pet(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Pet not found"))?;

    info!(pet_id = pet.id, seller_id = user.id, "Pet updated");
    Ok(Json(pet))
}

/// Delete a listing; only its seller may do this
///
/// DELETE /api/pets/:id
pub async fn delete_pet(
    State(state): State<Arc<AppState>>,
    user: User,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    owned_pet(&state, &user, id, "delete").await?;

    if !state.store.delete_pet(id).await? {
        return Err(ApiError::not_found("Pet not found"));
    }

    info!(pet_id = id, seller_id = user.id, "Pet deleted");
    Ok(Json(json!({ "message": "Pet deleted successfully" })))
}
