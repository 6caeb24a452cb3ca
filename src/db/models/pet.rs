//! Pet listing models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{ListingType, PetStatus};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: i64,
    pub name: String,
    /// Species, e.g. "dog" or "cat"
    #[serde(rename = "type")]
    pub species: String,
    pub breed: Option<String>,
    /// Age in months
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub size: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    pub seller_id: i64,
    pub status: PetStatus,
    pub location: Option<String>,
    pub is_featured: bool,
    pub listing_type: ListingType,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a pet; the store assigns id and timestamp
#[derive(Debug, Clone, Default)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub size: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub images: Vec<String>,
    pub seller_id: i64,
    pub location: Option<String>,
    pub is_featured: bool,
    pub listing_type: ListingType,
}

/// Partial pet update. `None` leaves the field untouched; the seller
/// cannot be changed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub species: Option<String>,
    pub breed: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub size: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub images: Option<Vec<String>>,
    pub status: Option<PetStatus>,
    pub location: Option<String>,
    pub listing_type: Option<ListingType>,
}

impl PetPatch {
    pub fn apply(self, pet: &mut Pet) {
        if let Some(name) = self.name {
            pet.name = name;
        }
        if let Some(species) = self.species {
            pet.species = species;
        }
        if self.breed.is_some() {
            pet.breed = self.breed;
        }
        if self.age.is_some() {
            pet.age = self.age;
        }
        if self.gender.is_some() {
            pet.gender = self.gender;
        }
        if self.size.is_some() {
            pet.size = self.size;
        }
        if self.description.is_some() {
            pet.description = self.description;
        }
        if self.price.is_some() {
            pet.price = self.price;
        }
        if let Some(images) = self.images {
            pet.images = images;
        }
        if let Some(status) = self.status {
            pet.status = status;
        }
        if self.location.is_some() {
            pet.location = self.location;
        }
        if let Some(listing_type) = self.listing_type {
            pet.listing_type = listing_type;
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub species: String,
    pub breed: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub size: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub listing_type: ListingType,
}

impl CreatePetRequest {
    pub fn into_new_pet(self, seller_id: i64) -> NewPet {
        NewPet {
            name: self.name,
            species: self.species,
            breed: self.breed,
            age: self.age,
            gender: self.gender,
            size: self.size,
            description: self.description,
            price: self.price,
            images: self.images,
            seller_id,
            location: self.location,
            is_featured: false,
            listing_type: self.listing_type,
        }
    }
}

/// A pet as returned to clients. Authenticated callers also get whether
/// the pet is in their favorites.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetResponse {
    #[serde(flatten)]
    pub pet: Pet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pet() -> Pet {
        Pet {
            id: 1,
            name: "Max".to_string(),
            species: "dog".to_string(),
            breed: Some("Golden Retriever".to_string()),
            age: Some(8),
            gender: None,
            size: None,
            description: None,
            price: Some(1200.0),
            images: vec![],
            seller_id: 2,
            status: PetStatus::Available,
            location: Some("Portland, OR".to_string()),
            is_featured: false,
            listing_type: ListingType::Sale,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let mut pet = sample_pet();
        PetPatch {
            price: Some(900.0),
            status: Some(PetStatus::Pending),
            ..Default::default()
        }
        .apply(&mut pet);

        assert_eq!(pet.price, Some(900.0));
        assert_eq!(pet.status, PetStatus::Pending);
        assert_eq!(pet.name, "Max");
        assert_eq!(pet.breed.as_deref(), Some("Golden Retriever"));
        assert_eq!(pet.seller_id, 2);
    }

    #[test]
    fn test_response_flattens_pet_and_omits_anonymous_flag() {
        let json = serde_json::to_value(PetResponse {
            pet: sample_pet(),
            is_favorite: None,
        })
        .unwrap();
        assert_eq!(json["type"], "dog");
        assert_eq!(json["sellerId"], 2);
        assert_eq!(json["listingType"], "sale");
        assert!(json.get("isFavorite").is_none());

        let json = serde_json::to_value(PetResponse {
            pet: sample_pet(),
            is_favorite: Some(true),
        })
        .unwrap();
        assert_eq!(json["isFavorite"], true);
    }
}
