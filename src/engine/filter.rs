//! Pet listing query engine.
//!
//! A [`PetFilter`] is a conjunction of optional predicates. Listing applies
//! the filter, sorts newest first and then slices out one [`Page`].

use std::cmp::Ordering;

use crate::db::{ListingType, Pet, PetStatus};

/// Optional predicates over pets, combined with logical AND.
/// An empty filter matches every pet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetFilter {
    /// Exact species match, case-insensitive
    pub species: Option<String>,
    /// Breed substring, case-insensitive
    pub breed: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Location substring, case-insensitive
    pub location: Option<String>,
    pub seller_id: Option<i64>,
    pub is_featured: Option<bool>,
    pub listing_type: Option<ListingType>,
    pub status: Option<PetStatus>,
}

impl PetFilter {
    pub fn matches(&self, pet: &Pet) -> bool {
        if let Some(species) = &self.species {
            if pet.species.to_lowercase() != species.to_lowercase() {
                return false;
            }
        }

        if let Some(breed) = &self.breed {
            if !contains_ignore_case(pet.breed.as_deref(), breed) {
                return false;
            }
        }

        // A bound never matches a pet with an unknown age or price.
        if let Some(min) = self.min_age {
            if !pet.age.is_some_and(|age| age >= min) {
                return false;
            }
        }
        if let Some(max) = self.max_age {
            if !pet.age.is_some_and(|age| age <= max) {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if !pet.price.is_some_and(|price| price >= min) {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if !pet.price.is_some_and(|price| price <= max) {
                return false;
            }
        }

        if let Some(location) = &self.location {
            if !contains_ignore_case(pet.location.as_deref(), location) {
                return false;
            }
        }

        if self.seller_id.is_some_and(|id| id != pet.seller_id) {
            return false;
        }
        if self.is_featured.is_some_and(|f| f != pet.is_featured) {
            return false;
        }
        if self.listing_type.is_some_and(|t| t != pet.listing_type) {
            return false;
        }
        if self.status.is_some_and(|s| s != pet.status) {
            return false;
        }

        true
    }
}

fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

/// Offset/limit window over a sorted listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    pub const DEFAULT_LIMIT: usize = 20;

    /// Build a page from raw signed values; negatives clamp to zero.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: usize::try_from(limit.max(0)).unwrap_or(usize::MAX),
            offset: usize::try_from(offset.max(0)).unwrap_or(usize::MAX),
        }
    }

    pub fn capped(self, max_limit: usize) -> Self {
        Self {
            limit: self.limit.min(max_limit),
            offset: self.offset,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Newest first. Equal timestamps fall back to id, higher id first.
pub fn newest_first(a: &Pet, b: &Pet) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Filter, sort and paginate a pet collection.
pub fn apply<'a, I>(pets: I, filter: &PetFilter, page: Page) -> Vec<Pet>
where
    I: IntoIterator<Item = &'a Pet>,
{
    let mut matched: Vec<&Pet> = pets.into_iter().filter(|p| filter.matches(p)).collect();
    matched.sort_by(|a, b| newest_first(a, b));

    matched
        .into_iter()
        .skip(page.offset)
        .take(page.limit)
        .cloned()
        .collect()
}
