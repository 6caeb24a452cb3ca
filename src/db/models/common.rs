//! Common types and utilities shared across models.

use serde::{Deserialize, Serialize};

/// Account type chosen at registration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    PetSeeker,
    Breeder,
    Shelter,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PetSeeker => write!(f, "pet_seeker"),
            Self::Breeder => write!(f, "breeder"),
            Self::Shelter => write!(f, "shelter"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pet_seeker" => Ok(Self::PetSeeker),
            "breeder" => Ok(Self::Breeder),
            "shelter" => Ok(Self::Shelter),
            _ => Err(format!("Unknown user type: {}", s)),
        }
    }
}

/// Availability of a pet listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    #[default]
    Available,
    Pending,
    Sold,
}

impl std::fmt::Display for PetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Pending => write!(f, "pending"),
            Self::Sold => write!(f, "sold"),
        }
    }
}

impl std::str::FromStr for PetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "pending" => Ok(Self::Pending),
            "sold" => Ok(Self::Sold),
            _ => Err(format!("Unknown pet status: {}", s)),
        }
    }
}

/// How a pet is being offered
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    #[default]
    Sale,
    Adoption,
    Rehome,
}

impl std::fmt::Display for ListingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sale => write!(f, "sale"),
            Self::Adoption => write!(f, "adoption"),
            Self::Rehome => write!(f, "rehome"),
        }
    }
}

impl std::str::FromStr for ListingType {
    type Err = String;

    // Exact match: listing types are compared case-sensitively when filtering.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sale" => Ok(Self::Sale),
            "adoption" => Ok(Self::Adoption),
            "rehome" => Ok(Self::Rehome),
            _ => Err(format!("Unknown listing type: {}", s)),
        }
    }
}
