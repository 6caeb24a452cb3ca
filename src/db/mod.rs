mod memory;
mod models;
mod seeders;

pub use memory::MemoryStore;
pub use models::*;
pub use seeders::seed_demo_data;

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

use crate::engine::filter::{Page, PetFilter};

/// Shared handle to the entity store
pub type DbPool = Arc<dyn Store>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Repository over users, pets, favorites and messages.
///
/// Each call is atomic with respect to every other call on the same store.
#[async_trait]
pub trait Store: Send + Sync {
    // Users
    async fn get_user(&self, id: i64) -> StoreResult<Option<User>>;
    /// Case-insensitive lookup
    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    /// Fails with `Conflict` if the username or email is already taken
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
    async fn update_user(&self, id: i64, patch: UserPatch) -> StoreResult<Option<User>>;

    // Pets
    async fn get_pet(&self, id: i64) -> StoreResult<Option<Pet>>;
    async fn list_pets(&self, filter: &PetFilter, page: Page) -> StoreResult<Vec<Pet>>;
    async fn create_pet(&self, pet: NewPet) -> StoreResult<Pet>;
    async fn update_pet(&self, id: i64, patch: PetPatch) -> StoreResult<Option<Pet>>;
    /// Flip a pet to `sold` and record the buyer's notification to the
    /// seller, both under one lock. Fails with `NotFound` for an unknown pet
    /// or buyer and with `Conflict` if the buyer is the seller or the pet is
    /// already sold; nothing is written on failure.
    async fn sell_pet(&self, pet_id: i64, buyer_id: i64) -> StoreResult<(Pet, Message)>;
    async fn delete_pet(&self, id: i64) -> StoreResult<bool>;

    // Favorites
    /// Idempotent: returns the existing record for the pair if there is one
    async fn add_favorite(&self, user_id: i64, pet_id: i64) -> StoreResult<Favorite>;
    async fn remove_favorite(&self, user_id: i64, pet_id: i64) -> StoreResult<bool>;
    async fn is_favorite(&self, user_id: i64, pet_id: i64) -> StoreResult<bool>;
    /// Favorited pets that still exist
    async fn favorite_pets(&self, user_id: i64) -> StoreResult<Vec<Pet>>;
    async fn favorite_pet_ids(&self, user_id: i64) -> StoreResult<HashSet<i64>>;

    // Messages
    /// Every message sent or received by the user, newest first
    async fn messages_for_user(&self, user_id: i64) -> StoreResult<Vec<Message>>;
    /// Messages exchanged between exactly these two users, oldest first
    async fn conversation(&self, user_a: i64, user_b: i64) -> StoreResult<Vec<Message>>;
    async fn create_message(&self, message: NewMessage) -> StoreResult<Message>;
    /// Mark everything from `sender_id` to `receiver_id` as read.
    /// Returns whether any message changed.
    async fn mark_read(&self, receiver_id: i64, sender_id: i64) -> StoreResult<bool>;
    async fn unread_count(&self, user_id: i64) -> StoreResult<usize>;
}
