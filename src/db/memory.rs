//! In-memory store backed by ordered maps behind a single lock.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};

use super::{
    Favorite, Message, NewMessage, NewPet, NewUser, Pet, PetPatch, PetStatus, Store, StoreError,
    StoreResult, User, UserPatch,
};
use crate::engine::conversations;
use crate::engine::filter::{self, Page, PetFilter};
use crate::engine::sales;

/// Monotonic id allocator, starting at 1
#[derive(Debug)]
struct IdSequence(i64);

impl Default for IdSequence {
    fn default() -> Self {
        Self(1)
    }
}

impl IdSequence {
    fn next(&mut self) -> i64 {
        let id = self.0;
        self.0 += 1;
        id
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    pets: BTreeMap<i64, Pet>,
    favorites: BTreeMap<i64, Favorite>,
    messages: BTreeMap<i64, Message>,

    user_ids: IdSequence,
    pet_ids: IdSequence,
    favorite_ids: IdSequence,
    message_ids: IdSequence,
}

impl Tables {
    fn find_user_by_username(&self, username: &str) -> Option<&User> {
        let username = username.to_lowercase();
        self.users
            .values()
            .find(|u| u.username.to_lowercase() == username)
    }

    fn find_user_by_email(&self, email: &str) -> Option<&User> {
        let email = email.to_lowercase();
        self.users.values().find(|u| u.email.to_lowercase() == email)
    }

    fn find_favorite(&self, user_id: i64, pet_id: i64) -> Option<&Favorite> {
        self.favorites
            .values()
            .find(|f| f.user_id == user_id && f.pet_id == pet_id)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.tables.read().find_user_by_username(username).cloned())
    }

    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write();

        if tables.find_user_by_username(&new.username).is_some() {
            return Err(StoreError::Conflict("Username already exists".to_string()));
        }
        if tables.find_user_by_email(&new.email).is_some() {
            return Err(StoreError::Conflict("Email already exists".to_string()));
        }

        let user = User {
            id: tables.user_ids.next(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            name: new.name,
            role: new.role,
            bio: new.bio,
            location: new.location,
            profile_image: new.profile_image,
            is_verified: new.is_verified,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: i64, patch: UserPatch) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write();

        if let Some(email) = &patch.email {
            if tables.find_user_by_email(email).is_some_and(|u| u.id != id) {
                return Err(StoreError::Conflict("Email already exists".to_string()));
            }
        }

        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply(user);
        Ok(Some(user.clone()))
    }

    async fn get_pet(&self, id: i64) -> StoreResult<Option<Pet>> {
        Ok(self.tables.read().pets.get(&id).cloned())
    }

    async fn list_pets(&self, filter: &PetFilter, page: Page) -> StoreResult<Vec<Pet>> {
        Ok(filter::apply(self.tables.read().pets.values(), filter, page))
    }

    async fn create_pet(&self, new: NewPet) -> StoreResult<Pet> {
        let mut tables = self.tables.write();
        let pet = Pet {
            id: tables.pet_ids.next(),
            name: new.name,
            species: new.species,
            breed: new.breed,
            age: new.age,
            gender: new.gender,
            size: new.size,
            description: new.description,
            price: new.price,
            images: new.images,
            seller_id: new.seller_id,
            status: PetStatus::Available,
            location: new.location,
            is_featured: new.is_featured,
            listing_type: new.listing_type,
            created_at: Utc::now(),
        };
        tables.pets.insert(pet.id, pet.clone());
        Ok(pet)
    }

    async fn update_pet(&self, id: i64, patch: PetPatch) -> StoreResult<Option<Pet>> {
        let mut tables = self.tables.write();
        let Some(pet) = tables.pets.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply(pet);
        Ok(Some(pet.clone()))
    }

    async fn sell_pet(&self, pet_id: i64, buyer_id: i64) -> StoreResult<(Pet, Message)> {
        let mut guard = self.tables.write();
        let tables = &mut *guard;

        let pet = tables
            .pets
            .get_mut(&pet_id)
            .ok_or(StoreError::NotFound("Pet"))?;
        if !tables.users.contains_key(&buyer_id) {
            return Err(StoreError::NotFound("Buyer"));
        }
        if pet.seller_id == buyer_id {
            return Err(StoreError::Conflict(
                "Sellers cannot buy their own listing".to_string(),
            ));
        }
        if pet.status == PetStatus::Sold {
            return Err(StoreError::Conflict(format!("{} has already been sold", pet.name)));
        }

        pet.status = PetStatus::Sold;
        let pet = pet.clone();

        let message = Message {
            id: tables.message_ids.next(),
            sender_id: buyer_id,
            receiver_id: pet.seller_id,
            content: sales::notification_text(&pet),
            pet_id: Some(pet.id),
            is_read: false,
            created_at: Utc::now(),
        };
        tables.messages.insert(message.id, message.clone());

        Ok((pet, message))
    }

    async fn delete_pet(&self, id: i64) -> StoreResult<bool> {
        // Favorites pointing at the pet are left in place and filtered on read.
        Ok(self.tables.write().pets.remove(&id).is_some())
    }

    async fn add_favorite(&self, user_id: i64, pet_id: i64) -> StoreResult<Favorite> {
        let mut tables = self.tables.write();

        if let Some(existing) = tables.find_favorite(user_id, pet_id) {
            return Ok(existing.clone());
        }
        if !tables.pets.contains_key(&pet_id) {
            return Err(StoreError::NotFound("Pet"));
        }

        let favorite = Favorite {
            id: tables.favorite_ids.next(),
            user_id,
            pet_id,
            created_at: Utc::now(),
        };
        tables.favorites.insert(favorite.id, favorite.clone());
        Ok(favorite)
    }

    async fn remove_favorite(&self, user_id: i64, pet_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        let Some(id) = tables.find_favorite(user_id, pet_id).map(|f| f.id) else {
            return Ok(false);
        };
        Ok(tables.favorites.remove(&id).is_some())
    }

    async fn is_favorite(&self, user_id: i64, pet_id: i64) -> StoreResult<bool> {
        Ok(self.tables.read().find_favorite(user_id, pet_id).is_some())
    }

    async fn favorite_pets(&self, user_id: i64) -> StoreResult<Vec<Pet>> {
        let tables = self.tables.read();
        Ok(tables
            .favorites
            .values()
            .filter(|f| f.user_id == user_id)
            .filter_map(|f| tables.pets.get(&f.pet_id))
            .cloned()
            .collect())
    }

    async fn favorite_pet_ids(&self, user_id: i64) -> StoreResult<HashSet<i64>> {
        Ok(self
            .tables
            .read()
            .favorites
            .values()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.pet_id)
            .collect())
    }

    async fn messages_for_user(&self, user_id: i64) -> StoreResult<Vec<Message>> {
        let tables = self.tables.read();
        let mut messages: Vec<Message> = tables
            .messages
            .values()
            .filter(|m| m.sender_id == user_id || m.receiver_id == user_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| conversations::chronological(b, a));
        Ok(messages)
    }

    async fn conversation(&self, user_a: i64, user_b: i64) -> StoreResult<Vec<Message>> {
        let tables = self.tables.read();
        let mut messages: Vec<Message> = tables
            .messages
            .values()
            .filter(|m| {
                (m.sender_id == user_a && m.receiver_id == user_b)
                    || (m.sender_id == user_b && m.receiver_id == user_a)
            })
            .cloned()
            .collect();
        messages.sort_by(conversations::chronological);
        Ok(messages)
    }

    async fn create_message(&self, new: NewMessage) -> StoreResult<Message> {
        let mut tables = self.tables.write();

        if !tables.users.contains_key(&new.receiver_id) {
            return Err(StoreError::NotFound("Receiver"));
        }
        if let Some(pet_id) = new.pet_id {
            if !tables.pets.contains_key(&pet_id) {
                return Err(StoreError::NotFound("Pet"));
            }
        }

        let message = Message {
            id: tables.message_ids.next(),
            sender_id: new.sender_id,
            receiver_id: new.receiver_id,
            content: new.content,
            pet_id: new.pet_id,
            is_read: false,
            created_at: Utc::now(),
        };
        tables.messages.insert(message.id, message.clone());
        Ok(message)
    }

    async fn mark_read(&self, receiver_id: i64, sender_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        let mut updated = false;

        for message in tables.messages.values_mut() {
            if message.receiver_id == receiver_id && message.sender_id == sender_id && !message.is_read
            {
                message.is_read = true;
                updated = true;
            }
        }

        Ok(updated)
    }

    async fn unread_count(&self, user_id: i64) -> StoreResult<usize> {
        Ok(conversations::count_unread(
            user_id,
            self.tables.read().messages.values(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ListingType, UserRole};

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: "hash".to_string(),
            name: username.to_string(),
            role: UserRole::PetSeeker,
            bio: None,
            location: None,
            profile_image: None,
            is_verified: false,
        }
    }

    fn new_pet(seller_id: i64, name: &str) -> NewPet {
        NewPet {
            name: name.to_string(),
            species: "dog".to_string(),
            seller_id,
            listing_type: ListingType::Sale,
            ..Default::default()
        }
    }

    fn message(sender_id: i64, receiver_id: i64) -> NewMessage {
        NewMessage {
            sender_id,
            receiver_id,
            content: "hello".to_string(),
            pet_id: None,
        }
    }

    #[tokio::test]
    async fn test_ids_increment_from_one() {
        let store = MemoryStore::new();
        let a = store.create_user(new_user("alice")).await.unwrap();
        let b = store.create_user(new_user("bob")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        let pet = store.create_pet(new_pet(a.id, "Max")).await.unwrap();
        assert_eq!(pet.id, 1);
        assert_eq!(pet.status, PetStatus::Available);
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email_conflict_case_insensitively() {
        let store = MemoryStore::new();
        store.create_user(new_user("alice")).await.unwrap();

        let mut dup_name = new_user("ALICE");
        dup_name.email = "other@example.com".to_string();
        assert!(matches!(
            store.create_user(dup_name).await,
            Err(StoreError::Conflict(_))
        ));

        let mut dup_email = new_user("alice2");
        dup_email.email = "Alice@Example.com".to_string();
        assert!(matches!(
            store.create_user(dup_email).await,
            Err(StoreError::Conflict(_))
        ));

        let found = store.get_user_by_username("aLiCe").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(1));
    }

    #[tokio::test]
    async fn test_update_user_rejects_taken_email() {
        let store = MemoryStore::new();
        store.create_user(new_user("alice")).await.unwrap();
        let bob = store.create_user(new_user("bob")).await.unwrap();

        let patch = UserPatch {
            email: Some("ALICE@example.com".to_string()),
            ..Default::default()
        };
        assert!(store.update_user(bob.id, patch).await.is_err());

        // Re-submitting your own email is fine
        let patch = UserPatch {
            email: Some("bob@example.com".to_string()),
            bio: Some("dog person".to_string()),
            ..Default::default()
        };
        let updated = store.update_user(bob.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.bio.as_deref(), Some("dog person"));

        assert!(store.update_user(99, UserPatch::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_favorite_is_idempotent() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("alice")).await.unwrap();
        let pet = store.create_pet(new_pet(user.id, "Max")).await.unwrap();

        let first = store.add_favorite(user.id, pet.id).await.unwrap();
        let second = store.add_favorite(user.id, pet.id).await.unwrap();
        assert_eq!(first, second);

        let pets = store.favorite_pets(user.id).await.unwrap();
        assert_eq!(pets.len(), 1);
        assert!(store.is_favorite(user.id, pet.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_favorite() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("alice")).await.unwrap();
        let pet = store.create_pet(new_pet(user.id, "Max")).await.unwrap();

        assert!(!store.remove_favorite(user.id, pet.id).await.unwrap());
        store.add_favorite(user.id, pet.id).await.unwrap();
        assert!(store.remove_favorite(user.id, pet.id).await.unwrap());
        assert!(!store.is_favorite(user.id, pet.id).await.unwrap());
        assert!(!store.remove_favorite(user.id, pet.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_favorite_of_missing_pet_is_not_found() {
        let store = MemoryStore::new();
        assert_eq!(
            store.add_favorite(1, 42).await,
            Err(StoreError::NotFound("Pet"))
        );
    }

    #[tokio::test]
    async fn test_deleted_pet_drops_out_of_favorites() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("alice")).await.unwrap();
        let max = store.create_pet(new_pet(user.id, "Max")).await.unwrap();
        let luna = store.create_pet(new_pet(user.id, "Luna")).await.unwrap();
        store.add_favorite(user.id, max.id).await.unwrap();
        store.add_favorite(user.id, luna.id).await.unwrap();

        assert!(store.delete_pet(max.id).await.unwrap());
        assert!(!store.delete_pet(max.id).await.unwrap());

        let pets = store.favorite_pets(user.id).await.unwrap();
        assert_eq!(pets.iter().map(|p| p.id).collect::<Vec<_>>(), vec![luna.id]);
        // The dangling row itself is kept
        assert!(store.is_favorite(user.id, max.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_sell_pet_writes_status_and_message_together() {
        let store = MemoryStore::new();
        let seller = store.create_user(new_user("alice")).await.unwrap();
        let buyer = store.create_user(new_user("bob")).await.unwrap();
        let pet = store.create_pet(new_pet(seller.id, "Max")).await.unwrap();

        let (sold, message) = store.sell_pet(pet.id, buyer.id).await.unwrap();
        assert_eq!(sold.status, PetStatus::Sold);
        assert_eq!(store.get_pet(pet.id).await.unwrap(), Some(sold));
        assert_eq!((message.sender_id, message.receiver_id), (buyer.id, seller.id));
        assert_eq!(message.pet_id, Some(pet.id));
        assert_eq!(store.messages_for_user(seller.id).await.unwrap(), vec![message]);

        assert!(matches!(
            store.sell_pet(pet.id, buyer.id).await,
            Err(StoreError::Conflict(_))
        ));
        assert_eq!(store.messages_for_user(seller.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_sale_writes_nothing() {
        let store = MemoryStore::new();
        let seller = store.create_user(new_user("alice")).await.unwrap();
        let pet = store.create_pet(new_pet(seller.id, "Max")).await.unwrap();

        assert_eq!(
            store.sell_pet(99, seller.id).await,
            Err(StoreError::NotFound("Pet"))
        );
        assert_eq!(
            store.sell_pet(pet.id, 99).await,
            Err(StoreError::NotFound("Buyer"))
        );
        assert!(matches!(
            store.sell_pet(pet.id, seller.id).await,
            Err(StoreError::Conflict(_))
        ));

        // A listing deleted before the sale lands is reported, not half-sold
        store.delete_pet(pet.id).await.unwrap();
        let buyer = store.create_user(new_user("bob")).await.unwrap();
        assert_eq!(
            store.sell_pet(pet.id, buyer.id).await,
            Err(StoreError::NotFound("Pet"))
        );

        assert!(store.messages_for_user(seller.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reading_a_thread_clears_unread() {
        let store = MemoryStore::new();
        let a = store.create_user(new_user("alice")).await.unwrap();
        let b = store.create_user(new_user("bob")).await.unwrap();

        store.create_message(message(a.id, b.id)).await.unwrap();
        store.create_message(message(a.id, b.id)).await.unwrap();
        store.create_message(message(b.id, a.id)).await.unwrap();
        assert_eq!(store.unread_count(b.id).await.unwrap(), 2);
        assert_eq!(store.unread_count(a.id).await.unwrap(), 1);

        assert!(store.mark_read(b.id, a.id).await.unwrap());
        assert_eq!(store.unread_count(b.id).await.unwrap(), 0);
        // Nothing left to flip
        assert!(!store.mark_read(b.id, a.id).await.unwrap());
        // The other direction is untouched
        assert_eq!(store.unread_count(a.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_conversation_is_chronological_and_pairwise() {
        let store = MemoryStore::new();
        let a = store.create_user(new_user("alice")).await.unwrap();
        let b = store.create_user(new_user("bob")).await.unwrap();
        let c = store.create_user(new_user("carol")).await.unwrap();

        let m1 = store.create_message(message(a.id, b.id)).await.unwrap();
        store.create_message(message(a.id, c.id)).await.unwrap();
        let m3 = store.create_message(message(b.id, a.id)).await.unwrap();

        let thread = store.conversation(b.id, a.id).await.unwrap();
        assert_eq!(thread.iter().map(|m| m.id).collect::<Vec<_>>(), vec![m1.id, m3.id]);

        let inbox = store.messages_for_user(a.id).await.unwrap();
        assert_eq!(inbox.iter().map(|m| m.id).collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_message_requires_existing_receiver_and_pet() {
        let store = MemoryStore::new();
        let a = store.create_user(new_user("alice")).await.unwrap();

        assert_eq!(
            store.create_message(message(a.id, 99)).await,
            Err(StoreError::NotFound("Receiver"))
        );

        let b = store.create_user(new_user("bob")).await.unwrap();
        let mut about_pet = message(a.id, b.id);
        about_pet.pet_id = Some(7);
        assert_eq!(
            store.create_message(about_pet).await,
            Err(StoreError::NotFound("Pet"))
        );
    }
}
