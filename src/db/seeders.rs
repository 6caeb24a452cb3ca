//! Demo data seeder
//!
//! Populates an empty store with a few users, pet listings, favorites and
//! messages so the marketplace has something to browse on first start.

use anyhow::{anyhow, Result};
use tracing::info;

use super::{ListingType, NewMessage, NewPet, NewUser, Store, UserRole};
use crate::api::auth::hash_password;

const DEMO_PASSWORD: &str = "password123";

/// Seed demo users, pets, favorites and messages
pub async fn seed_demo_data(store: &dyn Store) -> Result<()> {
    info!("Seeding demo marketplace data...");

    let password_hash =
        hash_password(DEMO_PASSWORD).map_err(|e| anyhow!("Failed to hash demo password: {}", e))?;

    // (username, email, name, role, bio, location, profile_image)
    let users: Vec<(&str, &str, &str, UserRole, &str, &str, &str)> = vec![
        (
            "johndoe",
            "john@example.com",
            "John Doe",
            UserRole::PetSeeker,
            "Animal lover looking for a new furry friend",
            "Seattle, WA",
            "https://randomuser.me/api/portraits/men/1.jpg",
        ),
        (
            "janesmith",
            "jane@example.com",
            "Jane Smith",
            UserRole::Breeder,
            "Certified ethical dog breeder with 10 years of experience",
            "Portland, OR",
            "https://randomuser.me/api/portraits/women/1.jpg",
        ),
        (
            "pawshelter",
            "shelter@pawshelter.com",
            "Paws Animal Shelter",
            UserRole::Shelter,
            "No-kill animal shelter helping pets find forever homes",
            "Vancouver, WA",
            "https://images.unsplash.com/photo-1541888946425-d81bb19240f5?w=500&auto=format&fit=crop&q=60",
        ),
    ];

    let mut user_ids = Vec::with_capacity(users.len());
    for (username, email, name, role, bio, location, profile_image) in users {
        let user = store
            .create_user(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash: password_hash.clone(),
                name: name.to_string(),
                role,
                bio: Some(bio.to_string()),
                location: Some(location.to_string()),
                profile_image: Some(profile_image.to_string()),
                is_verified: true,
            })
            .await?;
        user_ids.push(user.id);
    }
    let (john, jane, shelter) = (user_ids[0], user_ids[1], user_ids[2]);

    // (name, species, breed, age in months, gender, size, price, seller, location, listing, featured, image, description)
    #[allow(clippy::type_complexity)]
    let pets: Vec<(&str, &str, &str, i32, &str, &str, f64, i64, &str, ListingType, bool, &str, &str)> = vec![
        (
            "Max", "dog", "Golden Retriever", 8, "male", "large", 1200.0, jane, "Portland, OR",
            ListingType::Sale, true,
            "https://images.unsplash.com/photo-1587300003388-59208cc962cb?auto=format&fit=crop&w=500&q=80",
            "Max is a friendly and playful Golden Retriever who loves to fetch and swim. He's great with kids and other pets.",
        ),
        (
            "Luna", "cat", "Calico", 3, "female", "small", 600.0, jane, "Seattle, WA",
            ListingType::Sale, true,
            "https://images.unsplash.com/photo-1526336024174-e58f5cdd8e13?auto=format&fit=crop&w=500&q=80",
            "Luna is a sweet and gentle calico kitten who loves to cuddle and play with toys. She's litter trained and ready for her forever home.",
        ),
        (
            "Cooper", "dog", "Labrador", 4, "male", "large", 950.0, jane, "Bellevue, WA",
            ListingType::Sale, false,
            "https://images.unsplash.com/photo-1586671267731-da2cf3ceeb80?auto=format&fit=crop&w=500&q=80",
            "Cooper is an energetic labrador puppy who loves to play and learn new tricks. He's partially house trained and great with kids.",
        ),
        (
            "Oliver", "cat", "Siamese", 12, "male", "medium", 750.0, jane, "Tacoma, WA",
            ListingType::Sale, true,
            "https://images.unsplash.com/photo-1548802673-380ab8ebc7b7?auto=format&fit=crop&w=500&q=80",
            "Oliver is a beautiful Siamese cat with striking blue eyes. He's quiet, independent, and enjoys lounging in sunny spots.",
        ),
        (
            "Bella", "dog", "Border Collie", 12, "female", "medium", 850.0, jane, "Vancouver, WA",
            ListingType::Sale, false,
            "https://images.unsplash.com/photo-1581888227599-779811939961?auto=format&fit=crop&w=500&q=80",
            "Bella is a smart, energetic Border Collie who loves to play and learn new tricks. She excels at agility training and is very loyal.",
        ),
        (
            "Whiskers", "cat", "Tabby", 36, "male", "medium", 75.0, shelter, "Seattle, WA",
            ListingType::Adoption, true,
            "https://images.unsplash.com/photo-1592194996308-7b43878e84a6?auto=format&fit=crop&w=500&q=80",
            "Whiskers is a gentle, loving cat who enjoys cuddles and playtime with feather toys. He's litter trained and gets along with other cats.",
        ),
        (
            "Buddy", "dog", "Pug", 24, "male", "small", 950.0, jane, "Portland, OR",
            ListingType::Sale, false,
            "https://images.unsplash.com/photo-1583511655857-d19b40a7a54e?auto=format&fit=crop&w=500&q=80",
            "Buddy is a friendly, loyal pug who loves to nap and go for short walks. He's great with children and gets along with other dogs.",
        ),
        (
            "Simba", "cat", "Maine Coon", 12, "male", "large", 800.0, jane, "Olympia, WA",
            ListingType::Sale, false,
            "https://images.unsplash.com/photo-1543852786-1cf6624b9987?auto=format&fit=crop&w=500&q=80",
            "Simba is a majestic Maine Coon with a playful personality and stunning coat. He's very affectionate and loves to be brushed.",
        ),
        (
            "Charlie", "dog", "Beagle", 48, "male", "medium", 400.0, john, "Eugene, OR",
            ListingType::Rehome, false,
            "https://images.unsplash.com/photo-1602250798340-c33fb5909efd?auto=format&fit=crop&w=500&q=80",
            "Charlie is a sweet beagle who needs a new loving home due to owner relocation. He's house trained and knows basic commands.",
        ),
        (
            "Tiger", "cat", "Bengal", 8, "female", "medium", 1200.0, jane, "Tacoma, WA",
            ListingType::Sale, true,
            "https://images.unsplash.com/photo-1529778873920-4da4926a72c2?auto=format&fit=crop&w=500&q=80",
            "Tiger is an energetic Bengal kitten with stunning markings and a playful disposition. She loves interactive toys and climbing.",
        ),
    ];

    let mut pet_ids = Vec::with_capacity(pets.len());
    for (name, species, breed, age, gender, size, price, seller_id, location, listing_type, featured, image, description) in pets {
        let pet = store
            .create_pet(NewPet {
                name: name.to_string(),
                species: species.to_string(),
                breed: Some(breed.to_string()),
                age: Some(age),
                gender: Some(gender.to_string()),
                size: Some(size.to_string()),
                description: Some(description.to_string()),
                price: Some(price),
                images: vec![image.to_string()],
                seller_id,
                location: Some(location.to_string()),
                is_featured: featured,
                listing_type,
            })
            .await?;
        pet_ids.push(pet.id);
    }
    let (max, cooper, whiskers) = (pet_ids[0], pet_ids[2], pet_ids[5]);

    store.add_favorite(john, max).await?;
    store.add_favorite(john, cooper).await?;

    // (sender, receiver, content, pet)
    let messages = [
        (john, jane, "Hi, I'm interested in Max. Is he still available?", max),
        (jane, john, "Yes, Max is still available! Would you like to schedule a visit?", max),
        (john, shelter, "Hello, I'm interested in Whiskers. Can I come see him?", whiskers),
    ];
    for (sender_id, receiver_id, content, pet_id) in messages {
        store
            .create_message(NewMessage {
                sender_id,
                receiver_id,
                content: content.to_string(),
                pet_id: Some(pet_id),
            })
            .await?;
    }

    info!(
        users = user_ids.len(),
        pets = pet_ids.len(),
        "Demo data seeded"
    );
    Ok(())
}
