//! Sale completion, invoked once the payment provider confirms a payment.

use tracing::info;

use crate::db::{Message, Pet, Store, StoreResult};

#[derive(Debug, Clone)]
pub struct CompletedSale {
    pub pet: Pet,
    pub notification: Message,
}

/// Message the buyer sends the seller once a sale goes through
pub fn notification_text(pet: &Pet) -> String {
    format!(
        "Payment completed for {}. Please arrange the handover details.",
        pet.name
    )
}

/// Mark the pet as sold and notify the seller on behalf of the buyer.
///
/// The store applies both writes under one lock and refuses a pet that is
/// already sold, so a replayed confirmation fails instead of sending a
/// second notification.
pub async fn complete_sale(store: &dyn Store, pet_id: i64, buyer_id: i64) -> StoreResult<CompletedSale> {
    let (pet, notification) = store.sell_pet(pet_id, buyer_id).await?;

    info!(pet_id = pet.id, buyer_id, seller_id = pet.seller_id, "Sale completed");

    Ok(CompletedSale { pet, notification })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, NewPet, NewUser, PetStatus, StoreError, UserRole};

    async fn setup() -> (MemoryStore, i64, i64, i64) {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for name in ["buyer", "seller"] {
            let user = store
                .create_user(NewUser {
                    username: name.to_string(),
                    email: format!("{}@example.com", name),
                    password_hash: String::new(),
                    name: name.to_string(),
                    role: UserRole::PetSeeker,
                    bio: None,
                    location: None,
                    profile_image: None,
                    is_verified: false,
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        let pet = store
            .create_pet(NewPet {
                name: "Max".to_string(),
                species: "dog".to_string(),
                price: Some(1200.0),
                seller_id: ids[1],
                ..Default::default()
            })
            .await
            .unwrap();
        (store, ids[0], ids[1], pet.id)
    }

    #[tokio::test]
    async fn test_sale_marks_sold_and_notifies_seller() {
        let (store, buyer, seller, pet_id) = setup().await;

        let sale = complete_sale(&store, pet_id, buyer).await.unwrap();
        assert_eq!(sale.pet.status, PetStatus::Sold);
        assert_eq!(sale.notification.sender_id, buyer);
        assert_eq!(sale.notification.receiver_id, seller);
        assert_eq!(sale.notification.pet_id, Some(pet_id));
        assert_eq!(
            sale.notification.content,
            "Payment completed for Max. Please arrange the handover details."
        );
        assert_eq!(store.unread_count(seller).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_replayed_sale_is_rejected_without_second_message() {
        let (store, buyer, seller, pet_id) = setup().await;
        complete_sale(&store, pet_id, buyer).await.unwrap();

        let replay = complete_sale(&store, pet_id, buyer).await;
        assert!(matches!(replay, Err(StoreError::Conflict(_))));
        assert_eq!(store.unread_count(seller).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_pet_or_buyer() {
        let (store, buyer, seller, pet_id) = setup().await;

        assert!(matches!(
            complete_sale(&store, 99, buyer).await,
            Err(StoreError::NotFound("Pet"))
        ));
        assert!(matches!(
            complete_sale(&store, pet_id, 99).await,
            Err(StoreError::NotFound("Buyer"))
        ));
        assert!(matches!(
            complete_sale(&store, pet_id, seller).await,
            Err(StoreError::Conflict(_))
        ));

        let pet = store.get_pet(pet_id).await.unwrap().unwrap();
        assert_eq!(pet.status, PetStatus::Available);
    }
}
