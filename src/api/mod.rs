pub mod auth;
pub mod error;
mod extract;
mod favorites;
mod messages;
pub mod payments;
mod pets;
mod users;
mod validation;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub use error::{ApiError, ErrorCode};

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes (public, except logout and me which resolve the token themselves)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me));

    // Handlers that need a user take the `User` extractor
    let api_routes = Router::new()
        // Users
        .route("/users/me", put(users::update_me))
        .route("/users/:id", get(users::get_user))
        // Pets
        .route("/pets", get(pets::list_pets))
        .route("/pets", post(pets::create_pet))
        .route("/pets/:id", get(pets::get_pet))
        .route("/pets/:id", put(pets::update_pet))
        .route("/pets/:id", delete(pets::delete_pet))
        // Favorites
        .route("/favorites", get(favorites::list_favorites))
        .route("/favorites", post(favorites::add_favorite))
        .route("/favorites/:pet_id", delete(favorites::remove_favorite))
        .route("/favorites/check/:pet_id", get(favorites::check_favorite))
        // Messages
        .route("/messages", get(messages::list_messages))
        .route("/messages", post(messages::send_message))
        .route("/messages/conversations", get(messages::list_conversations))
        .route("/messages/conversation/:user_id", get(messages::get_conversation))
        .route("/messages/unread", get(messages::unread_count))
        // Payment provider callback, signed instead of session-authenticated
        .route("/payments/complete", post(payments::complete_payment));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
