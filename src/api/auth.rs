use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{request::Parts, HeaderMap, StatusCode},
    Json,
};
use chrono::{Duration, Utc};
use dashmap::DashMap;
use rand::Rng;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::MAX_SESSION_TTL_HOURS;
use crate::db::{LoginRequest, LoginResponse, NewUser, RegisterRequest, Session, User, UserResponse, UserRole};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::extract::ApiJson;
use super::validation::{
    validate_email, validate_image_url, validate_optional_text, validate_password,
    validate_required_text, validate_username,
};

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Generate a random token
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Hash a token for storage
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Login sessions keyed by token hash. Raw tokens are never kept.
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    /// TTLs outside `0..=MAX_SESSION_TTL_HOURS` are clamped into range
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::hours(ttl_hours.clamp(0, MAX_SESSION_TTL_HOURS)),
        }
    }

    /// Open a session for the user and return its bearer token
    pub fn create(&self, user_id: i64) -> String {
        let token = generate_token();
        self.sessions.insert(
            hash_token(&token),
            Session {
                user_id,
                expires_at: Utc::now() + self.ttl,
            },
        );
        token
    }

    /// The user behind a token, if the session exists and has not expired
    pub fn resolve(&self, token: &str) -> Option<i64> {
        let key = hash_token(token);
        let user_id = {
            let session = self.sessions.get(&key)?;
            if session.expires_at > Utc::now() {
                return Some(session.user_id);
            }
            session.user_id
        };

        // Expired: drop it so the map doesn't grow without bound
        self.sessions.remove(&key);
        tracing::debug!(user_id, "Session expired");
        None
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(&hash_token(token)).is_some()
    }

    /// Remove every expired session, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.expires_at > now);
        before - self.sessions.len()
    }
}

/// Extract the bearer token from request headers
fn extract_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Get the current user from a token
pub async fn get_current_user(state: &AppState, token: &str) -> Result<User, ApiError> {
    let user_id = state
        .sessions
        .resolve(token)
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))
}

/// Extractor for the authenticated user. Use `Option<User>` on routes that
/// also serve anonymous callers.
#[async_trait]
impl FromRequestParts<Arc<AppState>> for User {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;
        get_current_user(state, &token).await
    }
}

fn validate_register_request(req: &RegisterRequest) -> Result<UserRole, ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    errors.check("username", validate_username(&req.username));
    errors.check("email", validate_email(&req.email));
    errors.check("password", validate_password(&req.password));
    errors.check("name", validate_required_text(&req.name, "Name", 100));
    errors.check("bio", validate_optional_text(&req.bio, "Bio", 1000));
    errors.check("location", validate_optional_text(&req.location, "Location", 200));
    errors.check("profileImage", validate_image_url(&req.profile_image));

    let role = match req.role.as_deref() {
        None | Some("") => UserRole::default(),
        Some(r) => match r.parse::<UserRole>() {
            Ok(role) => role,
            Err(e) => {
                errors.add("role", e);
                UserRole::default()
            }
        },
    };

    errors.finish()?;
    Ok(role)
}

/// Register endpoint; logs the new user in
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    let role = validate_register_request(&request)?;

    let password_hash = hash_password(&request.password)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;

    let user = state
        .store
        .create_user(NewUser {
            username: request.username,
            email: request.email,
            password_hash,
            name: request.name,
            role,
            bio: request.bio,
            location: request.location,
            profile_image: request.profile_image.filter(|p| !p.is_empty()),
            is_verified: false,
        })
        .await?;

    info!(user_id = user.id, username = %user.username, "User registered");

    let token = state.sessions.create(user.id);
    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            token,
            user: UserResponse::from(user),
        }),
    ))
}

/// Login endpoint
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state.store.get_user_by_username(&request.username).await?;

    // Same answer for unknown user and wrong password
    let user = match user {
        Some(u) if verify_password(&request.password, &u.password_hash) => u,
        _ => {
            warn!(username = %request.username, "Failed login attempt");
            return Err(ApiError::unauthorized("Invalid username or password"));
        }
    };

    let token = state.sessions.create(user.id);
    info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// Logout endpoint
///
/// POST /api/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let token = extract_token(&headers).ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    if !state.sessions.revoke(&token) {
        return Err(ApiError::unauthorized("Not authenticated"));
    }

    Ok(Json(json!({ "message": "Logged out successfully" })))
}

/// Current user endpoint
///
/// GET /api/auth/me
pub async fn me(user: User) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}
