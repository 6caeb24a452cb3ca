//! Payment provider callback that completes a sale.

use axum::{extract::State, http::HeaderMap, Json};
use bytes::Bytes;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::{Message, Pet};
use crate::engine::complete_sale;
use crate::AppState;

use super::error::ApiError;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "X-Payment-Signature";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteSaleRequest {
    pub pet_id: i64,
    pub buyer_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteSaleResponse {
    pub success: bool,
    pub pet: Pet,
    pub notification: Message,
}

/// Verify a `sha256=<hex>` HMAC signature over the raw payload
fn verify_signature(secret: &str, signature_header: &str, payload: &[u8]) -> bool {
    let signature = match signature_header.strip_prefix("sha256=") {
        Some(sig) => sig,
        None => return false,
    };

    let expected = match hex::decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(payload);

    mac.verify_slice(&expected).is_ok()
}

/// Compute the signature header value for a payload
pub fn sign_payload(secret: &str, payload: &[u8]) -> Result<String, ApiError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ApiError::internal(format!("Invalid webhook secret: {}", e)))?;
    mac.update(payload);
    Ok(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}

/// Payment confirmation callback
///
/// POST /api/payments/complete
pub async fn complete_payment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CompleteSaleResponse>, ApiError> {
    let secret = state
        .config
        .payments
        .webhook_secret
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::service_unavailable("Payments are not configured"))?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing payment signature"))?;

    if !verify_signature(secret, signature, &body) {
        warn!("Payment callback rejected: invalid signature");
        return Err(ApiError::unauthorized("Invalid payment signature"));
    }

    let req: CompleteSaleRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Invalid payload: {}", e)))?;

    let sale = complete_sale(state.store.as_ref(), req.pet_id, req.buyer_id).await?;

    info!(pet_id = sale.pet.id, buyer_id = req.buyer_id, "Payment confirmed");
    Ok(Json(CompleteSaleResponse {
        success: true,
        pet: sale.pet,
        notification: sale.notification,
    }))
}
