//! HMAC-SHA256 request signing.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::api::error::{ApiError, ApiResult};

type HmacSha256 = Hmac<Sha256>;

/// Sign `payload` with `secret` and return the lowercase hex digest.
///
/// The payload is the canonical query string exactly as it will be sent.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] if the secret is empty.
pub fn sign(secret: &[u8], payload: &str) -> ApiResult<String> {
    if secret.is_empty() {
        return Err(ApiError::Configuration(
            "API secret is empty; cannot sign request".to_string(),
        ));
    }
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| ApiError::Configuration(format!("Invalid HMAC key: {}", e)))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
