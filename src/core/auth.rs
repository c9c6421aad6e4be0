//! Password hashing and bearer tokens.
//!
//! Passwords are stored as argon2 PHC strings. Tokens are `payload.signature`, both
//! base64url without padding: the payload is the JSON [`Claims`], the signature an
//! HMAC-SHA256 over the encoded payload.

use crate::{
    errors::{Error, Result},
    models::UserRole,
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use ring::hmac;
use serde::{Deserialize, Serialize};

const SALT_LENGTH: usize = 16;

/// Hashes `password` with a fresh random salt.
///
/// # Errors
/// Returns [`Error::OperationFailed`] if argon2 rejects the input.
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| Error::OperationFailed(format!("salt encoding failed: {e}")))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::OperationFailed(format!("password hashing failed: {e}")))
}

/// Checks `password` against a stored PHC string.
///
/// # Errors
/// Returns [`Error::OperationFailed`] if the stored hash cannot be parsed.
pub fn verify_password(hash: &str, password: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| Error::OperationFailed(format!("stored hash is malformed: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// What a token asserts about its bearer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub id: i64,
    /// User role at issue time
    pub role: UserRole,
    /// Issue time, seconds since the epoch
    pub iat: i64,
}

impl Claims {
    /// Claims for `id`/`role` issued now.
    #[must_use]
    pub fn new(id: i64, role: UserRole) -> Self {
        Self {
            id,
            role,
            iat: chrono::Utc::now().timestamp(),
        }
    }
}

/// Signs and verifies bearer tokens with a shared secret.
#[derive(Debug, Clone)]
pub struct TokenSigner {
    key: hmac::Key,
}

impl TokenSigner {
    /// Creates a signer keyed by `secret`.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret),
        }
    }

    /// Encodes and signs `claims`.
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);
        let tag = hmac::sign(&self.key, payload.as_bytes());
        Ok(format!("{payload}.{}", URL_SAFE_NO_PAD.encode(tag.as_ref())))
    }

    /// Checks the signature of `token` and decodes its claims.
    ///
    /// # Errors
    /// Returns [`Error::InvalidToken`] for any malformed or tampered token.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let (payload, signature) = token.split_once('.').ok_or(Error::InvalidToken)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| Error::InvalidToken)?;
        hmac::verify(&self.key, payload.as_bytes(), &signature).map_err(|_| Error::InvalidToken)?;

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| Error::InvalidToken)?;
        serde_json::from_slice(&bytes).map_err(|_| Error::InvalidToken)
    }
}
