//! HMAC-signed session tokens
//!
//! A token has the form `<id>.<hex(HMAC-SHA256(key, id))>`. The id is
//! random and carries no data; server-side state is keyed by it.

use std::fmt;

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const SEPARATOR: char = '.';

/// Token verification failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionTokenError {
    #[error("signing key must be at least {min} bytes, got {actual}")]
    KeyTooShort { min: usize, actual: usize },

    #[error("signing key rejected by HMAC")]
    InvalidKey,

    #[error("malformed session token")]
    Malformed,

    #[error("session token signature mismatch")]
    BadSignature,
}

/// Random 128-bit session id, hex encoded.
pub fn generate_session_id() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Signs and verifies session ids with a shared secret.
#[derive(Clone)]
pub struct SessionTokenSigner {
    mac: HmacSha256,
}

impl SessionTokenSigner {
    /// # Errors
    /// Returns `KeyTooShort` when `key` is shorter than `min_len` bytes.
    pub fn new(key: &[u8], min_len: usize) -> Result<Self, SessionTokenError> {
        if key.len() < min_len {
            return Err(SessionTokenError::KeyTooShort { min: min_len, actual: key.len() });
        }
        let mac = HmacSha256::new_from_slice(key).map_err(|_| SessionTokenError::InvalidKey)?;
        Ok(Self { mac })
    }

    /// Produce `<id>.<signature>` for the given id.
    pub fn sign(&self, id: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        format!("{id}{SEPARATOR}{signature}")
    }

    /// Check a token and return the id it carries.
    ///
    /// Signature comparison is constant time.
    ///
    /// # Errors
    /// `Malformed` when the token has no separator, an empty id or a
    /// non-hex signature; `BadSignature` when the signature does not match.
    pub fn verify<'a>(&self, token: &'a str) -> Result<&'a str, SessionTokenError> {
        let (id, signature) = token.rsplit_once(SEPARATOR).ok_or(SessionTokenError::Malformed)?;
        if id.is_empty() {
            return Err(SessionTokenError::Malformed);
        }
        let signature = hex::decode(signature).map_err(|_| SessionTokenError::Malformed)?;

        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        mac.verify_slice(&signature).map_err(|_| SessionTokenError::BadSignature)?;
        Ok(id)
    }
}

impl fmt::Debug for SessionTokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokenSigner").field("key", &"<redacted>").finish()
    }
}
