use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Anything shorter than this cannot be a well-formed signed token, so it is
/// reported as a caller error instead of a quiet `false`.
pub const MIN_TOKEN_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("token subject must not be blank")]
    InvalidIdentity,
    #[error("token is too short to be inspected")]
    InvalidToken,
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// HMAC-SHA256 signing key, generated fresh at startup or loaded from the
/// environment. The raw bytes never leave this type; callers that want to
/// log which key is live use [`TokenKey::fingerprint`].
pub struct TokenKey {
    bytes: [u8; 32],
}

impl TokenKey {
    /// Generate a random 256-bit key. Restarting the process with a generated
    /// key invalidates every previously issued token.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Load a key from its base64 encoding. The decoded key must be exactly
    /// 32 bytes.
    pub fn from_base64(encoded: &str) -> anyhow::Result<Self> {
        let raw = BASE64
            .decode(encoded.trim())
            .map_err(|e| anyhow::anyhow!("signing key is not valid base64: {e}"))?;
        anyhow::ensure!(
            raw.len() == 32,
            "signing key must decode to 32 bytes, got {}",
            raw.len()
        );
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&raw);
        Ok(Self { bytes })
    }

    /// First eight hex digits of the key's SHA-256, safe to log.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.bytes);
        hex::encode(&digest[..4])
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Issues and checks bearer tokens. Cheap to clone; every clone shares the
/// same key material and lifetime policy.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
    relaxed: Validation,
}

impl TokenService {
    pub fn new(key: &TokenKey, ttl: Duration) -> Self {
        // Expiry is compared by hand in `validate_at` so that a zero-lifetime
        // token is dead the instant it is issued; the default validation
        // would grant it a leeway window.
        let mut relaxed = Validation::default();
        relaxed.validate_exp = false;
        Self {
            encoding: EncodingKey::from_secret(&key.bytes),
            decoding: DecodingKey::from_secret(&key.bytes),
            ttl_secs: ttl.as_secs() as i64,
            relaxed,
        }
    }

    /// Sign a token for `subject`, valid from now until the configured
    /// lifetime runs out.
    pub fn issue(&self, subject: &str) -> Result<String, AuthError> {
        if subject.trim().is_empty() {
            return Err(AuthError::InvalidIdentity);
        }
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_owned(),
            iat,
            exp: iat + self.ttl_secs,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Whether `token` carries a good signature and has not expired.
    ///
    /// Malformed or tampered input yields `Ok(false)`; only an input too
    /// short to be a token at all is an `Err`.
    pub fn validate(&self, token: &str) -> Result<bool, AuthError> {
        guard_len(token)?;
        Ok(self.validate_at(token, Utc::now().timestamp()))
    }

    fn validate_at(&self, token: &str, now: i64) -> bool {
        match decode::<Claims>(token, &self.decoding, &self.relaxed) {
            Ok(data) => now < data.claims.exp,
            Err(_) => false,
        }
    }

    /// The subject a token was issued for. Signature must check out, but an
    /// expired token still reveals its subject; pair with [`Self::validate`]
    /// when freshness matters.
    pub fn subject_of(&self, token: &str) -> Result<String, AuthError> {
        guard_len(token)?;
        decode::<Claims>(token, &self.decoding, &self.relaxed)
            .map(|data| data.claims.sub)
            .map_err(|_| AuthError::InvalidToken)
    }
}

fn guard_len(token: &str) -> Result<(), AuthError> {
    if token.len() < MIN_TOKEN_LEN {
        return Err(AuthError::InvalidToken);
    }
    Ok(())
}
