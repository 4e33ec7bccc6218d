//! Credential crypto for stored LLM API keys (§4.9).
//!
//! AES-256-GCM. The key is read from the environment as base64; if the
//! decoded bytes are not exactly 32 long, SHA-256 is applied to derive a
//! fixed-size key. An encrypted blob is `nonce ∥ ciphertext ∥ tag`, with a
//! fresh nonce drawn for every encryption. Plaintext keys never leave this
//! module except as the direct return value of [`Crypto::decrypt`].

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;
use sentinel_foundation::error::SentinelError;
use sha2::{Digest, Sha256};

const NONCE_LEN: usize = 12;

pub struct Crypto {
    cipher: Aes256Gcm,
}

impl Crypto {
    /// Builds a [`Crypto`] from a base64-encoded key (typically
    /// `SENTINEL_ENCRYPTION_KEY`). Keys that do not decode to exactly 32
    /// bytes are hashed with SHA-256 first.
    pub fn from_base64_key(raw: &str) -> Result<Self, SentinelError> {
        let decoded = BASE64.decode(raw.trim()).map_err(|e| SentinelError::CryptoFailure {
            operation: format!("base64 decode of encryption key: {e}"),
        })?;
        let key_bytes = if decoded.len() == 32 {
            decoded
        } else {
            let mut hasher = Sha256::new();
            hasher.update(&decoded);
            hasher.finalize().to_vec()
        };
        let key = Key::<Aes256Gcm>::from_slice(&key_bytes);
        Ok(Self {
            cipher: Aes256Gcm::new(key),
        })
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>, SentinelError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| SentinelError::CryptoFailure {
                operation: "encrypt".to_string(),
            })?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    pub fn decrypt(&self, blob: &[u8]) -> Result<String, SentinelError> {
        if blob.len() < NONCE_LEN {
            return Err(SentinelError::CryptoFailure {
                operation: "decrypt: blob shorter than nonce".to_string(),
            });
        }
        let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| SentinelError::CryptoFailure {
                operation: "decrypt".to_string(),
            })?;

        String::from_utf8(plaintext).map_err(|_| SentinelError::CryptoFailure {
            operation: "decrypt: plaintext is not valid UTF-8".to_string(),
        })
    }
}

/// Masks a plaintext credential as `"****" + last4` for list operations.
pub fn mask(key: &str) -> String {
    if key.len() <= 4 {
        format!("****{key}")
    } else {
        format!("****{}", &key[key.len() - 4..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> String {
        BASE64.encode([7u8; 32])
    }

    #[test]
    fn encrypt_then_decrypt_round_trips() {
        let crypto = Crypto::from_base64_key(&test_key()).unwrap();
        let blob = crypto.encrypt("sk-super-secret").unwrap();
        assert_eq!(crypto.decrypt(&blob).unwrap(), "sk-super-secret");
    }

    #[test]
    fn two_encryptions_of_the_same_plaintext_use_different_nonces() {
        let crypto = Crypto::from_base64_key(&test_key()).unwrap();
        let a = crypto.encrypt("same-value").unwrap();
        let b = crypto.encrypt("same-value").unwrap();
        assert_ne!(a[..12], b[..12]);
        assert_ne!(a, b);
    }

    #[test]
    fn non_32_byte_key_is_hashed_with_sha256() {
        let short_key = BASE64.encode(b"too-short");
        let crypto = Crypto::from_base64_key(&short_key).unwrap();
        let blob = crypto.encrypt("value").unwrap();
        assert_eq!(crypto.decrypt(&blob).unwrap(), "value");
    }

    #[test]
    fn mask_keeps_only_last_four_characters() {
        assert_eq!(mask("sk-abcdef1234"), "****1234");
    }
}
