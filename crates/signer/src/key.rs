//! Ed25519 keypairs and Sui addresses.

use crate::error::{SignerError, SignerResult};
use base64::Engine;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ed25519_dalek::SigningKey;
use std::fmt;

type Blake2b256 = Blake2b<U32>;

/// Signature scheme flag for Ed25519 keys.
pub const ED25519_FLAG: u8 = 0x00;

/// Length of a Sui address in bytes.
const ADDRESS_LENGTH: usize = 32;

/// A Sui account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SuiAddress([u8; ADDRESS_LENGTH]);

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiAddress({self})")
    }
}

/// The gateway's Sui signing keypair.
pub struct SuiKeypair {
    inner: SigningKey,
}

impl SuiKeypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand_core::OsRng;
        Self {
            inner: SigningKey::generate(&mut rng),
        }
    }

    /// Parse a base64 secret key.
    ///
    /// Accepts `flag || seed` (33 bytes, as exported by `sui keytool`) or a
    /// bare 32-byte seed. Only the Ed25519 flag is supported.
    pub fn from_base64(s: &str) -> SignerResult<Self> {
        let s = s.trim();
        if s.starts_with("suiprivkey") {
            return Err(SignerError::KeyParsing(
                "bech32 suiprivkey keys are not supported; convert with \
                 `sui keytool convert` and pass the base64 form"
                    .to_string(),
            ));
        }

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(|e| SignerError::KeyParsing(format!("invalid base64: {e}")))?;

        let seed = match bytes.len() {
            33 => {
                if bytes[0] != ED25519_FLAG {
                    return Err(SignerError::UnsupportedScheme(bytes[0]));
                }
                &bytes[1..]
            }
            32 => &bytes[..],
            n => {
                return Err(SignerError::KeyParsing(format!(
                    "expected 32 or 33 bytes, got {n}"
                )));
            }
        };

        let seed: [u8; 32] = seed
            .try_into()
            .map_err(|_| SignerError::KeyParsing("invalid secret key bytes".to_string()))?;

        Ok(Self {
            inner: SigningKey::from_bytes(&seed),
        })
    }

    /// Encode as base64 `flag || seed`.
    pub fn to_base64(&self) -> String {
        let mut bytes = Vec::with_capacity(33);
        bytes.push(ED25519_FLAG);
        bytes.extend_from_slice(self.inner.as_bytes());
        base64::engine::general_purpose::STANDARD.encode(&bytes)
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.inner.verifying_key().to_bytes()
    }

    /// Sui address: `blake2b256(flag || public_key)`.
    pub fn address(&self) -> SuiAddress {
        let mut hasher = Blake2b256::new();
        hasher.update([ED25519_FLAG]);
        hasher.update(self.public_key_bytes());
        SuiAddress(hasher.finalize().into())
    }
}

impl fmt::Debug for SuiKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiKeypair")
            .field("address", &self.address())
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
