//! BLS12-381 keys and the Chia rules for deriving child keys from them.
//!
//! The curve arithmetic, `KeyGen` and both child derivation schemes come from
//! the `chia` SDK. The wrappers here give them this package's error type and
//! hex formatting, and keep private key bytes out of `Debug` output.

use std::fmt::{Debug, Display};
use std::str::FromStr;
use std::sync::Arc;

use chia::bls::{DerivableKey, PublicKey as ChiaPublicKey, SecretKey};

use crate::error::KeyError;

/// Size in bytes of a serialized [PrivateKey].
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Size in bytes of a compressed [PublicKey].
pub const PUBLIC_KEY_SIZE: usize = 48;

/// Shortest input accepted by `KeyGen`.
pub const MIN_SEED_SIZE: usize = 32;

/// A BLS12-381 private key.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(SecretKey);

impl PrivateKey {
    /// Generate the root key for a seed using the IETF `KeyGen` procedure.
    ///
    /// This is the draft-03 flavour used by Chia: the salt is not hashed
    /// and no retry loop is applied.
    pub fn from_seed(seed: &[u8]) -> Result<Self, KeyError> {
        if seed.len() < MIN_SEED_SIZE {
            return Err(KeyError::SeedTooShort {
                minimum: MIN_SEED_SIZE,
                actual: seed.len(),
            });
        }
        Ok(PrivateKey(SecretKey::from_seed(seed)))
    }

    pub(crate) fn from_bip39_seed(seed: &[u8; 64]) -> Self {
        PrivateKey(SecretKey::from_seed(seed))
    }

    /// Parse a big-endian 32 byte scalar, which must be below the group order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let bytes: &[u8; PRIVATE_KEY_SIZE] =
            bytes.try_into().map_err(|_| KeyError::InvalidKeyLength {
                expected: PRIVATE_KEY_SIZE,
                actual: bytes.len(),
            })?;
        SecretKey::from_bytes(bytes)
            .map(PrivateKey)
            .map_err(|source| KeyError::InvalidPrivateKey {
                source: Arc::new(source),
            })
    }

    /// Parse a hex encoded scalar, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s)).map_err(|source| {
            KeyError::InvalidHex {
                input: s.to_owned(),
                source,
            }
        })?;
        Self::from_bytes(&bytes)
    }

    /// Big-endian serialization of the scalar.
    ///
    /// Note that this should be considered security-sensitive content.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_SIZE] {
        self.0.to_bytes()
    }

    /// Hex representation of [Self::to_bytes].
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// The matching G1 public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.public_key())
    }

    /// Hardened child derivation, using the EIP-2333 lamport construction.
    ///
    /// The child cannot be computed from the parent public key.
    pub fn derive_hardened(&self, index: u32) -> PrivateKey {
        PrivateKey(self.0.derive_hardened(index))
    }

    /// Unhardened child derivation.
    ///
    /// The child's public key can also be computed from the parent public key
    /// alone, see [PublicKey::derive_unhardened].
    pub fn derive_unhardened(&self, index: u32) -> PrivateKey {
        PrivateKey(self.0.derive_unhardened(index))
    }

    pub(crate) fn as_chia(&self) -> &SecretKey {
        &self.0
    }
}

impl From<SecretKey> for PrivateKey {
    fn from(key: SecretKey) -> Self {
        PrivateKey(key)
    }
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// A BLS12-381 G1 public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(ChiaPublicKey);

impl PublicKey {
    /// Parse a 48 byte compressed point, checking that it is in the group.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let bytes: &[u8; PUBLIC_KEY_SIZE] =
            bytes.try_into().map_err(|_| KeyError::InvalidKeyLength {
                expected: PUBLIC_KEY_SIZE,
                actual: bytes.len(),
            })?;
        ChiaPublicKey::from_bytes(bytes)
            .map(PublicKey)
            .map_err(|source| KeyError::InvalidPublicKey {
                source: Arc::new(source),
            })
    }

    /// Compressed serialization.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.0.to_bytes()
    }

    /// Point addition.
    pub fn add(&self, other: &PublicKey) -> PublicKey {
        PublicKey(self.0 + &other.0)
    }

    /// Unhardened child derivation without the private key.
    pub fn derive_unhardened(&self, index: u32) -> PublicKey {
        PublicKey(self.0.derive_unhardened(index))
    }

    /// The wallet fingerprint: the first four bytes of the key's SHA-256 hash.
    pub fn fingerprint(&self) -> u32 {
        self.0.get_fingerprint()
    }

    pub(crate) fn as_chia(&self) -> &ChiaPublicKey {
        &self.0
    }
}

impl From<ChiaPublicKey> for PublicKey {
    fn from(key: ChiaPublicKey) -> Self {
        PublicKey(key)
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({self})")
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s)).map_err(|source| {
            KeyError::InvalidHex {
                input: s.to_owned(),
                source,
            }
        })?;
        PublicKey::from_bytes(&bytes)
    }
}
