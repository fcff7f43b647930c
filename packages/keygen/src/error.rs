//! Error types exposed by this package.

use std::sync::Arc;

/// Errors that can occur while generating or deriving keys.
#[derive(thiserror::Error, Debug, Clone)]
pub enum KeyError {
    #[error("Secure randomness source is unavailable: {source}")]
    RandomnessUnavailable { source: Arc<rand::Error> },
    #[error("Invalid mnemonic: {source}")]
    InvalidMnemonic { source: bip39::Error },
    #[error("Invalid entropy length {actual}, expected {expected} bytes")]
    InvalidEntropy { expected: usize, actual: usize },
    #[error("Invalid hex encoding in {input:?}: {source}")]
    InvalidHex {
        input: String,
        source: hex::FromHexError,
    },
    #[error("BLS key generation needs at least {minimum} bytes of seed, received {actual}")]
    SeedTooShort { minimum: usize, actual: usize },
    #[error("Invalid key length {actual}, expected {expected} bytes")]
    InvalidKeyLength { expected: usize, actual: usize },
    #[error("Invalid BLS private key: {source}")]
    InvalidPrivateKey { source: Arc<chia::bls::Error> },
    #[error("Invalid BLS public key: {source}")]
    InvalidPublicKey { source: Arc<chia::bls::Error> },
    #[error("Invalid secp256k1 private key: {source}")]
    InvalidSecp256k1Key { source: secp256k1::Error },
    #[error("Malformed derivation path {path:?}: {reason}")]
    MalformedDerivationPath { path: String, reason: String },
}

/// Errors that can occur while working with [crate::Address].
#[derive(thiserror::Error, Debug, Clone)]
pub enum AddressError {
    #[error("Invalid bech32m encoding in {address:?}: {source}")]
    InvalidBech32m {
        address: String,
        source: bech32::primitives::decode::CheckedHrpstringError,
    },
    #[error("Invalid byte count within {address:?}, expected 32 bytes, received {actual}")]
    InvalidByteCount { address: String, actual: usize },
    #[error("Invalid address prefix provided: {prefix:?}")]
    InvalidPrefix { prefix: String },
}

/// Any error produced by this package.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    Address(#[from] AddressError),
    #[cfg(feature = "config")]
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}
