//! Library for generating Chia BLS wallet keys and Ethereum style secp256k1 accounts
pub use address::{Address, AddressPrefix};
pub use bls::{PrivateKey, PublicKey};
pub use derivation::{DerivationPath, DerivationPathComponent, KeyPurpose};
pub use error::Error;
pub use eth::{EthAccount, EthAddress, EthKeyGenerator};
pub use mnemonic::{Entropy, Seed, SeedPhrase};
pub use puzzle::PuzzleHash;
pub use xch::{GeneratedWallet, KeyDeriver};

mod address;

#[cfg(feature = "clap")]
pub mod clap;

#[cfg(feature = "config")]
pub mod config;

pub mod bls;
pub mod derivation;
pub mod error;
pub mod eth;
pub mod mnemonic;
pub mod puzzle;
pub mod xch;

/// A result type with our error type provided as the default.
pub type Result<T, E = Error> = std::result::Result<T, E>;
