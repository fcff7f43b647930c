//! Puzzle hashes and synthetic keys for the standard transaction puzzle.
//!
//! Coins locked by the standard puzzle are identified by the tree hash of
//! `p2_delegated_puzzle_or_hidden_puzzle` curried with a synthetic public key.
//! The synthetic key commits to a hidden puzzle, so spending through the hidden
//! path never requires revealing the original wallet key.

use std::fmt::{Debug, Display};
use std::str::FromStr;

use chia::clvm_utils::TreeHash;
use chia::puzzles::{standard::StandardArgs, DeriveSynthetic};

use crate::bls::{PrivateKey, PublicKey};
use crate::error::KeyError;

/// Tree hash of the uncurried `p2_delegated_puzzle_or_hidden_puzzle` module.
pub const STANDARD_PUZZLE_HASH: [u8; 32] = [
    0xe9, 0xaa, 0xa4, 0x9f, 0x45, 0xba, 0xd5, 0xc8, 0x89, 0xb8, 0x6e, 0xe3, 0x34, 0x15, 0x50, 0xc1,
    0x55, 0xcf, 0xdd, 0x10, 0xc3, 0xa6, 0x75, 0x7d, 0xe6, 0x18, 0xd2, 0x06, 0x12, 0xff, 0xfd, 0x52,
];

/// Tree hash of the default hidden puzzle, serialized as `ff0980`.
pub const DEFAULT_HIDDEN_PUZZLE_HASH: [u8; 32] = [
    0x71, 0x1d, 0x6c, 0x4e, 0x32, 0xc9, 0x2e, 0x53, 0x17, 0x9b, 0x19, 0x94, 0x84, 0xcf, 0x8c, 0x89,
    0x75, 0x42, 0xbc, 0x57, 0xf2, 0xb2, 0x25, 0x82, 0x79, 0x9f, 0x9d, 0x65, 0x7e, 0xec, 0x46, 0x99,
];

/// The hash identifying a spendable on-chain condition.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PuzzleHash([u8; 32]);

impl PuzzleHash {
    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<TreeHash> for PuzzleHash {
    fn from(hash: TreeHash) -> Self {
        PuzzleHash(hash.to_bytes())
    }
}

impl From<[u8; 32]> for PuzzleHash {
    fn from(bytes: [u8; 32]) -> Self {
        PuzzleHash(bytes)
    }
}

impl AsRef<[u8]> for PuzzleHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for PuzzleHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Debug for PuzzleHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PuzzleHash({self})")
    }
}

impl FromStr for PuzzleHash {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.strip_prefix("0x").unwrap_or(s), &mut bytes).map_err(
            |source| KeyError::InvalidHex {
                input: s.to_owned(),
                source,
            },
        )?;
        Ok(PuzzleHash(bytes))
    }
}

/// Blind `public_key` with a hidden puzzle hash.
///
/// The offset `sha256(public_key || hidden_puzzle_hash)` is read as a signed
/// big-endian integer and reduced modulo the group order before being added.
pub fn synthetic_public_key(public_key: &PublicKey, hidden_puzzle_hash: &[u8; 32]) -> PublicKey {
    public_key
        .as_chia()
        .derive_synthetic_hidden(hidden_puzzle_hash)
        .into()
}

/// The private key matching [synthetic_public_key].
pub fn synthetic_secret_key(secret_key: &PrivateKey, hidden_puzzle_hash: &[u8; 32]) -> PrivateKey {
    secret_key
        .as_chia()
        .derive_synthetic_hidden(hidden_puzzle_hash)
        .into()
}

/// Puzzle hash of the standard puzzle locked to `synthetic_key`.
pub fn puzzle_hash_for_synthetic_public_key(synthetic_key: &PublicKey) -> PuzzleHash {
    StandardArgs::curry_tree_hash(*synthetic_key.as_chia()).into()
}
