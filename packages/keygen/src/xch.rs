//! The Chia key derivation pipeline.
//!
//! A fresh wallet goes through the following steps, each of which is exposed
//! as a standalone function:
//!
//! entropy → mnemonic → seed → root key → derived key → public key →
//! synthetic public key → puzzle hash → address
//!
//! [KeyDeriver] strings them together for the fixed validator and wallet paths.

use crate::address::{Address, AddressPrefix};
use crate::bls::{PrivateKey, PublicKey};
use crate::derivation::DerivationPath;
use crate::error::{AddressError, KeyError};
use crate::mnemonic::{Entropy, Seed, SeedPhrase};
use crate::puzzle::{self, PuzzleHash, DEFAULT_HIDDEN_PUZZLE_HASH};

/// Draw 16 bytes from the operating system's randomness source.
pub fn generate_entropy() -> Result<Entropy, KeyError> {
    Entropy::generate()
}

/// Encode entropy as a 12 word English mnemonic.
pub fn entropy_to_mnemonic(entropy: Entropy) -> SeedPhrase {
    SeedPhrase::from_entropy(entropy)
}

/// Parse a mnemonic and stretch it into a [Seed].
///
/// Fails on unknown words, a bad word count, or a checksum mismatch.
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<Seed, KeyError> {
    let phrase: SeedPhrase = phrase.parse()?;
    Ok(phrase.to_seed(passphrase))
}

pub fn seed_to_root_key(seed: &Seed) -> PrivateKey {
    seed.root_key()
}

/// Apply every step of `path` to `root`.
pub fn derive_path(root: &PrivateKey, path: &DerivationPath) -> PrivateKey {
    path.derive(root)
}

pub fn public_key_of(key: &PrivateKey) -> PublicKey {
    key.public_key()
}

/// Blind a public key with the hash of a hidden puzzle.
pub fn synthetic_key(public_key: &PublicKey, hidden_puzzle_hash: &[u8; 32]) -> PublicKey {
    puzzle::synthetic_public_key(public_key, hidden_puzzle_hash)
}

/// The secret counterpart of [synthetic_key].
pub fn synthetic_secret_key(key: &PrivateKey, hidden_puzzle_hash: &[u8; 32]) -> PrivateKey {
    puzzle::synthetic_secret_key(key, hidden_puzzle_hash)
}

/// Puzzle hash of the standard transaction locked to a synthetic public key.
pub fn puzzle_hash(synthetic_key: &PublicKey) -> PuzzleHash {
    puzzle::puzzle_hash_for_synthetic_public_key(synthetic_key)
}

pub fn encode_address(puzzle_hash: PuzzleHash, prefix: AddressPrefix) -> Address {
    Address::new(puzzle_hash, prefix)
}

/// Parse a bech32m address back into its prefix and puzzle hash.
pub fn decode_address(address: &str) -> Result<Address, AddressError> {
    address.parse()
}

/// Everything shown to the user after generating a new wallet.
#[derive(Clone, Debug)]
pub struct GeneratedWallet {
    /// Note that this should be considered security-sensitive content.
    pub seed_phrase: SeedPhrase,
    pub validator_key: PrivateKey,
    pub validator_public_key: PublicKey,
    /// Fingerprint of the root public key, as displayed by Chia wallets.
    pub fingerprint: u32,
    pub first_address: Address,
}

/// Derives Chia keys and addresses for a single network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyDeriver {
    prefix: AddressPrefix,
}

impl KeyDeriver {
    pub fn new(prefix: AddressPrefix) -> Self {
        KeyDeriver { prefix }
    }

    pub fn prefix(&self) -> AddressPrefix {
        self.prefix
    }

    /// Generate a new random wallet.
    pub fn generate(&self) -> Result<GeneratedWallet, KeyError> {
        let entropy = generate_entropy()?;
        tracing::debug!("Drew fresh entropy for a new {} wallet", self.prefix);
        Ok(self.summary(&entropy_to_mnemonic(entropy)))
    }

    /// Derive the values of [GeneratedWallet] for an existing phrase.
    pub fn summary(&self, seed_phrase: &SeedPhrase) -> GeneratedWallet {
        let root = root_key(seed_phrase);
        let validator_key = derive_path(&root, &DerivationPath::validator());
        let validator_public_key = public_key_of(&validator_key);
        let fingerprint = public_key_of(&root).fingerprint();
        tracing::debug!("Derived validator key for fingerprint {fingerprint}");
        GeneratedWallet {
            seed_phrase: seed_phrase.clone(),
            validator_key,
            validator_public_key,
            fingerprint,
            first_address: self.address_for_root(&root, 0),
        }
    }

    /// The hardened validator key at `m/12381'/8444'/7'/0'`.
    pub fn validator_key(&self, seed_phrase: &SeedPhrase) -> PrivateKey {
        derive_path(&root_key(seed_phrase), &DerivationPath::validator())
    }

    /// The unhardened wallet key at `m/12381/8444/2/{index}`.
    pub fn wallet_key(&self, seed_phrase: &SeedPhrase, index: u32) -> PrivateKey {
        derive_path(&root_key(seed_phrase), &DerivationPath::wallet(index))
    }

    /// The receive address of the wallet key at `index`.
    pub fn wallet_address(&self, seed_phrase: &SeedPhrase, index: u32) -> Address {
        self.address_for_root(&root_key(seed_phrase), index)
    }

    /// Addresses for `count` consecutive wallet indices starting at `start`.
    ///
    /// The run stops after index `u32::MAX`. The root key is only computed once.
    pub fn wallet_addresses(&self, seed_phrase: &SeedPhrase, start: u32, count: u32) -> Vec<Address> {
        let root = root_key(seed_phrase);
        (0..count)
            .map_while(|offset| start.checked_add(offset))
            .map(|index| self.address_for_root(&root, index))
            .collect()
    }

    pub fn farmer_key(&self, seed_phrase: &SeedPhrase) -> PrivateKey {
        derive_path(&root_key(seed_phrase), &DerivationPath::farmer())
    }

    pub fn pool_key(&self, seed_phrase: &SeedPhrase) -> PrivateKey {
        derive_path(&root_key(seed_phrase), &DerivationPath::pool())
    }

    fn address_for_root(&self, root: &PrivateKey, index: u32) -> Address {
        let path = DerivationPath::wallet(index);
        let public_key = public_key_of(&derive_path(root, &path));
        let synthetic = synthetic_key(&public_key, &DEFAULT_HIDDEN_PUZZLE_HASH);
        let address = encode_address(puzzle_hash(&synthetic), self.prefix);
        tracing::debug!("Derived {address} at {path}");
        address
    }
}

fn root_key(seed_phrase: &SeedPhrase) -> PrivateKey {
    seed_to_root_key(&seed_phrase.to_seed(""))
}
