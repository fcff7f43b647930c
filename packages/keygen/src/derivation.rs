//! Derivation paths and the fixed Chia key purposes.

use std::fmt::Display;
use std::str::FromStr;

use crate::bls::PrivateKey;
use crate::error::KeyError;

/// BLS12-381 purpose code, per EIP-2334.
pub const BLS_SPEC_NUMBER: u32 = 12381;

/// Chia coin type.
pub const CHIA_BLOCKCHAIN_NUMBER: u32 = 8444;

/// The key purposes used by Chia wallets, the third path component.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum KeyPurpose {
    Farmer,
    Pool,
    Wallet,
    Validator,
}

impl KeyPurpose {
    pub const fn code(self) -> u32 {
        match self {
            KeyPurpose::Farmer => 0,
            KeyPurpose::Pool => 1,
            KeyPurpose::Wallet => 2,
            KeyPurpose::Validator => 7,
        }
    }
}

/// A derivation path: a sequence of child indices applied to a root key.
///
/// Unlike BIP-32, a hardened index is not offset by `2^31`. The hardened
/// flag only selects which derivation function is applied, and is rendered
/// with a trailing `'`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<DerivationPathComponent>);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DerivationPathComponent {
    pub value: u32,
    pub hardened: bool,
}

impl DerivationPath {
    /// A path where every component uses the same derivation mode.
    pub fn new(indices: &[u32], hardened: bool) -> Self {
        DerivationPath(
            indices
                .iter()
                .map(|&value| DerivationPathComponent { value, hardened })
                .collect(),
        )
    }

    /// `m/12381'/8444'/{purpose}'/{index}'` or its unhardened sibling.
    pub fn chia(purpose: KeyPurpose, index: u32, hardened: bool) -> Self {
        Self::new(
            &[
                BLS_SPEC_NUMBER,
                CHIA_BLOCKCHAIN_NUMBER,
                purpose.code(),
                index,
            ],
            hardened,
        )
    }

    /// The hardened validator key path, `[12381, 8444, 7, 0]`.
    pub fn validator() -> Self {
        Self::chia(KeyPurpose::Validator, 0, true)
    }

    /// The unhardened path for the wallet key at `index`.
    pub fn wallet(index: u32) -> Self {
        Self::chia(KeyPurpose::Wallet, index, false)
    }

    /// The hardened path for the wallet key at `index`.
    pub fn wallet_hardened(index: u32) -> Self {
        Self::chia(KeyPurpose::Wallet, index, true)
    }

    pub fn farmer() -> Self {
        Self::chia(KeyPurpose::Farmer, 0, true)
    }

    pub fn pool() -> Self {
        Self::chia(KeyPurpose::Pool, 0, true)
    }

    pub fn components(&self) -> &[DerivationPathComponent] {
        &self.0
    }

    /// Apply each step of this path to `root`, in order.
    pub fn derive(&self, root: &PrivateKey) -> PrivateKey {
        self.0
            .iter()
            .fold(root.clone(), |key, component| {
                if component.hardened {
                    key.derive_hardened(component.value)
                } else {
                    key.derive_unhardened(component.value)
                }
            })
    }
}

impl Display for DerivationPath {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "m")?;
        for component in &self.0 {
            write!(f, "/{component}")?
        }
        Ok(())
    }
}

impl Display for DerivationPathComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

impl FromStr for DerivationPath {
    type Err = KeyError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: String| KeyError::MalformedDerivationPath {
            path: path.to_owned(),
            reason,
        };
        let mut parts = path.split('/');
        if parts.next() != Some("m") {
            return Err(malformed("path must start with m".to_owned()));
        }
        parts
            .map(|part| {
                let (digits, hardened) = match part.strip_suffix('\'') {
                    Some(digits) => (digits, true),
                    None => (part, false),
                };
                digits
                    .parse()
                    .map(|value| DerivationPathComponent { value, hardened })
                    .map_err(|e| malformed(format!("invalid index {part:?}: {e}")))
            })
            .collect::<Result<_, _>>()
            .map(DerivationPath)
    }
}
