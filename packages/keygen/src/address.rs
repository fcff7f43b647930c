use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

use bech32::{primitives::decode::CheckedHrpstring, Bech32m, Hrp};
use serde::de::Visitor;

use crate::{error::AddressError, puzzle::PuzzleHash};

/// The human-readable part (HRP) of an address, e.g. `xch` or `txch`.
///
/// Always stored in lower case.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct AddressPrefix(Hrp);

impl AddressPrefix {
    /// Mainnet prefix.
    pub const MAINNET: &'static str = "xch";
    /// Testnet prefix.
    pub const TESTNET: &'static str = "txch";

    /// Generate a new value from a [String]-like value.
    pub fn new(s: impl AsRef<str>) -> Result<Self, AddressError> {
        let s = s.as_ref();
        Hrp::parse(&s.to_ascii_lowercase())
            .map(AddressPrefix)
            .map_err(|_| AddressError::InvalidPrefix { prefix: s.to_owned() })
    }

    /// The mainnet prefix, `xch`.
    pub fn mainnet() -> Self {
        AddressPrefix(Hrp::parse_unchecked(Self::MAINNET))
    }

    /// The testnet prefix, `txch`.
    pub fn testnet() -> Self {
        AddressPrefix(Hrp::parse_unchecked(Self::TESTNET))
    }

    /// Get the raw string prefix
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for AddressPrefix {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl FromStr for AddressPrefix {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AddressPrefix::new(s)
    }
}

impl Display for AddressPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for AddressPrefix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for AddressPrefix {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(AddressPrefixVisitor)
    }
}

struct AddressPrefixVisitor;

impl Visitor<'_> for AddressPrefixVisitor {
    type Value = AddressPrefix;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("AddressPrefix")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        v.parse::<AddressPrefix>()
            .map_err(|e| E::custom(e.to_string()))
    }
}

/// A bech32m encoded address for a [PuzzleHash].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    puzzle_hash: PuzzleHash,
    prefix: AddressPrefix,
}

impl Address {
    /// Pair a puzzle hash with the network's prefix.
    pub fn new(puzzle_hash: PuzzleHash, prefix: AddressPrefix) -> Self {
        Address {
            puzzle_hash,
            prefix,
        }
    }

    /// Get the puzzle hash this address encodes.
    pub fn puzzle_hash(self) -> PuzzleHash {
        self.puzzle_hash
    }

    /// Get the prefix for this address.
    pub fn prefix(self) -> AddressPrefix {
        self.prefix
    }
}

impl Display for Address {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        bech32::encode_to_fmt::<Bech32m, _>(fmt, self.prefix.0, self.puzzle_hash.as_ref())
            .map_err(|_| std::fmt::Error)
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{self}\"")
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl FromStr for Address {
    type Err = AddressError;

    /// Only bech32m checksums are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let checked = CheckedHrpstring::new::<Bech32m>(s).map_err(|source| {
            AddressError::InvalidBech32m {
                address: s.to_owned(),
                source,
            }
        })?;
        let data = checked.byte_iter().collect::<Vec<u8>>();
        let puzzle_hash: [u8; 32] =
            data.as_slice()
                .try_into()
                .map_err(|_| AddressError::InvalidByteCount {
                    address: s.to_owned(),
                    actual: data.len(),
                })?;
        Ok(Address {
            puzzle_hash: puzzle_hash.into(),
            prefix: AddressPrefix::new(checked.hrp().as_str())?,
        })
    }
}

impl serde::Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(AddressVisitor)
    }
}

struct AddressVisitor;

impl Visitor<'_> for AddressVisitor {
    type Value = Address;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("bech32m address")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        v.parse().map_err(|e| E::custom(e))
    }
}
