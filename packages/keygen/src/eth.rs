//! Flat random secp256k1 accounts with Ethereum style addresses.

use std::fmt::{Debug, Display};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::{All, PublicKey, Secp256k1, SecretKey};
use tiny_keccak::{Hasher, Keccak};

use crate::error::KeyError;

/// Holds the secp256k1 context used to create accounts.
#[derive(Clone, Debug)]
pub struct EthKeyGenerator {
    secp: Secp256k1<All>,
}

impl Default for EthKeyGenerator {
    fn default() -> Self {
        EthKeyGenerator {
            secp: Secp256k1::new(),
        }
    }
}

impl EthKeyGenerator {
    pub fn new(secp: Secp256k1<All>) -> Self {
        EthKeyGenerator { secp }
    }

    /// Generate a fresh account from the operating system's randomness.
    ///
    /// Byte strings outside of the curve order are discarded and redrawn.
    pub fn generate(&self) -> Result<EthAccount, KeyError> {
        let mut bytes = [0u8; 32];
        loop {
            OsRng
                .try_fill_bytes(&mut bytes)
                .map_err(|source| KeyError::RandomnessUnavailable {
                    source: Arc::new(source),
                })?;
            match SecretKey::from_byte_array(&bytes) {
                Ok(secret_key) => break Ok(self.account(secret_key)),
                Err(_) => tracing::debug!("Redrawing out of range secp256k1 scalar"),
            }
        }
    }

    /// Load an account from a hex encoded private key, with or without `0x`.
    pub fn from_private_key_hex(&self, s: &str) -> Result<EthAccount, KeyError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.strip_prefix("0x").unwrap_or(s), &mut bytes).map_err(|source| {
            KeyError::InvalidHex {
                input: s.to_owned(),
                source,
            }
        })?;
        SecretKey::from_byte_array(&bytes)
            .map(|secret_key| self.account(secret_key))
            .map_err(|source| KeyError::InvalidSecp256k1Key { source })
    }

    fn account(&self, secret_key: SecretKey) -> EthAccount {
        EthAccount {
            secret_key,
            public_key: PublicKey::from_secret_key(&self.secp, &secret_key),
        }
    }
}

fn global_generator() -> &'static EthKeyGenerator {
    static CELL: OnceCell<EthKeyGenerator> = OnceCell::new();
    CELL.get_or_init(EthKeyGenerator::default)
}

/// A secp256k1 key pair for an account based chain.
#[derive(Clone, PartialEq, Eq)]
pub struct EthAccount {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl EthAccount {
    /// Generate a random account using a lazily created shared context.
    pub fn generate() -> Result<Self, KeyError> {
        global_generator().generate()
    }

    pub fn from_private_key_hex(s: &str) -> Result<Self, KeyError> {
        global_generator().from_private_key_hex(s)
    }

    /// `0x` followed by the 32 byte private key.
    ///
    /// Note that this should be considered security-sensitive content.
    pub fn private_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.secret_key.secret_bytes()))
    }

    /// `0x` followed by the 64 byte uncompressed public key, without the `04` tag.
    pub fn public_key_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.public_key.serialize_uncompressed()[1..]))
    }

    pub fn address(&self) -> EthAddress {
        EthAddress::from_public_key(&self.public_key.serialize_uncompressed())
    }
}

impl Debug for EthAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthAccount")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// A 20 byte account address. Displayed with the EIP-55 checksum.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EthAddress([u8; 20]);

impl EthAddress {
    fn from_public_key(public_key: &[u8; 65]) -> Self {
        assert_eq!(public_key[0], 4);
        let hash = keccak(&public_key[1..]);
        let mut output = [0u8; 20];
        output.copy_from_slice(&hash[12..]);
        EthAddress(output)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl From<[u8; 20]> for EthAddress {
    fn from(bytes: [u8; 20]) -> Self {
        EthAddress(bytes)
    }
}

impl Display for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lower = hex::encode(self.0);
        let hash = keccak(lower.as_bytes());
        f.write_str("0x")?;
        for (idx, c) in lower.chars().enumerate() {
            let nibble = (hash[idx / 2] >> (if idx % 2 == 0 { 4 } else { 0 })) & 0x0f;
            if nibble >= 8 {
                write!(f, "{}", c.to_ascii_uppercase())?;
            } else {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl Debug for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EthAddress({self})")
    }
}

fn keccak(input: &[u8]) -> [u8; 32] {
    let mut sha3 = Keccak::v256();
    sha3.update(input);
    let mut output = [0; 32];
    sha3.finalize(&mut output);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    // https://www.geeksforgeeks.org/how-to-create-an-ethereum-wallet-address-from-a-private-key/
    #[test]
    fn test_ethereum_address() {
        const PRIVATE_KEY: &str =
            "4f3edf983ac986a65a342ce7c78d9ac076d3b113bce9c46f30d7d25171b32b1d";
        const PUBLIC_KEY: &str = "0xc1573f1528638ae14cbe04a74e6583c5562d59214223762c1a11121e24619cbc09d27a7a1cb989dd801cc028dd8225f8e2d2fd57d852b5bf697112f69b6229d1";
        const ADDRESS: &str = "0xAf3CD5c36B97E9c28c263dC4639c6d7d53303A13";

        let account = EthAccount::from_private_key_hex(PRIVATE_KEY).unwrap();
        assert_eq!(account.private_key_hex(), format!("0x{PRIVATE_KEY}"));
        assert_eq!(account.public_key_hex(), PUBLIC_KEY);
        assert_eq!(account.address().to_string(), ADDRESS);
    }

    #[test]
    fn test_ethereum_hashing() {
        // https://github.com/ethereumbook/ethereumbook/blob/develop/04keys-addresses.asciidoc
        const PRIVATE_KEY_STR: &str =
            "0xf8f8a2f43c8376ccb0871305060d7b27b0554d2cc72bccf41b2705608452f315";
        const PUBLIC_KEY_STR: &str = "0x6e145ccef1033dea239875dd00dfb4fee6e3348b84985c92f103444683bae07b83b5c38e5e2b0c8529d7fa3f64d46daa1ece2d9ac14cab9477d042c84c32ccd0";
        const PUBLIC_KEY_HASHED_STR: &str =
            "2a5bc342ed616b5ba5732269001d3f1ef827552ae1114027bd3ecf1f086ba0f9";

        let generator = EthKeyGenerator::new(Secp256k1::new());
        let account = generator.from_private_key_hex(PRIVATE_KEY_STR).unwrap();
        assert_eq!(account.public_key_hex(), PUBLIC_KEY_STR);

        let public_key = hex::decode(&PUBLIC_KEY_STR[2..]).unwrap();
        assert_eq!(PUBLIC_KEY_HASHED_STR, hex::encode(keccak(&public_key)));
        assert_eq!(
            &account.address().as_bytes()[..],
            &hex::decode(PUBLIC_KEY_HASHED_STR).unwrap()[12..]
        );
    }

    #[test]
    fn test_keccak() {
        let hash = keccak(&[]);
        assert_eq!(
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470",
            hex::encode(hash)
        );
    }

    #[test]
    fn eip55_checksums() {
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let mut bytes = [0u8; 20];
            hex::decode_to_slice(&expected[2..].to_lowercase(), &mut bytes).unwrap();
            assert_eq!(EthAddress::from(bytes).to_string(), expected);
        }
    }

    #[test]
    fn test_gen_priv_key() {
        let account = EthAccount::generate().unwrap();
        assert_eq!(account.private_key_hex().len(), 66);
        assert_eq!(account.public_key_hex().len(), 130);
        assert_eq!(account.address().to_string().len(), 42);

        let reloaded = EthAccount::from_private_key_hex(&account.private_key_hex()).unwrap();
        assert_eq!(reloaded, account);
        assert_ne!(EthAccount::generate().unwrap(), account);
    }

    #[test]
    fn rejects_invalid_private_keys() {
        match EthAccount::from_private_key_hex(&"00".repeat(32)) {
            Err(KeyError::InvalidSecp256k1Key { .. }) => (),
            other => panic!("Unexpected result {other:?}"),
        }
        match EthAccount::from_private_key_hex("0x1234") {
            Err(KeyError::InvalidHex { .. }) => (),
            other => panic!("Unexpected result {other:?}"),
        }
    }
}
