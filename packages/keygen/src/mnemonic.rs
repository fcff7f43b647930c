use std::fmt::Debug;
use std::str::FromStr;
use std::sync::Arc;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::bls::PrivateKey;
use crate::error::KeyError;

/// Number of entropy bytes behind a freshly generated 12 word phrase.
pub const ENTROPY_SIZE: usize = 16;

/// Random bytes used to produce a [SeedPhrase].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Entropy([u8; ENTROPY_SIZE]);

impl Entropy {
    /// Draw fresh entropy from the operating system's secure random source.
    pub fn generate() -> Result<Self, KeyError> {
        let mut entropy = [0u8; ENTROPY_SIZE];
        OsRng
            .try_fill_bytes(&mut entropy)
            .map_err(|source| KeyError::RandomnessUnavailable {
                source: Arc::new(source),
            })?;
        Ok(Entropy(entropy))
    }

    /// The raw bytes.
    ///
    /// Note that this should be considered security-sensitive content.
    pub fn as_bytes(&self) -> &[u8; ENTROPY_SIZE] {
        &self.0
    }
}

impl From<[u8; ENTROPY_SIZE]> for Entropy {
    fn from(bytes: [u8; ENTROPY_SIZE]) -> Self {
        Entropy(bytes)
    }
}

impl TryFrom<&[u8]> for Entropy {
    type Error = KeyError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        bytes
            .try_into()
            .map(Entropy)
            .map_err(|_| KeyError::InvalidEntropy {
                expected: ENTROPY_SIZE,
                actual: bytes.len(),
            })
    }
}

impl Debug for Entropy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Entropy(..)")
    }
}

/// The 64 byte output of the BIP-39 key stretching function.
#[derive(Clone)]
pub struct Seed([u8; 64]);

impl Seed {
    /// The raw bytes.
    ///
    /// Note that this should be considered security-sensitive content.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Generate the root BLS key for this seed.
    pub fn root_key(&self) -> PrivateKey {
        PrivateKey::from_bip39_seed(&self.0)
    }
}

impl Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Seed(..)")
    }
}

/// A BIP-39 seed phrase using the English wordlist.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedPhrase {
    /// The mnemonic seed phrase itself, used for deriving private keys.
    pub mnemonic: bip39::Mnemonic,
}

impl SeedPhrase {
    /// Generate a random 12 word [SeedPhrase].
    pub fn random() -> Result<SeedPhrase, KeyError> {
        Entropy::generate().map(SeedPhrase::from_entropy)
    }

    /// Encode entropy as words, appending the BIP-39 checksum.
    pub fn from_entropy(entropy: Entropy) -> SeedPhrase {
        match bip39::Mnemonic::from_entropy(&entropy.0) {
            Ok(mnemonic) => SeedPhrase { mnemonic },
            Err(e) => panic!("16 bytes is always valid BIP-39 entropy: {e}"),
        }
    }

    /// Recover the entropy this phrase encodes.
    pub fn to_entropy(&self) -> Vec<u8> {
        self.mnemonic.to_entropy()
    }

    /// Generate the seed phrase itself.
    ///
    /// Note that this should be considered security-sensitive content.
    pub fn phrase(&self) -> String {
        self.mnemonic.words().collect::<Vec<_>>().join(" ")
    }

    /// Stretch the phrase and passphrase into a [Seed].
    pub fn to_seed(&self, passphrase: &str) -> Seed {
        Seed(self.mnemonic.to_seed(passphrase))
    }
}

impl From<bip39::Mnemonic> for SeedPhrase {
    fn from(mnemonic: bip39::Mnemonic) -> Self {
        SeedPhrase { mnemonic }
    }
}

impl FromStr for SeedPhrase {
    type Err = KeyError;

    fn from_str(phrase: &str) -> Result<Self, Self::Err> {
        let mnemonic = bip39::Mnemonic::parse_in(bip39::Language::English, phrase)
            .map_err(|source| KeyError::InvalidMnemonic { source })?;
        Ok(SeedPhrase { mnemonic })
    }
}

impl Debug for SeedPhrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SeedPhrase({} words)", self.mnemonic.word_count())
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::Arbitrary;

    use super::*;

    const ABANDON_PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    impl Arbitrary for Entropy {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let mut entropy = [0u8; ENTROPY_SIZE];
            for byte in &mut entropy {
                *byte = u8::arbitrary(g);
            }
            Entropy(entropy)
        }
    }

    quickcheck::quickcheck! {
        fn roundtrip_entropy(entropy: Entropy) -> bool {
            let phrase = SeedPhrase::from_entropy(entropy);
            let reparsed: SeedPhrase = phrase.phrase().parse().unwrap();
            assert_eq!(phrase, reparsed);
            reparsed.to_entropy() == entropy.as_bytes()
        }
    }

    #[test]
    fn zero_entropy_phrase() {
        let phrase = SeedPhrase::from_entropy(Entropy::from([0u8; ENTROPY_SIZE]));
        assert_eq!(phrase.phrase(), ABANDON_PHRASE);
    }

    #[test]
    fn bip39_seed_vector() {
        let phrase: SeedPhrase = ABANDON_PHRASE.parse().unwrap();
        assert_eq!(
            hex::encode(phrase.to_seed("").as_bytes()),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
        assert_ne!(
            phrase.to_seed("TREZOR").as_bytes(),
            phrase.to_seed("").as_bytes()
        );
    }

    #[test]
    fn entropy_is_unique() {
        // Statistical: a collision here means the randomness source is broken.
        let a = Entropy::generate().unwrap();
        let b = Entropy::generate().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn entropy_from_slice() {
        Entropy::try_from(&[1u8; 16][..]).unwrap();
        match Entropy::try_from(&[1u8; 32][..]) {
            Err(KeyError::InvalidEntropy {
                expected: 16,
                actual: 32,
            }) => (),
            other => panic!("Unexpected result {other:?}"),
        }
    }

    #[test]
    fn single_word_mutation_fails_checksum() {
        let words: Vec<&str> = ABANDON_PHRASE.split(' ').collect();
        let mut rejected = 0;
        for idx in 0..words.len() {
            let mut mutated = words.clone();
            mutated[idx] = if words[idx] == "zoo" { "zone" } else { "zoo" };
            if mutated.join(" ").parse::<SeedPhrase>().is_err() {
                rejected += 1;
            }
        }
        // A 4 bit checksum lets roughly one in sixteen mutations through.
        assert!(rejected >= words.len() - 2, "only {rejected} rejected");
    }

    #[test]
    fn unknown_word_rejected() {
        let phrase = ABANDON_PHRASE.replace("about", "aboot");
        match phrase.parse::<SeedPhrase>() {
            Err(KeyError::InvalidMnemonic {
                source: bip39::Error::UnknownWord(11),
            }) => (),
            other => panic!("Unexpected result {other:?}"),
        }
    }
}
