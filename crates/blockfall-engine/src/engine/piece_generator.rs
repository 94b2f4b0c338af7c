use std::{collections::VecDeque, fmt::Write as _};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{Piece, PieceKind};

/// How the next piece kind is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorPolicy {
    /// Every draw picks one of the seven kinds with equal probability,
    /// independently of earlier draws.
    #[default]
    Uniform,
    /// Draws walk through a shuffled bag holding each kind once; a new bag is
    /// shuffled when the previous one is exhausted.
    SevenBag,
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the PCG generator behind [`PieceGenerator`]. The same
/// seed and policy always yield the same piece sequence. Serialized as a
/// 32-character hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Builds a seed from an integer, convenient for command-line use.
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex seed: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex seed: {hex_str} ({e})")))?;
        Ok(Self::from_u128(num))
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Supplies the sequence of pieces for a game.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GeneratorPolicy, PieceGenerator, PieceSeed};
///
/// let seed = PieceSeed::from_u128(42);
/// let mut a = PieceGenerator::with_seed(GeneratorPolicy::SevenBag, seed);
/// let mut b = PieceGenerator::with_seed(GeneratorPolicy::SevenBag, seed);
///
/// for _ in 0..14 {
///     assert_eq!(a.next_kind(), b.next_kind());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    policy: GeneratorPolicy,
    rng: Pcg32,
    bag: VecDeque<PieceKind>,
}

impl PieceGenerator {
    /// Creates a generator seeded from the thread-local RNG.
    #[must_use]
    pub fn new(policy: GeneratorPolicy) -> Self {
        Self::with_seed(policy, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for a reproducible sequence.
    #[must_use]
    pub fn with_seed(policy: GeneratorPolicy, seed: PieceSeed) -> Self {
        Self {
            policy,
            rng: Pcg32::from_seed(seed.0),
            bag: VecDeque::with_capacity(PieceKind::LEN),
        }
    }

    /// Draws the next piece kind.
    pub fn next_kind(&mut self) -> PieceKind {
        match self.policy {
            GeneratorPolicy::Uniform => self.rng.random(),
            GeneratorPolicy::SevenBag => {
                if self.bag.is_empty() {
                    let mut new_bag = PieceKind::ALL;
                    new_bag.shuffle(&mut self.rng);
                    self.bag.extend(new_bag);
                }
                self.bag
                    .pop_front()
                    .unwrap_or_else(|| self.rng.random())
            }
        }
    }

    /// Draws the next piece in its spawn orientation.
    pub fn next_piece(&mut self) -> Piece {
        Piece::new(self.next_kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod piece_seed_serialization {
        use super::*;

        #[test]
        fn test_format_is_32_char_hex_string() {
            let seed: PieceSeed = rand::rng().random();
            let serialized = serde_json::to_string(&seed).unwrap();
            let hex_str = serialized.trim_matches('"');

            assert_eq!(hex_str.len(), 32);
            assert!(hex_str.chars().all(|c| c.is_ascii_hexdigit()));
        }

        #[test]
        fn test_known_value_sequential_bytes() {
            let seed = PieceSeed::from_bytes([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");

            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, seed);
        }

        #[test]
        fn test_from_u128_matches_hex() {
            let seed = PieceSeed::from_u128(0x2a);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0000000000000000000000000000002a\"");
        }

        #[test]
        fn test_rejects_bad_input() {
            for json in [
                "\"\"",
                "\"0123456789abcdef0123456789abcde\"",
                "\"0123456789abcdef0123456789abcdef0\"",
                "\"ghijklmnopqrstuvwxyzghijklmnopqr\"",
            ] {
                let err = serde_json::from_str::<PieceSeed>(json).unwrap_err();
                assert!(err.to_string().contains("invalid hex seed"), "{json}");
            }
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let seed = PieceSeed::from_u128(0x1234_5678_9abc_def0);
        for policy in [GeneratorPolicy::Uniform, GeneratorPolicy::SevenBag] {
            let mut a = PieceGenerator::with_seed(policy, seed);
            let mut b = PieceGenerator::with_seed(policy, seed);
            for _ in 0..50 {
                assert_eq!(a.next_kind(), b.next_kind());
            }
        }
    }

    #[test]
    fn test_seven_bag_deals_each_kind_once_per_bag() {
        let mut generator =
            PieceGenerator::with_seed(GeneratorPolicy::SevenBag, PieceSeed::from_u128(7));
        for _ in 0..10 {
            let mut bag: Vec<PieceKind> = (0..PieceKind::LEN).map(|_| generator.next_kind()).collect();
            bag.sort_by_key(|kind| *kind as u8);
            assert_eq!(bag, PieceKind::ALL);
        }
    }

    #[test]
    fn test_uniform_produces_every_kind() {
        let mut generator =
            PieceGenerator::with_seed(GeneratorPolicy::Uniform, PieceSeed::from_u128(99));
        let mut seen = [false; PieceKind::LEN];
        for _ in 0..1000 {
            seen[generator.next_kind() as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_next_piece_is_in_spawn_orientation() {
        let mut generator = PieceGenerator::new(GeneratorPolicy::Uniform);
        let piece = generator.next_piece();
        assert_eq!(piece.shape(), &piece.kind().shape());
    }
}
