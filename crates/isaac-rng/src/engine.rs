//! Uniform random bit generator adapter
//!
//! [`IsaacEngine`] wraps the [`Isaac`] core behind the interfaces most code
//! consumes: `rand::RngCore`/`SeedableRng`, an infinite iterator of words,
//! and fixed output bounds of `0..=u32::MAX`.

use rand::{Error, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::entropy::EntropySource;
use crate::isaac::Isaac;

/// ISAAC engine producing uniformly distributed `u32` values
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IsaacEngine {
    prng: Isaac,
}

impl IsaacEngine {
    /// Smallest value the engine produces
    pub const MIN: u32 = 0;
    /// Largest value the engine produces
    pub const MAX: u32 = u32::MAX;

    /// Create an engine seeded with zeros.
    pub fn new() -> Self {
        Self { prng: Isaac::new() }
    }

    /// Create an engine from 256 draws of an entropy source.
    pub fn from_entropy_source<E: EntropySource + ?Sized>(source: &mut E) -> Self {
        Self {
            prng: Isaac::from_entropy(source),
        }
    }

    /// Create an engine from seed words.
    pub fn from_words(words: &[u32]) -> Self {
        Self {
            prng: Isaac::from_words(words),
        }
    }

    /// Create an engine from seed bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            prng: Isaac::from_bytes(bytes),
        }
    }

    /// Create an engine from the bytes of a string.
    pub fn from_str_seed(seed: &str) -> Self {
        Self::from_bytes(seed.as_bytes())
    }

    /// Reseed with zeros.
    pub fn seed(&mut self) {
        self.prng.reseed_zero();
    }

    /// Reseed from an entropy source.
    pub fn seed_entropy<E: EntropySource + ?Sized>(&mut self, source: &mut E) {
        self.prng.reseed_entropy(source);
    }

    /// Reseed from words.
    pub fn seed_words(&mut self, words: &[u32]) {
        self.prng.reseed_words(words);
    }

    /// Reseed from bytes.
    pub fn seed_bytes(&mut self, bytes: &[u8]) {
        self.prng.reseed_bytes(bytes);
    }

    /// Reseed from the bytes of a string.
    pub fn seed_str(&mut self, seed: &str) {
        self.prng.reseed_bytes(seed.as_bytes());
    }

    /// Produce the next value.
    #[inline]
    pub fn generate(&mut self) -> u32 {
        self.prng.next_u32()
    }

    /// Advance the engine by `n` values.
    pub fn discard(&mut self, n: u64) {
        self.prng.discard(n);
    }

    /// The wrapped generator.
    pub fn core(&self) -> &Isaac {
        &self.prng
    }

    /// Consume the engine, returning the wrapped generator.
    pub fn into_core(self) -> Isaac {
        self.prng
    }
}

impl From<Isaac> for IsaacEngine {
    fn from(prng: Isaac) -> Self {
        Self { prng }
    }
}

impl RngCore for IsaacEngine {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.prng.next_u32()
    }

    /// Two words, low half first.
    #[inline]
    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.prng.next_u32());
        let hi = u64::from(self.prng.next_u32());
        (hi << 32) | lo
    }

    /// Fills with little-endian words; a partial tail uses the low bytes.
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.prng.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for IsaacEngine {
    type Seed = [u8; 32];

    /// Byte seeding: the 32 bytes fill the first eight seed words.
    fn from_seed(seed: Self::Seed) -> Self {
        Self::from_bytes(&seed)
    }

    /// Seeds all 256 words from `rng`, one `next_u32` per word.
    fn from_rng<R: RngCore>(mut rng: R) -> Result<Self, Error> {
        Ok(Self::from_entropy_source(&mut rng))
    }
}

impl Iterator for IsaacEngine {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
