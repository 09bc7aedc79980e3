//! ISAAC generator state, seed expansion and block regeneration.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::entropy::EntropySource;
use crate::error::StateError;
use crate::seed;

/// Size of the ISAAC state arrays in bits (2^8 = 256)
pub const RAND_SIZE_LOG: usize = 8;
/// Number of words in the results block and in the memory table
pub const RAND_SIZE: usize = 1 << RAND_SIZE_LOG;

/// Fractional part of the golden ratio
const GOLDEN_RATIO: u32 = 0x9e37_79b9;

/// One block of ISAAC words (results, memory, or a normalized seed)
pub type Words = [u32; RAND_SIZE];

/// ISAAC random number generator context
///
/// Construction always seeds; there is no unseeded state. Equality compares
/// every field, the memory table included.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IsaacSnapshot", into = "IsaacSnapshot")]
pub struct Isaac {
    /// Results buffer, consumed from the end
    pub(crate) results: Words,
    /// Internal permutation table
    pub(crate) memory: Words,
    /// Accumulator
    pub(crate) a: u32,
    /// Previous result
    pub(crate) b: u32,
    /// Counter, bumped once per regeneration cycle
    pub(crate) c: u32,
    /// Number of results remaining (counts down from 256)
    pub(crate) cursor: usize,
}

impl fmt::Debug for Isaac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Isaac")
            .field("a", &format_args!("{:08x}", self.a))
            .field("b", &format_args!("{:08x}", self.b))
            .field("c", &format_args!("{:08x}", self.c))
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl Isaac {
    /// Create a generator seeded with 256 zero words.
    pub fn new() -> Self {
        Self::seeded(seed::zeroed())
    }

    /// Create a generator from raw seed bytes (at most 1024 are used).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::seeded(seed::from_bytes(bytes))
    }

    /// Create a generator from seed words (at most 256 are used).
    pub fn from_words(words: &[u32]) -> Self {
        Self::seeded(seed::from_words(words))
    }

    /// Create a generator from 256 draws of an entropy source.
    pub fn from_entropy<E: EntropySource + ?Sized>(source: &mut E) -> Self {
        Self::seeded(seed::from_entropy(source))
    }

    /// Create a generator seeded from the operating system.
    #[cfg(feature = "std")]
    pub fn from_os_entropy() -> Self {
        Self::from_entropy(&mut rand::rngs::OsRng)
    }

    fn seeded(seed: Words) -> Self {
        let mut ctx = Self {
            results: seed,
            memory: [0; RAND_SIZE],
            a: 0,
            b: 0,
            c: 0,
            cursor: 0,
        };
        ctx.init();
        ctx
    }

    /// Reseed with 256 zero words.
    pub fn reseed_zero(&mut self) {
        self.results = seed::zeroed();
        self.init();
    }

    /// Reseed from raw bytes.
    pub fn reseed_bytes(&mut self, bytes: &[u8]) {
        self.results = seed::from_bytes(bytes);
        self.init();
    }

    /// Reseed from words.
    pub fn reseed_words(&mut self, words: &[u32]) {
        self.results = seed::from_words(words);
        self.init();
    }

    /// Reseed from 256 draws of an entropy source.
    pub fn reseed_entropy<E: EntropySource + ?Sized>(&mut self, source: &mut E) {
        self.results = seed::from_entropy(source);
        self.init();
    }

    /// Rebuild a generator from its raw parts, checking the cursor range.
    pub(crate) fn from_parts(
        a: u32,
        b: u32,
        c: u32,
        cursor: usize,
        results: Words,
        memory: Words,
    ) -> Result<Self, StateError> {
        if cursor > RAND_SIZE {
            return Err(StateError::CursorOutOfRange(cursor));
        }
        Ok(Self {
            results,
            memory,
            a,
            b,
            c,
            cursor,
        })
    }

    /// Expand the seed held in `results` into the full state (randinit).
    fn init(&mut self) {
        self.a = 0;
        self.b = 0;
        self.c = 0;

        let mut x = [GOLDEN_RATIO; 8];

        // Scramble the accumulators before they see any seed material
        for _ in 0..4 {
            Self::mix(&mut x);
        }

        // Fill memory from the seed
        for i in (0..RAND_SIZE).step_by(8) {
            for (acc, word) in x.iter_mut().zip(&self.results[i..i + 8]) {
                *acc = acc.wrapping_add(*word);
            }
            Self::mix(&mut x);
            self.memory[i..i + 8].copy_from_slice(&x);
        }

        // Second pass so every seed word affects all of memory
        for i in (0..RAND_SIZE).step_by(8) {
            for (acc, word) in x.iter_mut().zip(&self.memory[i..i + 8]) {
                *acc = acc.wrapping_add(*word);
            }
            Self::mix(&mut x);
            self.memory[i..i + 8].copy_from_slice(&x);
        }

        self.regenerate();
        self.cursor = RAND_SIZE;
    }

    /// Eight-accumulator diffusion step.
    ///
    /// Accumulator `i` absorbs a shifted copy of `i + 1`, feeds `i + 3`, and
    /// `i + 1` absorbs `i + 2`. Shifts alternate left and right.
    fn mix(x: &mut [u32; 8]) {
        const SHIFT: [u32; 8] = [11, 2, 8, 16, 10, 4, 8, 9];

        for i in (0..8).step_by(2) {
            x[i] ^= x[(i + 1) & 7] << SHIFT[i];
            x[(i + 3) & 7] = x[(i + 3) & 7].wrapping_add(x[i]);
            x[(i + 1) & 7] = x[(i + 1) & 7].wrapping_add(x[(i + 2) & 7]);

            let i = i + 1;
            x[i] ^= x[(i + 1) & 7] >> SHIFT[i];
            x[(i + 3) & 7] = x[(i + 3) & 7].wrapping_add(x[i]);
            x[(i + 1) & 7] = x[(i + 1) & 7].wrapping_add(x[(i + 2) & 7]);
        }
    }

    /// Memory index selected by bits 2..10 of `x`
    #[inline]
    fn ind(x: u32) -> usize {
        (x >> 2) as usize & (RAND_SIZE - 1)
    }

    /// One ISAAC step on `memory[i]`, paired with `memory[paired]`.
    #[inline]
    fn step(&mut self, i: usize, paired: usize, mixed: u32, a: &mut u32, b: &mut u32) {
        let x = self.memory[i];
        *a = mixed.wrapping_add(self.memory[paired]);
        let y = self.memory[Self::ind(x)].wrapping_add(*a).wrapping_add(*b);
        self.memory[i] = y;
        *b = self.memory[Self::ind(y >> RAND_SIZE_LOG)].wrapping_add(x);
        self.results[i] = *b;
    }

    /// Generate 256 new results and stir the memory table.
    ///
    /// This runs a full cycle regardless of how many buffered results are
    /// left and does not touch the cursor.
    pub fn regenerate(&mut self) {
        const HALF: usize = RAND_SIZE / 2;

        self.c = self.c.wrapping_add(1);
        let mut a = self.a;
        let mut b = self.b.wrapping_add(self.c);
        log::trace!("isaac: regeneration cycle {}", self.c);

        // First half, paired with the second half
        for i in (0..HALF).step_by(4) {
            self.step(i, i + HALF, a ^ (a << 13), &mut a, &mut b);
            self.step(i + 1, i + 1 + HALF, a ^ (a >> 6), &mut a, &mut b);
            self.step(i + 2, i + 2 + HALF, a ^ (a << 2), &mut a, &mut b);
            self.step(i + 3, i + 3 + HALF, a ^ (a >> 16), &mut a, &mut b);
        }

        // Second half, paired with the freshly written first half
        for i in (HALF..RAND_SIZE).step_by(4) {
            self.step(i, i - HALF, a ^ (a << 13), &mut a, &mut b);
            self.step(i + 1, i + 1 - HALF, a ^ (a >> 6), &mut a, &mut b);
            self.step(i + 2, i + 2 - HALF, a ^ (a << 2), &mut a, &mut b);
            self.step(i + 3, i + 3 - HALF, a ^ (a >> 16), &mut a, &mut b);
        }

        self.b = b;
        self.a = a;
    }

    /// Get the next random word.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        if self.cursor == 0 {
            self.regenerate();
            self.cursor = RAND_SIZE - 1;
        } else {
            self.cursor -= 1;
        }
        self.results[self.cursor]
    }

    /// Advance the generator by `n` outputs.
    pub fn discard(&mut self, n: u64) {
        for _ in 0..n {
            self.next_u32();
        }
    }

    /// Full structural equality, same as `==`.
    pub fn equals(&self, other: &Self) -> bool {
        self == other
    }

    /// The current results block, in array order.
    pub fn results(&self) -> &Words {
        &self.results
    }

    /// Number of buffered results not yet handed out.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of regeneration cycles since the last seeding.
    pub fn counter(&self) -> u32 {
        self.c
    }
}

impl Default for Isaac {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialized form of [`Isaac`]; validated on the way back in.
#[derive(Serialize, Deserialize)]
struct IsaacSnapshot {
    a: u32,
    b: u32,
    c: u32,
    cursor: usize,
    results: Vec<u32>,
    memory: Vec<u32>,
}

impl From<Isaac> for IsaacSnapshot {
    fn from(isaac: Isaac) -> Self {
        Self {
            a: isaac.a,
            b: isaac.b,
            c: isaac.c,
            cursor: isaac.cursor,
            results: isaac.results.to_vec(),
            memory: isaac.memory.to_vec(),
        }
    }
}

impl TryFrom<IsaacSnapshot> for Isaac {
    type Error = StateError;

    fn try_from(snapshot: IsaacSnapshot) -> Result<Self, Self::Error> {
        let results = words_from_vec("results", snapshot.results)?;
        let memory = words_from_vec("memory", snapshot.memory)?;
        Isaac::from_parts(
            snapshot.a,
            snapshot.b,
            snapshot.c,
            snapshot.cursor,
            results,
            memory,
        )
    }
}

fn words_from_vec(section: &'static str, words: Vec<u32>) -> Result<Words, StateError> {
    let found = words.len();
    Words::try_from(words).map_err(|_| {
        if found < RAND_SIZE {
            StateError::Incomplete {
                section,
                expected: RAND_SIZE,
                found,
            }
        } else {
            StateError::Oversized {
                section,
                expected: RAND_SIZE,
                found,
            }
        }
    })
}
