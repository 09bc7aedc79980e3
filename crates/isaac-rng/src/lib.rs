//! ISAAC random number generator
//!
//! A port of Bob Jenkins' 32-bit ISAAC ("Indirection, Shift, Accumulate,
//! Add, and Count"). The generator keeps a 256-word permutation table and
//! produces its output in blocks of 256 words, handed out from the end of
//! the block towards the start.
//!
//! ISAAC was designed with cryptography in mind but has not been certified
//! as a CSPRNG. Use it where a fast, seedable, reproducible stream is needed.
//!
//! ```
//! use isaac_rng::Isaac;
//!
//! let mut rng = Isaac::new();
//! assert_eq!(rng.next_u32(), 0x182600f3);
//! ```

pub mod engine;
pub mod entropy;
pub mod error;
pub mod isaac;
pub mod seed;
mod text;

pub use engine::IsaacEngine;
pub use entropy::{EntropySource, FnEntropy};
pub use error::StateError;
pub use isaac::{Isaac, Words, RAND_SIZE, RAND_SIZE_LOG};
pub use seed::SEED_BYTES;
