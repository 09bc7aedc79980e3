//! Entropy sources for seeding
//!
//! An entropy source is a capability handed to the seeding calls; nothing
//! in this crate reaches for a global source on its own.

use rand::RngCore;

/// Something that produces one 32-bit word per call.
pub trait EntropySource {
    /// Produce the next word.
    fn next_word(&mut self) -> u32;
}

impl<R: RngCore + ?Sized> EntropySource for R {
    #[inline]
    fn next_word(&mut self) -> u32 {
        self.next_u32()
    }
}

/// Entropy source backed by a closure
#[derive(Clone, Debug)]
pub struct FnEntropy<F>(F);

impl<F: FnMut() -> u32> EntropySource for FnEntropy<F> {
    #[inline]
    fn next_word(&mut self) -> u32 {
        (self.0)()
    }
}

/// Wrap a closure as an entropy source.
pub fn from_fn<F: FnMut() -> u32>(f: F) -> FnEntropy<F> {
    FnEntropy(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_rng_core_is_entropy() {
        let mut rng = StepRng::new(5, 1);
        assert_eq!(rng.next_word(), 5);
        assert_eq!(rng.next_word(), 6);
    }

    #[test]
    fn test_closure_entropy() {
        let mut source = from_fn(|| 0xA5A5_A5A5);
        assert_eq!(source.next_word(), 0xA5A5_A5A5);
    }

    #[test]
    fn test_dyn_source() {
        let mut rng = StepRng::new(9, 0);
        let source: &mut dyn EntropySource = &mut rng;
        assert_eq!(source.next_word(), 9);
    }
}
