//! Seed normalization
//!
//! Every seed form ends up as exactly 256 words. Short seeds are zero
//! padded, long ones truncated; nothing here can fail.

use crate::entropy::EntropySource;
use crate::isaac::{RAND_SIZE, Words};

/// Number of seed bytes that fit in one block of words
pub const SEED_BYTES: usize = RAND_SIZE * 4;

/// An all-zero seed.
pub fn zeroed() -> Words {
    [0; RAND_SIZE]
}

/// Overlay up to 1024 bytes onto a zeroed seed.
///
/// Bytes land in each word in native byte order, so the seed block holds
/// exactly the bytes given. A trailing partial group fills the low-addressed
/// bytes of its word.
pub fn from_bytes(bytes: &[u8]) -> Words {
    let used = bytes.len().min(SEED_BYTES);
    if used < bytes.len() {
        log::debug!("isaac: seed truncated from {} to {} bytes", bytes.len(), used);
    }

    let mut seed = zeroed();
    for (word, chunk) in seed.iter_mut().zip(bytes[..used].chunks(4)) {
        let mut raw = [0u8; 4];
        raw[..chunk.len()].copy_from_slice(chunk);
        *word = u32::from_ne_bytes(raw);
    }
    seed
}

/// Copy up to 256 words onto a zeroed seed.
pub fn from_words(words: &[u32]) -> Words {
    let used = words.len().min(RAND_SIZE);
    if used < words.len() {
        log::debug!("isaac: seed truncated from {} to {} words", words.len(), used);
    }

    let mut seed = zeroed();
    seed[..used].copy_from_slice(&words[..used]);
    seed
}

/// Draw all 256 seed words, in order, from an entropy source.
pub fn from_entropy<E: EntropySource + ?Sized>(source: &mut E) -> Words {
    let mut seed = zeroed();
    for word in seed.iter_mut() {
        *word = source.next_word();
    }
    log::debug!("isaac: drew {} seed words from entropy source", RAND_SIZE);
    seed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_native_order() {
        let seed = from_bytes(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(seed[0], u32::from_ne_bytes([1, 2, 3, 4]));
        assert_eq!(seed[1], u32::from_ne_bytes([5, 6, 0, 0]));
        assert!(seed[2..].iter().all(|&w| w == 0));
    }

    #[test]
    fn test_bytes_truncated() {
        let long: Vec<u8> = (0..2000u32).map(|i| (i % 251) as u8).collect();
        assert_eq!(from_bytes(&long), from_bytes(&long[..SEED_BYTES]));

        let last = u32::from_ne_bytes([
            long[SEED_BYTES - 4],
            long[SEED_BYTES - 3],
            long[SEED_BYTES - 2],
            long[SEED_BYTES - 1],
        ]);
        assert_eq!(from_bytes(&long)[RAND_SIZE - 1], last);
    }

    #[test]
    fn test_empty_bytes_is_zero() {
        assert_eq!(from_bytes(&[]), zeroed());
    }

    #[test]
    fn test_words_padded_and_truncated() {
        let seed = from_words(&[0xDEADBEEF, 0xCABBAFEE, 0xA5A5A5A5]);
        assert_eq!(&seed[..3], &[0xDEADBEEF, 0xCABBAFEE, 0xA5A5A5A5]);
        assert!(seed[3..].iter().all(|&w| w == 0));

        let long: Vec<u32> = (0..300).collect();
        let seed = from_words(&long);
        assert_eq!(seed[255], 255);
        assert_eq!(seed.len(), RAND_SIZE);
    }

    #[test]
    fn test_entropy_draws_in_order() {
        let mut next = 0u32;
        let mut source = crate::entropy::from_fn(|| {
            next += 1;
            next
        });
        let seed = from_entropy(&mut source);
        assert_eq!(seed[0], 1);
        assert_eq!(seed[255], 256);
    }
}
