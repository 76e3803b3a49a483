//! Prefix framing and the outer loop that grows the extension until a hit.

use crate::engine::Engine;
use crate::error::Error;
use crate::kernel::State;
use crate::predicate::MaskPredicate;
use crate::work::{Work, WINDOW_LIMIT};

/// Words per MD5 block.
const BLOCK_WORDS: usize = 16;

/// Pack raw bytes into little-endian 32-bit words.
///
/// A tail that is not word-aligned occupies the low bytes of the final word;
/// the remaining high bytes are zero. The search extends messages in whole
/// words, so this padding becomes part of the message.
///
/// ```
/// assert_eq!(md5rush::frame::bytes_to_words(b"abcde"), [0x64636261, 0x65]);
/// ```
pub fn bytes_to_words(bytes: &[u8]) -> Vec<u32> {
    let mut words = vec![0u32; bytes.len().div_ceil(4)];
    for (i, &byte) in bytes.iter().enumerate() {
        words[i / 4] |= u32::from(byte) << (i % 4 * 8);
    }
    words
}

/// Serialize words back to bytes, low byte of word 0 first.
pub fn words_to_bytes(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_le_bytes()).collect()
}

/// Lay out the trailing block around the mutable window: zeroed window,
/// 0x80 padding marker, zero fill, 64-bit message bit length.
fn prepare_trailing_block(block: &mut [u32; 16], begin: usize, end: usize, nbits: u64) {
    block[begin..end].fill(0);
    block[end] = 0x0000_0080;
    block[end + 1..14].fill(0);
    block[14] = nbits as u32;
    block[15] = (nbits >> 32) as u32;
}

/// Extend `prefix` in place with words whose MD5 the predicate accepts.
///
/// Tries extensions of 1, 2, … words over the current trailing block; when
/// none fits, pads the prefix to the next block boundary with zero words and
/// continues there, so the extension grows monotonically. Returns the total
/// number of candidates hashed.
///
/// Termination is probabilistic: the search runs until a hit, and the caller
/// decides how many zero nibbles are worth waiting for.
pub fn hunt<P: MaskPredicate>(
    prefix: &mut Vec<u32>,
    engine: &Engine,
    pred: P,
    progress: &mut impl FnMut(u64),
) -> Result<u64, Error> {
    let mut state = State::default();
    for block in prefix.chunks_exact(BLOCK_WORDS) {
        state = state.update(block.try_into().unwrap());
    }

    let mut count = 0;
    loop {
        let carry = prefix.len() % BLOCK_WORDS;
        if carry < WINDOW_LIMIT {
            let mut template = [0u32; 16];
            template[..carry].copy_from_slice(&prefix[prefix.len() - carry..]);

            for extra in 1..=(WINDOW_LIMIT - carry) {
                let nbits = (prefix.len() + extra) as u64 * 32;
                prepare_trailing_block(&mut template, carry, carry + extra, nbits);
                let work = Work::new(u64::MAX, carry, carry + extra, template, state, pred)?;

                let outcome = engine.search(work, progress);
                count += outcome.count;
                if let Some(block) = outcome.block {
                    prefix.extend_from_slice(&block[carry..carry + extra]);
                    return Ok(count);
                }
            }
        }

        // Nothing fits at any width: absorb an empty block and retry.
        let padded = prefix.len() / BLOCK_WORDS * BLOCK_WORDS + BLOCK_WORDS;
        prefix.resize(padded, 0);
        let last = prefix.len() - BLOCK_WORDS;
        state = state.update(prefix[last..].try_into().unwrap());
    }
}
