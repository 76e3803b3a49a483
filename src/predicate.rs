//! Acceptance tests evaluated on post-compression MD5 states.

use crate::error::Error;
use crate::kernel::State;

/// Masks selecting the first `k` hex nibbles of one little-endian digest
/// word, `k` in 0..8. The first printed nibble is the high nibble of the
/// word's low byte.
const NIBBLE_MASKS: [u32; 8] = [
    0x0000_0000,
    0x0000_00f0,
    0x0000_00ff,
    0x0000_f0ff,
    0x0000_ffff,
    0x00f0_ffff,
    0x00ff_ffff,
    0xf0ff_ffff,
];

/// Decides whether the state left by compressing a candidate block is a hit.
///
/// Implementations are plain values copied into each [`Work`](crate::Work),
/// so they must not carry interior mutability.
pub trait Predicate: Copy + Send {
    fn accept(&self, state: State) -> bool;
}

/// A predicate whose test is "these four masked state words are all zero".
///
/// This is the shape the lane-parallel scan can fold without leaving lane
/// registers: it ORs the masked words across a batch and looks for a zero
/// lane. Any predicate expressible as such a mask quadruple drops in.
pub trait MaskPredicate: Predicate {
    /// One mask per state word; a state is accepted iff the OR of all four
    /// masked words is zero.
    fn masks(&self) -> [u32; 4];
}

/// Accepts digests whose first `zeros` hex nibbles are `0`.
///
/// ```
/// use md5rush::{kernel, LeadingZeros, Predicate};
///
/// let pred = LeadingZeros::new(1).unwrap();
/// // 0cc175b9... — MD5("a") starts with one zero nibble.
/// assert!(pred.accept(kernel::md5(b"a")));
/// assert!(!pred.accept(kernel::md5(b"abc")));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LeadingZeros {
    masks: [u32; 4],
}

impl LeadingZeros {
    /// Build the predicate for `zeros` leading zero nibbles, 0 to 32.
    pub fn new(zeros: u32) -> Result<Self, Error> {
        if zeros > 32 {
            return Err(Error::InvalidZeros(zeros));
        }
        let full = (zeros / 8) as usize;
        let mut masks = [0u32; 4];
        for mask in masks.iter_mut().take(full) {
            *mask = u32::MAX;
        }
        if full < 4 {
            masks[full] = NIBBLE_MASKS[(zeros % 8) as usize];
        }
        Ok(Self { masks })
    }
}

impl Predicate for LeadingZeros {
    fn accept(&self, state: State) -> bool {
        let [ma, mb, mc, md] = self.masks;
        ((state.a & ma) | (state.b & mb) | (state.c & mc) | (state.d & md)) == 0
    }
}

impl MaskPredicate for LeadingZeros {
    fn masks(&self) -> [u32; 4] {
        self.masks
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    use super::*;

    /// A state whose digest starts with exactly `count` zero nibbles.
    fn state_with_zero_nibbles(count: usize) -> State {
        let mut bytes = [0xabu8; 16];
        for i in 0..count {
            bytes[i / 2] &= if i % 2 == 0 { 0x0f } else { 0xf0 };
        }
        let word = |i: usize| u32::from_le_bytes(bytes[i * 4..i * 4 + 4].try_into().unwrap());
        State {
            a: word(0),
            b: word(1),
            c: word(2),
            d: word(3),
        }
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(LeadingZeros::new(33).is_err());
        assert!(LeadingZeros::new(32).is_ok());
    }

    #[test]
    fn boundary_counts() {
        for count in 0..32 {
            let state = state_with_zero_nibbles(count);
            assert!(
                LeadingZeros::new(count as u32).unwrap().accept(state),
                "{count} zero nibbles accepted at z={count}"
            );
            assert!(
                !LeadingZeros::new(count as u32 + 1).unwrap().accept(state),
                "{count} zero nibbles rejected at z={}",
                count + 1
            );
        }
    }

    #[test]
    fn full_width_only_accepts_all_zero() {
        let pred = LeadingZeros::new(32).unwrap();
        assert!(pred.accept(State {
            a: 0,
            b: 0,
            c: 0,
            d: 0
        }));
        assert!(!pred.accept(State {
            a: 0,
            b: 0,
            c: 0,
            d: 1 << 31
        }));
    }

    #[test]
    fn agrees_with_formatted_digest() {
        let mut rng = SmallRng::seed_from_u64(0xd1ce);
        for zeros in 0..=32u32 {
            let pred = LeadingZeros::new(zeros).unwrap();
            for _ in 0..64 {
                let state = State {
                    a: rng.gen(),
                    b: rng.gen(),
                    c: rng.gen(),
                    d: rng.gen(),
                };
                let hex = state.to_string();
                let leading = hex.chars().take_while(|&c| c == '0').count();
                assert_eq!(
                    pred.accept(state),
                    leading >= zeros as usize,
                    "z={zeros} against digest {hex}"
                );
            }
        }
    }
}
