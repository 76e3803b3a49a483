//! W-lane vectors of 32-bit words and the lane-parallel MD5 compression.
//!
//! Every arithmetic and bitwise op broadcasts per lane, so one call to
//! [`compress`] evaluates `W` candidate blocks at once. The code is written
//! against plain word arrays; the [`backend`](crate::backend) wrappers
//! compile it for whichever vector ISA the host advertises.

use std::ops::{Add, BitAnd, BitOr, BitXor, Not};

use crate::kernel::{State, K, S};

/// `W` 32-bit words, one per lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Lanes<const W: usize>([u32; W]);

impl<const W: usize> Lanes<W> {
    #[inline(always)]
    pub(crate) fn splat(x: u32) -> Self {
        Self([x; W])
    }

    /// Lane `j` holds `j`.
    #[inline(always)]
    pub(crate) fn offsets() -> Self {
        let mut lanes = [0u32; W];
        for (j, lane) in lanes.iter_mut().enumerate() {
            *lane = j as u32;
        }
        Self(lanes)
    }

    #[inline(always)]
    pub(crate) fn lane(self, j: usize) -> u32 {
        self.0[j]
    }

    #[inline(always)]
    pub(crate) fn set_lane(&mut self, j: usize, value: u32) {
        self.0[j] = value;
    }

    #[inline(always)]
    pub(crate) fn rotate_left(self, n: u32) -> Self {
        Self(self.0.map(|x| x.rotate_left(n)))
    }

    #[inline(always)]
    pub(crate) fn any_zero(self) -> bool {
        self.0.iter().any(|&x| x == 0)
    }
}

/// Lane-wise wrapping addition.
impl<const W: usize> Add for Lanes<W> {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (lane, r) in out.iter_mut().zip(rhs.0) {
            *lane = lane.wrapping_add(r);
        }
        Self(out)
    }
}

impl<const W: usize> BitAnd for Lanes<W> {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (lane, r) in out.iter_mut().zip(rhs.0) {
            *lane &= r;
        }
        Self(out)
    }
}

impl<const W: usize> BitOr for Lanes<W> {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (lane, r) in out.iter_mut().zip(rhs.0) {
            *lane |= r;
        }
        Self(out)
    }
}

impl<const W: usize> BitXor for Lanes<W> {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (lane, r) in out.iter_mut().zip(rhs.0) {
            *lane ^= r;
        }
        Self(out)
    }
}

impl<const W: usize> Not for Lanes<W> {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self(self.0.map(|x| !x))
    }
}

/// Broadcast a chaining state into all `W` lanes.
#[inline(always)]
pub(crate) fn broadcast_state<const W: usize>(state: State) -> [Lanes<W>; 4] {
    [
        Lanes::splat(state.a),
        Lanes::splat(state.b),
        Lanes::splat(state.c),
        Lanes::splat(state.d),
    ]
}

/// The chaining state held in lane `j`.
#[inline(always)]
pub(crate) fn lane_state<const W: usize>(state: &[Lanes<W>; 4], j: usize) -> State {
    State {
        a: state[0].lane(j),
        b: state[1].lane(j),
        c: state[2].lane(j),
        d: state[3].lane(j),
    }
}

/// One RFC 1321 compression of `W` message blocks onto `W` copies of the
/// chaining state. Lane `j` of the result equals the scalar
/// [`State::update`] of lane `j` of the inputs.
#[inline(always)]
pub(crate) fn compress<const W: usize>(init: [Lanes<W>; 4], m: &[Lanes<W>; 16]) -> [Lanes<W>; 4] {
    let [mut a, mut b, mut c, mut d] = init;

    let round = |a: Lanes<W>, b: Lanes<W>, f: Lanes<W>, g: usize, i: usize| {
        let t = (f + a + Lanes::splat(K[i]) + m[g]).rotate_left(S[i]);
        b + t
    };

    for i in 0..16 {
        let f = (b & c) | (!b & d);
        (a, b, c, d) = (d, round(a, b, f, i, i), b, c);
    }
    for i in 16..32 {
        let f = (d & b) | (!d & c);
        (a, b, c, d) = (d, round(a, b, f, (5 * i + 1) % 16, i), b, c);
    }
    for i in 32..48 {
        let f = b ^ c ^ d;
        (a, b, c, d) = (d, round(a, b, f, (3 * i + 5) % 16, i), b, c);
    }
    for i in 48..64 {
        let f = c ^ (b | !d);
        (a, b, c, d) = (d, round(a, b, f, (7 * i) % 16, i), b, c);
    }

    [init[0] + a, init[1] + b, init[2] + c, init[3] + d]
}

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    use super::*;

    fn random_state(rng: &mut SmallRng) -> State {
        State {
            a: rng.gen(),
            b: rng.gen(),
            c: rng.gen(),
            d: rng.gen(),
        }
    }

    fn check_width<const W: usize>(rng: &mut SmallRng) {
        for _ in 0..16 {
            let init = random_state(rng);
            let blocks: Vec<[u32; 16]> =
                (0..W).map(|_| std::array::from_fn(|_| rng.gen())).collect();

            let mut m = [Lanes::<W>::splat(0); 16];
            for (w, word) in m.iter_mut().enumerate() {
                for (j, block) in blocks.iter().enumerate() {
                    word.set_lane(j, block[w]);
                }
            }

            let out = compress(broadcast_state(init), &m);
            for (j, block) in blocks.iter().enumerate() {
                assert_eq!(
                    lane_state(&out, j),
                    init.update(block),
                    "lane {j} of {W} diverged from the scalar kernel"
                );
            }
        }
    }

    #[test]
    fn lanes_match_scalar_kernel() {
        let mut rng = SmallRng::seed_from_u64(0x1a9e5);
        check_width::<1>(&mut rng);
        check_width::<4>(&mut rng);
        check_width::<8>(&mut rng);
        check_width::<16>(&mut rng);
    }

    #[test]
    fn offsets_number_the_lanes() {
        let offsets = Lanes::<4>::offsets();
        for j in 0..4 {
            assert_eq!(offsets.lane(j), j as u32);
        }
    }

    #[test]
    fn addition_wraps_per_lane() {
        let sum = Lanes::<2>::splat(u32::MAX) + Lanes::splat(2);
        assert_eq!(sum, Lanes::splat(1));
    }

    #[test]
    fn any_zero_finds_a_single_lane() {
        let mut lanes = Lanes::<8>::splat(7);
        assert!(!lanes.any_zero());
        lanes.set_lane(5, 0);
        assert!(lanes.any_zero());
    }
}
