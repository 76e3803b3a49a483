//! Runtime CPU detection and per-width search dispatch.
//!
//! Each width is reached through an `unsafe fn` annotated with
//! `#[target_feature]`, so the lane code inlined into it is compiled for
//! that ISA. Detection happens once per [`Engine`](crate::Engine); the
//! scalar path needs no feature at all.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::lanes::{broadcast_state, compress, lane_state, Lanes};
use crate::predicate::MaskPredicate;
use crate::work::{advance, Outcome, Work};

/// Widest lane-parallel kernel the host supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// AVX-512F, 16 lanes per compression.
    Avx512,
    /// AVX2, 8 lanes per compression.
    Avx2,
    /// SSE2, 4 lanes per compression.
    Sse2,
    /// ARM NEON, 4 lanes per compression.
    Neon,
    /// One candidate per compression.
    Scalar,
}

impl Backend {
    /// Candidates evaluated per compression.
    pub const fn lanes(self) -> usize {
        match self {
            Backend::Avx512 => 16,
            Backend::Avx2 => 8,
            Backend::Sse2 | Backend::Neon => 4,
            Backend::Scalar => 1,
        }
    }

    /// Detect CPU features and select the widest available kernel.
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("avx512f") {
                return Backend::Avx512;
            }
            if is_x86_feature_detected!("avx2") {
                return Backend::Avx2;
            }
            if is_x86_feature_detected!("sse2") {
                return Backend::Sse2;
            }
        }
        // NEON is mandatory on aarch64.
        if cfg!(target_arch = "aarch64") {
            Backend::Neon
        } else {
            Backend::Scalar
        }
    }
}

/// Scan `work` with the kernel `backend` advertises.
pub(crate) fn scan<P: MaskPredicate>(
    backend: Backend,
    work: &Work<P>,
    stop: &AtomicBool,
) -> Outcome {
    match backend {
        // Safety: `backend` came from `Backend::detect`, which verified the
        // corresponding CPU feature.
        #[cfg(target_arch = "x86_64")]
        Backend::Avx512 => unsafe { scan_avx512(work, stop) },
        #[cfg(target_arch = "x86_64")]
        Backend::Avx2 => unsafe { scan_avx2(work, stop) },
        #[cfg(target_arch = "x86_64")]
        Backend::Sse2 => unsafe { scan_sse2(work, stop) },
        #[cfg(target_arch = "aarch64")]
        Backend::Neon => scan_lanes::<4, P>(work, stop),
        _ => scan_lanes::<1, P>(work, stop),
    }
}

/// # Safety
/// Caller must ensure AVX-512F is available.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx512f")]
unsafe fn scan_avx512<P: MaskPredicate>(work: &Work<P>, stop: &AtomicBool) -> Outcome {
    scan_lanes::<16, P>(work, stop)
}

/// # Safety
/// Caller must ensure AVX2 is available.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn scan_avx2<P: MaskPredicate>(work: &Work<P>, stop: &AtomicBool) -> Outcome {
    scan_lanes::<8, P>(work, stop)
}

/// # Safety
/// Caller must ensure SSE2 is available.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn scan_sse2<P: MaskPredicate>(work: &Work<P>, stop: &AtomicBool) -> Outcome {
    scan_lanes::<4, P>(work, stop)
}

/// Evaluate up to `max_count` candidates of `work`, `W` per compression.
///
/// Lane `j` always holds the mutable window advanced by `j`. While the low
/// window word is far from wrapping, stepping is a single broadcast add on
/// that word; around a wrap the lanes are re-materialized with full
/// base-2³² carry so they keep matching the scalar enumeration.
#[inline(always)]
fn scan_lanes<const W: usize, P: MaskPredicate>(work: &Work<P>, stop: &AtomicBool) -> Outcome {
    let begin = work.mutable_begin;
    let end = work.mutable_end;
    if work.max_count == 0 {
        return Outcome::miss(0);
    }
    if begin == end {
        // A window of zero words holds exactly one candidate.
        let state = work.init.update(&work.block);
        return if work.pred.accept(state) {
            Outcome::hit(1, work.block)
        } else {
            Outcome::miss(1)
        };
    }

    let init = broadcast_state::<W>(work.init);
    let masks = work.pred.masks().map(Lanes::<W>::splat);
    let mut base = work.block;
    let mut m: [Lanes<W>; 16] = std::array::from_fn(|w| Lanes::splat(base[w]));
    let mut stale = true;
    let mut consumed = 0u64;

    while consumed < work.max_count {
        if stop.load(Ordering::Relaxed) {
            return Outcome::miss(consumed);
        }

        let fast = u64::from(base[begin]) + W as u64 - 1 <= u64::from(u32::MAX);
        if fast {
            if stale {
                for w in begin..end {
                    m[w] = Lanes::splat(base[w]);
                }
                m[begin] = m[begin] + Lanes::offsets();
                stale = false;
            }
        } else {
            // The low word wraps inside this batch.
            let mut cursor = base;
            for j in 0..W {
                for w in begin..end {
                    m[w].set_lane(j, cursor[w]);
                }
                let _ = advance(&mut cursor[begin..end], 1);
            }
            stale = true;
        }

        let state = compress(init, &m);
        let masked = (state[0] & masks[0])
            | (state[1] & masks[1])
            | (state[2] & masks[2])
            | (state[3] & masks[3]);

        let batch = (work.max_count - consumed).min(W as u64);
        if masked.any_zero() {
            for j in 0..batch as usize {
                if masked.lane(j) == 0 {
                    let mut block = base;
                    let _ = advance(&mut block[begin..end], j as u32);
                    debug_assert_eq!(lane_state(&state, j), work.init.update(&block));
                    return Outcome::hit(consumed + j as u64 + 1, block);
                }
            }
        }
        consumed += batch;

        let low_wraps = u64::from(base[begin]) + W as u64 > u64::from(u32::MAX);
        if !advance(&mut base[begin..end], W as u32) {
            return Outcome::miss(consumed);
        }
        if low_wraps {
            stale = true;
        } else if !stale {
            m[begin] = m[begin] + Lanes::splat(W as u32);
        }
    }
    Outcome::miss(consumed)
}
