//! Units of dispatched search and their outcomes.

use crate::error::Error;
use crate::kernel::State;

/// Highest word index the mutable window may reach. The three words above it
/// are reserved for the 0x80 padding marker and the 64-bit message length.
pub const WINDOW_LIMIT: usize = 13;

/// Add `addend` into the little-endian base-2³² integer held in `window`.
///
/// Returns `false` when the addition carries out of the window, i.e. the
/// window has been exhausted and holds the wrapped value.
///
/// ```
/// use md5rush::work::advance;
///
/// let mut window = [u32::MAX, 0];
/// assert!(advance(&mut window, 2));
/// assert_eq!(window, [1, 1]);
/// ```
#[must_use]
pub fn advance(window: &mut [u32], addend: u32) -> bool {
    let mut carry = addend;
    for word in window.iter_mut() {
        if carry == 0 {
            return true;
        }
        let (sum, overflow) = word.overflowing_add(carry);
        *word = sum;
        carry = u32::from(overflow);
    }
    carry == 0
}

/// A candidate sub-range: up to `max_count` successive values of the mutable
/// window of `block`, each compressed onto `init` and offered to `pred`.
///
/// Words outside the window are fixed for the lifetime of the work. A `Work`
/// is moved from the coordinator to exactly one worker, which answers with
/// exactly one [`Outcome`].
#[derive(Debug, Clone, Copy)]
pub struct Work<P> {
    pub(crate) max_count: u64,
    pub(crate) mutable_begin: usize,
    pub(crate) mutable_end: usize,
    pub(crate) block: [u32; 16],
    pub(crate) init: State,
    pub(crate) pred: P,
}

impl<P> Work<P> {
    /// Describe a search over `block[mutable_begin..mutable_end]`.
    ///
    /// Rejects windows reaching past [`WINDOW_LIMIT`]; a malformed window is
    /// refused here so nothing invalid can be dispatched.
    pub fn new(
        max_count: u64,
        mutable_begin: usize,
        mutable_end: usize,
        block: [u32; 16],
        init: State,
        pred: P,
    ) -> Result<Self, Error> {
        if mutable_begin > mutable_end || mutable_end > WINDOW_LIMIT {
            return Err(Error::InvalidWindow {
                begin: mutable_begin,
                end: mutable_end,
            });
        }
        Ok(Self {
            max_count,
            mutable_begin,
            mutable_end,
            block,
            init,
            pred,
        })
    }

    pub fn max_count(&self) -> u64 {
        self.max_count
    }

    pub fn block(&self) -> &[u32; 16] {
        &self.block
    }
}

impl<P: Copy> Work<P> {
    /// Split off the first `count` candidates.
    ///
    /// The head keeps at most `count`; the rest has its window advanced past
    /// them, with `max_count` forced to zero if the advance carries out.
    pub fn split(self, count: u32) -> (Self, Self) {
        let mut head = self;
        head.max_count = head.max_count.min(u64::from(count));
        let mut rest = self;
        rest.max_count -= head.max_count;
        if !advance(
            &mut rest.block[rest.mutable_begin..rest.mutable_end],
            count,
        ) {
            rest.max_count = 0;
        }
        (head, rest)
    }
}

/// What scanning one [`Work`] produced: the number of candidates consumed
/// and, on a hit, the accepted block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Candidates consumed, at most the work's `max_count`.
    pub count: u64,
    /// The block whose compression the predicate accepted, if any.
    pub block: Option<[u32; 16]>,
}

impl Outcome {
    pub(crate) fn miss(count: u64) -> Self {
        Self { count, block: None }
    }

    pub(crate) fn hit(count: u64, block: [u32; 16]) -> Self {
        Self {
            count,
            block: Some(block),
        }
    }
}
