//! Work-partitioning coordinator and its worker pool.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::bounded;

use crate::backend::{self, Backend};
use crate::predicate::MaskPredicate;
use crate::work::{Outcome, Work};

/// Candidates handed to a worker per queue entry.
const BLOCK_SIZE: u32 = 10_000;

/// Multi-threaded search over a candidate space.
///
/// The coordinator splits the space into 10 000-candidate chunks, keeps at
/// most two of them in flight per worker, and stops the pool as soon as one
/// worker reports a hit.
#[derive(Debug, Clone)]
pub struct Engine {
    workers: usize,
    backend: Backend,
    block_size: u32,
    max_running: usize,
}

impl Engine {
    /// An engine dispatching to `workers` threads.
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            workers,
            backend: Backend::detect(),
            block_size: BLOCK_SIZE,
            max_running: 2 * workers,
        }
    }

    /// The kernel width selected for this host.
    pub const fn backend(&self) -> Backend {
        self.backend
    }

    /// Override the per-work candidate count.
    pub fn with_block_size(mut self, block_size: u32) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    /// Search the whole of `work`.
    ///
    /// Returns the first reported hit, or the exhaustion count once every
    /// candidate has been consumed. `progress` observes the count of each
    /// result the coordinator accounts for; the counts it sees sum to the
    /// returned total.
    pub fn search<P: MaskPredicate>(
        &self,
        work: Work<P>,
        progress: &mut impl FnMut(u64),
    ) -> Outcome {
        let stop = AtomicBool::new(false);
        let backend = self.backend;

        thread::scope(|scope| {
            let (work_tx, work_rx) = bounded::<Work<P>>(self.max_running);
            let (result_tx, result_rx) = bounded::<Outcome>(self.max_running);

            for _ in 0..self.workers {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let stop = &stop;
                scope.spawn(move || {
                    // The receiver ends once the coordinator drops the last
                    // sender and the queue drains.
                    for work in work_rx.iter() {
                        let outcome = backend::scan(backend, &work, stop);
                        if result_tx.send(outcome).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(work_rx);
            drop(result_tx);

            let mut rest = work;
            let mut exhausted = rest.max_count == 0;
            let mut in_flight = 0usize;
            let mut total = 0u64;
            let mut found = None;

            while !exhausted || in_flight > 0 {
                if !exhausted && in_flight < self.max_running {
                    let (head, tail) = rest.split(self.block_size);
                    rest = tail;
                    exhausted = rest.max_count == 0;
                    work_tx.send(head).expect("worker pool hung up");
                    in_flight += 1;
                } else {
                    let outcome = result_rx.recv().expect("worker pool hung up");
                    in_flight -= 1;
                    total += outcome.count;
                    progress(outcome.count);
                    if outcome.block.is_some() {
                        found = outcome.block;
                        break;
                    }
                }
            }

            // Wind down: flag the running scans, close the work queue, and
            // absorb whatever the workers still send. Counts of discarded
            // results are not part of the total.
            stop.store(true, Ordering::Relaxed);
            drop(work_tx);
            while in_flight > 0 {
                let _ = result_rx.recv().expect("worker pool hung up");
                in_flight -= 1;
            }

            Outcome {
                count: total,
                block: found,
            }
        })
    }
}
