use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced while setting up or reporting a hunt.
///
/// Nothing in here can fire mid-search: the kernels are pure and the queues
/// are in-process, so every failure is caught at startup or at file I/O.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested zero-nibble count exceeds the digest width.
    #[error("invalid zero count {0}, valid values are 0 to 32")]
    InvalidZeros(u32),

    /// A mutable window that does not fit the trailing block.
    #[error("mutable window {begin}..{end} does not fit the trailing block")]
    InvalidWindow { begin: usize, end: usize },

    /// Hardware concurrency could not be detected and no thread count was given.
    #[error("unknown number of hardware thread contexts, specify -t")]
    UnknownConcurrency,

    /// The prefix file could not be read.
    #[error("cannot read prefix from '{}'", path.display())]
    ReadPrefix {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The treasure could not be written out.
    #[error("cannot write treasure to '{}'", path.display())]
    WriteTreasure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
