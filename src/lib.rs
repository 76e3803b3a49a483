//! Hunt for byte sequences whose MD5 digest begins with a run of zero
//! nibbles.
//!
//! The prefix is absorbed into a running MD5 state once; after that every
//! candidate costs exactly one compression of a pre-framed trailing block.
//! Candidates are 32-bit-word extensions enumerated in base-2³² order,
//! evaluated many at a time by a lane-parallel kernel, and farmed out to a
//! pool of worker threads in fixed-size chunks until one of them reports a
//! hit.
//!
//! ```
//! use md5rush::{frame, Engine, LeadingZeros};
//!
//! let engine = Engine::new(2);
//! let mut prefix = frame::bytes_to_words(b"hello ");
//! let pred = LeadingZeros::new(2).unwrap();
//! frame::hunt(&mut prefix, &engine, pred, &mut |_| {}).unwrap();
//!
//! let bytes = frame::words_to_bytes(&prefix);
//! assert!(md5rush::kernel::md5(&bytes).to_string().starts_with("00"));
//! ```

pub mod backend;
pub mod engine;
pub mod error;
pub mod frame;
pub mod kernel;
mod lanes;
pub mod predicate;
pub mod work;

pub use backend::Backend;
pub use engine::Engine;
pub use error::Error;
pub use frame::hunt;
pub use kernel::State;
pub use predicate::{LeadingZeros, MaskPredicate, Predicate};
pub use work::{Outcome, Work};
