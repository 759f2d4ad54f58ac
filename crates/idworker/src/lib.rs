//! Coordination-free, time-ordered 64-bit IDs.
//!
//! Each [`IdWorker`] owns a fixed worker ID and datacenter ID (both `0..=31`)
//! and mints IDs laid out as described on [`FlakeId`]: 40 bits of
//! milliseconds since a chosen epoch, 5 bits of datacenter, 5 bits of worker,
//! and a 12-bit per-millisecond sequence. As long as identifiers are assigned
//! uniquely out of band, IDs never collide and sort roughly by creation time.
//!
//! ```
//! use idworker::{IdWorker, TWITTER_EPOCH, epoch_instant};
//!
//! let worker = IdWorker::new(1, 1, epoch_instant(TWITTER_EPOCH))?;
//! let a = worker.next_id()?;
//! let b = worker.next_id()?;
//! assert!(a < b);
//! # Ok::<(), idworker::Error>(())
//! ```
//!
//! ## Feature flags
//!
//! - `parking-lot`: use `parking_lot::Mutex` (no lock poisoning)
//! - `cache-padded`: pad the generator state to a cache line
//! - `tracing`: trace spans around generation and warnings on clock anomalies
//! - `serde`: (de)serialize [`FlakeId`] as its raw `u64`

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod gate;
mod generator;
mod id;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::error::*;
pub use crate::gate::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
