/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Which identifier field failed the bounds check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdentifierField {
    /// The 5-bit worker identifier.
    Worker,
    /// The 5-bit datacenter identifier.
    Datacenter,
}

impl core::fmt::Display for IdentifierField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Worker => f.write_str("worker ID"),
            Self::Datacenter => f.write_str("datacenter ID"),
        }
    }
}

/// All error variants that `idworker` can emit.
///
/// Every failure is returned to the immediate caller. Nothing is retried or
/// swallowed internally; the generator's state is left untouched by every
/// variant raised from [`IdWorker::next_id`].
///
/// [`IdWorker::next_id`]: crate::IdWorker::next_id
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A worker or datacenter identifier does not fit its 5-bit field.
    ///
    /// Only raised at construction.
    #[error("{field} can't be greater than {max} (got {value})")]
    InvalidIdentifier {
        field: IdentifierField,
        value: u8,
        max: u8,
    },

    /// The clock reported a time earlier than the last minted timestamp.
    ///
    /// `millis` is the size of the regression. A retry once the clock has
    /// caught up will succeed.
    #[error("clock moved backwards, refusing to generate id for {millis} milliseconds")]
    ClockRegression { millis: i64 },

    /// The admission gate's validator rejected the caller tag.
    #[error("invalid caller tag: {tag:?}")]
    RejectedCaller { tag: String },

    /// The current time is before the configured epoch, or too far after it to
    /// fit the 40-bit timestamp field.
    #[error("timestamp {millis} ms from epoch does not fit the 40-bit timestamp field")]
    TimestampOutOfRange { millis: i64 },

    /// The sequence was exhausted and the clock did not advance within the
    /// configured [`SpinPolicy`] bound.
    ///
    /// [`SpinPolicy`]: crate::SpinPolicy
    #[error("clock did not advance past {last_timestamp} within the spin bound")]
    ClockStalled { last_timestamp: i64 },

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
