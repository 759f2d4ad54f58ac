use std::time::SystemTime;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, FlakeId, Result,
    generator::{Counters, SpinPolicy, StateCell, state_cell, validate_identifiers},
    time::{SystemClock, TimeSource, unix_millis},
};

/// The mutable half of a generator. Both fields are updated together under
/// one lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct State {
    /// Last millisecond (since the Unix epoch) at which an ID was minted, or
    /// `-1` before the first one.
    pub(crate) last_timestamp: i64,
    pub(crate) sequence: u16,
}

impl State {
    pub(crate) const UNSET: Self = Self {
        last_timestamp: -1,
        sequence: 0,
    };
}

/// A thread-safe Snowflake ID generator for one worker in one datacenter.
///
/// Every call to [`IdWorker::next_id`] samples the clock, updates the
/// per-millisecond sequence and composes an ID, all inside a single critical
/// section. Share one instance across threads with `&IdWorker` or
/// `Arc<IdWorker>`; distinct instances share nothing.
///
/// IDs are unique across the fleet only if every live `(datacenter_id,
/// worker_id)` pair is assigned to exactly one generator out of band.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Detects backward clock steps
/// - ✅ Transparent rollover when a millisecond's 4096 sequence values run out
///
/// # Example
/// ```
/// use std::time::SystemTime;
/// use idworker::{FlakeId, IdWorker};
///
/// let worker = IdWorker::new(1, 2, SystemTime::now())?;
/// let id = FlakeId::from_raw(worker.next_id()?);
/// assert_eq!(id.worker_id(), 1);
/// assert_eq!(id.datacenter_id(), 2);
/// # Ok::<(), idworker::Error>(())
/// ```
pub struct IdWorker<T = SystemClock>
where
    T: TimeSource,
{
    worker_id: u8,
    datacenter_id: u8,
    epoch: SystemTime,
    epoch_millis: i64,
    spin: SpinPolicy,
    pub(crate) state: StateCell<State>,
    counters: Counters,
    pub(crate) time: T,
}

impl IdWorker<SystemClock> {
    /// Creates a generator backed by the system wall clock.
    ///
    /// # Parameters
    ///
    /// - `worker_id`: identifies this worker within its datacenter, `0..=31`
    /// - `datacenter_id`: identifies the datacenter, `0..=31`
    /// - `epoch`: the zero point of the timestamp field. IDs from generators
    ///   with different epochs are not comparable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] if either identifier exceeds 31.
    pub fn new(worker_id: u8, datacenter_id: u8, epoch: SystemTime) -> Result<Self> {
        Self::with_clock(worker_id, datacenter_id, epoch, SystemClock)
    }
}

impl<T> IdWorker<T>
where
    T: TimeSource,
{
    /// Creates a generator reading time from `time`.
    ///
    /// This is [`IdWorker::new`] for callers that need a different
    /// [`TimeSource`], such as a mocked clock in tests.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] if either identifier exceeds 31.
    pub fn with_clock(
        worker_id: u8,
        datacenter_id: u8,
        epoch: SystemTime,
        time: T,
    ) -> Result<Self> {
        Self::from_components(worker_id, datacenter_id, epoch, State::UNSET, time)
    }

    pub(crate) fn from_components(
        worker_id: u8,
        datacenter_id: u8,
        epoch: SystemTime,
        state: State,
        time: T,
    ) -> Result<Self> {
        validate_identifiers(worker_id, datacenter_id)?;
        debug_assert!(state.sequence <= FlakeId::MAX_SEQUENCE, "sequence overflow");
        Ok(Self {
            worker_id,
            datacenter_id,
            epoch,
            epoch_millis: unix_millis(epoch),
            spin: SpinPolicy::default(),
            state: state_cell(state),
            counters: Counters::default(),
            time,
        })
    }

    /// Replaces the sequence-overflow wait policy. See [`SpinPolicy`].
    #[must_use]
    pub fn with_spin_policy(mut self, spin: SpinPolicy) -> Self {
        self.spin = spin;
        self
    }

    /// The configured worker ID.
    pub fn worker_id(&self) -> u8 {
        self.worker_id
    }

    /// The configured datacenter ID.
    pub fn datacenter_id(&self) -> u8 {
        self.datacenter_id
    }

    /// The configured epoch.
    pub fn epoch(&self) -> SystemTime {
        self.epoch
    }

    /// The configured epoch in milliseconds since the Unix epoch.
    pub fn epoch_millis(&self) -> i64 {
        self.epoch_millis
    }

    /// The configured overflow wait policy.
    pub fn spin_policy(&self) -> SpinPolicy {
        self.spin
    }

    /// This generator's usage counters.
    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Number of IDs this generator has minted.
    pub fn generated_count(&self) -> u64 {
        self.counters.generated()
    }

    /// Number of failed calls, including callers rejected by a
    /// [`GatedIdWorker`].
    ///
    /// [`GatedIdWorker`]: crate::GatedIdWorker
    pub fn error_count(&self) -> u64 {
        self.counters.errors()
    }

    /// Generates the next ID as a raw `u64`.
    ///
    /// See [`IdWorker::next_flake_id`] for the full contract.
    ///
    /// # Errors
    ///
    /// Same as [`IdWorker::next_flake_id`].
    pub fn next_id(&self) -> Result<u64> {
        self.next_flake_id().map(|id| id.to_raw())
    }

    /// Generates the next ID.
    ///
    /// Successive successful calls on one generator return strictly
    /// increasing IDs. When all 4096 sequence values of the current
    /// millisecond are used, the call busy-waits on the clock (holding the
    /// lock and spinning a core) until the next millisecond begins; this is
    /// not an error. See [`SpinPolicy`] for bounding that wait.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock is behind the last minted
    ///   timestamp
    /// - [`Error::TimestampOutOfRange`] if the clock is before the epoch or
    ///   more than 2^40 ms after it
    /// - [`Error::ClockStalled`] if a bounded spin ran out
    /// - [`Error::LockPoisoned`] if another thread panicked inside the lock
    ///   (std mutex only)
    ///
    /// No state is changed on error, so a retry after the clock recovers
    /// succeeds.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "trace",
            skip(self),
            fields(worker_id = self.worker_id, datacenter_id = self.datacenter_id)
        )
    )]
    pub fn next_flake_id(&self) -> Result<FlakeId> {
        let result = self.try_mint();
        match result {
            Ok(_) => self.counters.record_generated(),
            Err(_) => self.counters.record_error(),
        }
        result
    }

    fn try_mint(&self) -> Result<FlakeId> {
        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };

        let last_timestamp = state.last_timestamp;
        let mut timestamp = self.time.current_millis();

        let sequence = if timestamp == last_timestamp {
            let sequence = (state.sequence + 1) & FlakeId::MAX_SEQUENCE;
            if sequence == 0 {
                timestamp = self.til_next_millis(last_timestamp)?;
            }
            sequence
        } else {
            0
        };

        if timestamp < last_timestamp {
            return Err(Self::cold_clock_behind(last_timestamp, timestamp));
        }

        let delta = self.delta_from_epoch(timestamp)?;

        *state = State {
            last_timestamp: timestamp,
            sequence,
        };

        Ok(FlakeId::from_parts(
            delta,
            self.datacenter_id,
            self.worker_id,
            sequence,
        ))
    }

    fn delta_from_epoch(&self, timestamp: i64) -> Result<u64> {
        let millis = timestamp.saturating_sub(self.epoch_millis);
        match u64::try_from(millis) {
            Ok(delta) if delta <= FlakeId::MAX_TIMESTAMP => Ok(delta),
            _ => Err(Self::cold_out_of_range(millis)),
        }
    }

    /// Spins until the clock moves past `last_timestamp`.
    #[cold]
    #[inline(never)]
    fn til_next_millis(&self, last_timestamp: i64) -> Result<i64> {
        let mut samples: u64 = 0;
        loop {
            let now = self.time.current_millis();
            samples += 1;
            if now > last_timestamp {
                return Ok(now);
            }
            if self.spin.is_exhausted(samples) {
                #[cfg(feature = "tracing")]
                tracing::warn!(last_timestamp, samples, "clock stalled during sequence rollover");
                return Err(Error::ClockStalled { last_timestamp });
            }
            core::hint::spin_loop();
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(last_timestamp: i64, now: i64) -> Error {
        let millis = last_timestamp - now;
        debug_assert!(millis > 0);
        #[cfg(feature = "tracing")]
        tracing::warn!(regression_ms = millis, "clock moved backwards");
        Error::ClockRegression { millis }
    }

    #[cold]
    #[inline(never)]
    fn cold_out_of_range(millis: i64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(millis, "timestamp outside the 40-bit field");
        Error::TimestampOutOfRange { millis }
    }
}

impl<T> core::fmt::Debug for IdWorker<T>
where
    T: TimeSource,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IdWorker")
            .field("worker_id", &self.worker_id)
            .field("datacenter_id", &self.datacenter_id)
            .field("epoch_millis", &self.epoch_millis)
            .field("spin", &self.spin)
            .field("counters", &self.counters)
            .finish_non_exhaustive()
    }
}
