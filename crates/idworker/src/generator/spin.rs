/// How long [`IdWorker`] busy-waits when the 4096 sequence values of the
/// current millisecond are used up.
///
/// The wait is a tight loop re-sampling the clock with
/// [`core::hint::spin_loop`] between samples. It never sleeps, so it burns a
/// core for the remainder of the millisecond (normally well under 1 ms).
///
/// With [`SpinPolicy::Unbounded`] a frozen or broken clock turns the wait into
/// an infinite loop. [`SpinPolicy::Bounded`] caps the number of clock samples
/// and reports [`Error::ClockStalled`] instead.
///
/// [`IdWorker`]: crate::IdWorker
/// [`Error::ClockStalled`]: crate::Error::ClockStalled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpinPolicy {
    /// Spin until the clock advances, however long that takes.
    #[default]
    Unbounded,
    /// Give up after this many clock samples without progress. `Bounded(0)`
    /// still samples the clock once.
    Bounded(u64),
}

impl SpinPolicy {
    /// Returns `true` once `samples` clock readings have been spent.
    pub(crate) const fn is_exhausted(self, samples: u64) -> bool {
        match self {
            Self::Unbounded => false,
            Self::Bounded(max) => samples >= max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_never_exhausts() {
        assert!(!SpinPolicy::Unbounded.is_exhausted(u64::MAX));
    }

    #[test]
    fn bounded_exhausts_at_limit() {
        let policy = SpinPolicy::Bounded(3);
        assert!(!policy.is_exhausted(2));
        assert!(policy.is_exhausted(3));
        assert!(SpinPolicy::Bounded(0).is_exhausted(1));
    }
}
