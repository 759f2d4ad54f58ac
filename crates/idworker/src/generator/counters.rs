use portable_atomic::{AtomicU64, Ordering};

/// Per-generator usage counters.
///
/// Owned by each [`IdWorker`] rather than shared process-wide, so two
/// generators in one process never observe each other's traffic. Counters are
/// purely observational and play no part in ID uniqueness.
///
/// [`IdWorker`]: crate::IdWorker
#[derive(Debug, Default)]
pub struct Counters {
    generated: AtomicU64,
    errors: AtomicU64,
}

impl Counters {
    /// Number of IDs successfully minted.
    pub fn generated(&self) -> u64 {
        self.generated.load(Ordering::Relaxed)
    }

    /// Number of failed generation attempts, including rejected callers.
    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    pub(crate) fn record_generated(&self) {
        self.generated.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }
}
