#[cfg(not(feature = "parking-lot"))]
pub(crate) use std::sync::{Mutex, MutexGuard, PoisonError};

#[cfg(feature = "parking-lot")]
pub(crate) use parking_lot::Mutex;

#[cfg(feature = "cache-padded")]
pub(crate) type StateCell<T> = crossbeam_utils::CachePadded<Mutex<T>>;
#[cfg(not(feature = "cache-padded"))]
pub(crate) type StateCell<T> = Mutex<T>;

pub(crate) fn state_cell<T>(value: T) -> StateCell<T> {
    #[cfg(feature = "cache-padded")]
    {
        crossbeam_utils::CachePadded::new(Mutex::new(value))
    }
    #[cfg(not(feature = "cache-padded"))]
    {
        Mutex::new(value)
    }
}
