#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, IdWorker, Result, SystemClock, TimeSource};

/// A predicate deciding whether a caller may receive IDs.
///
/// Any `Fn(&str) -> bool` is a validator, so callers can plug in whatever
/// identity or usage-pattern check they already have.
pub trait CallerValidator {
    /// Returns `true` if `tag` is allowed through.
    fn is_valid(&self, tag: &str) -> bool;
}

impl<F> CallerValidator for F
where
    F: Fn(&str) -> bool,
{
    fn is_valid(&self, tag: &str) -> bool {
        self(tag)
    }
}

/// The stock caller check: a tag must start with an ASCII letter.
///
/// Anything may follow the first letter, so `"infra-dm"` and `"a!"` pass
/// while `"1asdf"` and `""` do not.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallerTag;

impl CallerValidator for CallerTag {
    fn is_valid(&self, tag: &str) -> bool {
        tag.as_bytes().first().is_some_and(u8::is_ascii_alphabetic)
    }
}

/// An [`IdWorker`] behind an admission check.
///
/// [`GatedIdWorker::get_id`] runs the validator first and only then asks the
/// generator for an ID. A rejected caller never touches the generator's
/// timestamp or sequence, but is counted in [`IdWorker::error_count`].
///
/// # Example
/// ```
/// use std::time::SystemTime;
/// use idworker::{CallerTag, Error, GatedIdWorker, IdWorker};
///
/// let gate = GatedIdWorker::new(IdWorker::new(0, 0, SystemTime::now())?, CallerTag);
///
/// assert!(gate.get_id("billing-svc").is_ok());
/// assert!(matches!(gate.get_id("42"), Err(Error::RejectedCaller { .. })));
/// # Ok::<(), Error>(())
/// ```
#[derive(Debug)]
pub struct GatedIdWorker<V, T = SystemClock>
where
    T: TimeSource,
{
    worker: IdWorker<T>,
    validator: V,
}

impl<V, T> GatedIdWorker<V, T>
where
    V: CallerValidator,
    T: TimeSource,
{
    /// Wraps `worker` so that every request is first checked by `validator`.
    pub fn new(worker: IdWorker<T>, validator: V) -> Self {
        Self { worker, validator }
    }

    /// Checks `tag` and, if accepted, generates the next ID.
    ///
    /// # Errors
    ///
    /// - [`Error::RejectedCaller`] if the validator refuses `tag`
    /// - any error from [`IdWorker::next_id`]
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn get_id(&self, tag: &str) -> Result<u64> {
        if !self.validator.is_valid(tag) {
            self.worker.counters().record_error();
            #[cfg(feature = "tracing")]
            tracing::debug!(tag, "caller rejected");
            return Err(Error::RejectedCaller {
                tag: tag.to_owned(),
            });
        }
        self.worker.next_id()
    }

    /// The wrapped generator.
    pub fn worker(&self) -> &IdWorker<T> {
        &self.worker
    }

    /// Unwraps the gate, returning the generator.
    pub fn into_inner(self) -> IdWorker<T> {
        self.worker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlakeId;
    use std::time::SystemTime;

    #[test]
    fn caller_tag_requires_leading_letter() {
        assert!(CallerTag.is_valid("infra-dm"));
        assert!(CallerTag.is_valid("Z"));
        assert!(CallerTag.is_valid("a!"));
        assert!(!CallerTag.is_valid("1"));
        assert!(!CallerTag.is_valid("1asdf"));
        assert!(!CallerTag.is_valid("-infra"));
        assert!(!CallerTag.is_valid(""));
        assert!(!CallerTag.is_valid("écrit"));
    }

    #[test]
    fn accepted_caller_gets_id() {
        let worker = IdWorker::new(3, 4, SystemTime::now()).unwrap();
        let gate = GatedIdWorker::new(worker, CallerTag);

        let id = FlakeId::from_raw(gate.get_id("infra-dm").unwrap());
        assert_eq!(id.worker_id(), 3);
        assert_eq!(id.datacenter_id(), 4);
        assert_eq!(gate.worker().generated_count(), 1);
        assert_eq!(gate.worker().error_count(), 0);
    }

    #[test]
    fn rejected_caller_leaves_generator_untouched() {
        let worker = IdWorker::new(0, 0, SystemTime::now()).unwrap();
        let gate = GatedIdWorker::new(worker, CallerTag);

        let err = gate.get_id("1asdf").unwrap_err();
        assert_eq!(
            err,
            Error::RejectedCaller {
                tag: "1asdf".to_owned()
            }
        );
        assert_eq!(gate.worker().generated_count(), 0);
        assert_eq!(gate.worker().error_count(), 1);

        let worker = gate.into_inner();
        #[cfg(not(feature = "parking-lot"))]
        let state = *worker.state.lock().unwrap();
        #[cfg(feature = "parking-lot")]
        let state = *worker.state.lock();
        assert_eq!(state.last_timestamp, -1);
        assert_eq!(state.sequence, 0);
    }

    #[test]
    fn closure_validator() {
        let worker = IdWorker::new(1, 1, SystemTime::now()).unwrap();
        let gate = GatedIdWorker::new(worker, |tag: &str| tag.starts_with("svc-"));

        assert!(gate.get_id("svc-orders").is_ok());
        assert!(matches!(
            gate.get_id("orders"),
            Err(Error::RejectedCaller { .. })
        ));
    }
}
