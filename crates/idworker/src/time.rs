use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// Discord epoch: Thursday, January 1, 2015 00:00:00 UTC
pub const DISCORD_EPOCH: Duration = Duration::from_millis(1_420_070_400_000);

/// Custom epoch: Wednesday, January 1, 2025 00:00:00 UTC
pub const CUSTOM_EPOCH: Duration = Duration::from_millis(1_735_689_600_000);

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the real system clock or a mocked
/// time source in tests.
///
/// The unit is **milliseconds since the Unix epoch**. The value is signed so
/// that a clock reading before 1970 is representable rather than a panic. A
/// source is free to move backward; the generator detects and reports it.
///
/// # Example
///
/// ```
/// use idworker::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> i64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> i64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> i64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn current_millis(&self) -> i64 {
        (**self).current_millis()
    }
}

/// The system wall clock, truncated to milliseconds.
///
/// Unlike a monotonic timer this follows NTP steps and manual adjustments, so
/// it can move backward. The generator reports such a step as
/// [`Error::ClockRegression`].
///
/// [`Error::ClockRegression`]: crate::Error::ClockRegression
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> i64 {
        unix_millis(SystemTime::now())
    }
}

/// Converts an absolute instant to signed milliseconds since the Unix epoch,
/// truncating toward negative infinity.
pub fn unix_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
        Err(before) => {
            let before = before.duration();
            let millis = i64::try_from(before.as_millis()).unwrap_or(i64::MAX);
            if before.subsec_nanos() % 1_000_000 == 0 {
                -millis
            } else {
                -millis - 1
            }
        }
    }
}

/// Converts one of the epoch constants (a [`Duration`] since the Unix epoch)
/// to the [`SystemTime`] expected by [`IdWorker::new`].
///
/// [`IdWorker::new`]: crate::IdWorker::new
pub fn epoch_instant(since_unix: Duration) -> SystemTime {
    UNIX_EPOCH + since_unix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_millis_truncates_nanoseconds() {
        let t = UNIX_EPOCH + Duration::new(1, 999_999_999);
        assert_eq!(unix_millis(t), 1_999);
    }

    #[test]
    fn unix_millis_before_epoch_rounds_down() {
        assert_eq!(unix_millis(UNIX_EPOCH - Duration::from_millis(5)), -5);
        assert_eq!(unix_millis(UNIX_EPOCH - Duration::from_micros(5_500)), -6);
    }

    #[test]
    fn epoch_constants_round_trip() {
        assert_eq!(unix_millis(epoch_instant(TWITTER_EPOCH)), 1_288_834_974_657);
        assert_eq!(unix_millis(epoch_instant(DISCORD_EPOCH)), 1_420_070_400_000);
    }

    #[test]
    fn system_clock_is_after_custom_epoch() {
        assert!(SystemClock.current_millis() > CUSTOM_EPOCH.as_millis() as i64);
    }
}
