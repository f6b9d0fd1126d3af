//! Monotonic time source and carry-correct interval arithmetic.
//!
//! The background loops sleep toward absolute deadlines and recompute the
//! remaining delay after every wake, so they need signed time spans: a
//! deadline minus "now" is legitimately negative once the deadline has
//! passed. [`Interval`] is the signed, always-normalized span type;
//! [`Clock`] turns the process monotonic clock into intervals measured from
//! the clock's origin.

use std::ops::{Add, Sub};
use std::time::{Duration, Instant};

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// A signed time span in seconds and nanoseconds.
///
/// Always normalized: `|nanos| < 1_000_000_000`, and `secs` and `nanos`
/// never disagree in sign (both non-negative or both non-positive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Interval {
    secs: i64,
    nanos: i32,
}

impl Interval {
    /// The zero-length span.
    pub const ZERO: Interval = Interval { secs: 0, nanos: 0 };

    /// Build a span from raw seconds and nanoseconds, carrying nanosecond
    /// overflow into the seconds field and reconciling disagreeing signs.
    pub fn new(secs: i64, nanos: i64) -> Interval {
        let mut secs = secs + nanos / NANOS_PER_SEC;
        let mut nanos = nanos % NANOS_PER_SEC;
        if secs > 0 && nanos < 0 {
            secs -= 1;
            nanos += NANOS_PER_SEC;
        } else if secs < 0 && nanos > 0 {
            secs += 1;
            nanos -= NANOS_PER_SEC;
        }
        Interval {
            secs,
            nanos: nanos as i32,
        }
    }

    /// Whole-seconds component.
    pub fn secs(&self) -> i64 {
        self.secs
    }

    /// Sub-second nanoseconds component (same sign as [`secs`](Self::secs)).
    pub fn subsec_nanos(&self) -> i32 {
        self.nanos
    }

    /// True when the span is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.secs > 0 || (self.secs == 0 && self.nanos > 0)
    }

    /// The span as fractional seconds.
    pub fn as_secs_f64(&self) -> f64 {
        self.secs as f64 + f64::from(self.nanos) / 1e9
    }

    /// Convert to an unsigned [`Duration`] for timed waits.
    ///
    /// Returns `None` when the span is zero or negative, meaning the
    /// caller's deadline has already passed.
    pub fn to_duration(&self) -> Option<Duration> {
        if !self.is_positive() {
            return None;
        }
        Some(Duration::new(self.secs as u64, self.nanos as u32))
    }
}

impl From<Duration> for Interval {
    fn from(d: Duration) -> Interval {
        Interval::new(d.as_secs() as i64, i64::from(d.subsec_nanos()))
    }
}

impl Add for Interval {
    type Output = Interval;

    fn add(self, rhs: Interval) -> Interval {
        Interval::new(
            self.secs + rhs.secs,
            i64::from(self.nanos) + i64::from(rhs.nanos),
        )
    }
}

impl Sub for Interval {
    type Output = Interval;

    fn sub(self, rhs: Interval) -> Interval {
        Interval::new(
            self.secs - rhs.secs,
            i64::from(self.nanos) - i64::from(rhs.nanos),
        )
    }
}

/// Monotonic time source.
///
/// Wraps a fixed [`Instant`] origin; [`now`](Clock::now) reports the span
/// elapsed since the origin. Readings are non-decreasing and unaffected by
/// wall-clock adjustments.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    /// A clock anchored at the moment of the call.
    pub fn start() -> Clock {
        Clock {
            origin: Instant::now(),
        }
    }

    /// The interval elapsed since the clock's origin.
    pub fn now(&self) -> Interval {
        Interval::from(self.origin.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_normalized(iv: Interval) {
        assert!(iv.subsec_nanos().abs() < 1_000_000_000);
        if iv.secs() > 0 {
            assert!(iv.subsec_nanos() >= 0);
        }
        if iv.secs() < 0 {
            assert!(iv.subsec_nanos() <= 0);
        }
    }

    #[test]
    fn test_nanos_overflow_carries_into_secs() {
        let iv = Interval::new(0, 1_500_000_000);
        assert_eq!((iv.secs(), iv.subsec_nanos()), (1, 500_000_000));

        let iv = Interval::new(0, -2_500_000_000);
        assert_eq!((iv.secs(), iv.subsec_nanos()), (-2, -500_000_000));
    }

    #[test]
    fn test_disagreeing_signs_reconciled() {
        let iv = Interval::new(1, -1);
        assert_eq!((iv.secs(), iv.subsec_nanos()), (0, 999_999_999));

        let iv = Interval::new(-1, 1);
        assert_eq!((iv.secs(), iv.subsec_nanos()), (0, -999_999_999));

        let iv = Interval::new(2, -5);
        assert_eq!((iv.secs(), iv.subsec_nanos()), (1, 999_999_995));
    }

    #[test]
    fn test_add_sub() {
        let a = Interval::new(1, 800_000_000);
        let b = Interval::new(0, 300_000_000);
        assert_eq!(a + b, Interval::new(2, 100_000_000));
        assert_eq!(a - b, Interval::new(1, 500_000_000));
        assert_eq!(b - a, Interval::new(-1, -500_000_000));
    }

    #[test]
    fn test_ordering() {
        assert!(Interval::new(0, -3) < Interval::ZERO);
        assert!(Interval::ZERO < Interval::new(0, 5));
        assert!(Interval::new(-1, -5) < Interval::new(0, -3));
        assert!(Interval::new(1, 2) < Interval::new(1, 3));
    }

    #[test]
    fn test_to_duration() {
        assert_eq!(
            Interval::new(1, 250_000_000).to_duration(),
            Some(Duration::new(1, 250_000_000))
        );
        assert_eq!(Interval::ZERO.to_duration(), None);
        assert_eq!(Interval::new(0, -1).to_duration(), None);
        assert_eq!(Interval::new(-3, 0).to_duration(), None);
    }

    #[test]
    fn test_duration_roundtrip() {
        let d = Duration::new(7, 123_456_789);
        assert_eq!(Interval::from(d).to_duration(), Some(d));
    }

    #[test]
    fn test_clock_is_monotonic() {
        let clock = Clock::start();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
        assert!(a >= Interval::ZERO);
    }

    proptest! {
        #[test]
        fn prop_new_normalizes(secs in -1_000_000i64..1_000_000, nanos in -3_000_000_000i64..3_000_000_000i64) {
            assert_normalized(Interval::new(secs, nanos));
        }

        #[test]
        fn prop_sub_inverts_add(
            a_secs in -100_000i64..100_000,
            a_nanos in -2_000_000_000i64..2_000_000_000i64,
            b_secs in -100_000i64..100_000,
            b_nanos in -2_000_000_000i64..2_000_000_000i64,
        ) {
            let a = Interval::new(a_secs, a_nanos);
            let b = Interval::new(b_secs, b_nanos);
            prop_assert_eq!((a + b) - b, a);
            prop_assert_eq!((a - b) + b, a);
            assert_normalized(a + b);
            assert_normalized(a - b);
        }
    }
}
