use std::time::{SystemTime, UNIX_EPOCH};

const NANOS_PER_SEC: i64 = 1_000_000_000;
const NANOS_PER_MILLI: i64 = 1_000_000;

macro_rules! nanos_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
        pub struct $name(i64);

        impl $name {
            #[inline]
            pub const fn from_nanos(nanos: i64) -> Self {
                Self(nanos)
            }

            #[inline]
            pub const fn from_millis(millis: i64) -> Self {
                Self(millis.saturating_mul(NANOS_PER_MILLI))
            }

            #[inline]
            pub const fn from_secs(secs: i64) -> Self {
                Self(secs.saturating_mul(NANOS_PER_SEC))
            }

            /// Converts fractional seconds, saturating at the `i64`
            /// nanosecond range. NaN maps to zero.
            #[inline]
            pub fn from_secs_f64(secs: f64) -> Self {
                Self((secs * NANOS_PER_SEC as f64) as i64)
            }

            #[inline]
            pub const fn as_nanos(self) -> i64 {
                self.0
            }

            #[inline]
            pub const fn as_millis(self) -> i64 {
                self.0 / NANOS_PER_MILLI
            }

            #[inline]
            pub fn as_secs_f64(self) -> f64 {
                self.0 as f64 / NANOS_PER_SEC as f64
            }

            /// Whole seconds and the non-negative nanosecond remainder.
            #[inline]
            pub const fn split(self) -> (i64, u32) {
                (
                    self.0.div_euclid(NANOS_PER_SEC),
                    self.0.rem_euclid(NANOS_PER_SEC) as u32,
                )
            }
        }
    };
}

nanos_newtype! {
    /// A point in time with nanosecond resolution, counted from the Unix epoch.
    Timestamp
}

nanos_newtype! {
    /// A signed span of time with nanosecond resolution.
    Duration
}

impl Timestamp {
    pub const UNIX_EPOCH: Timestamp = Timestamp(0);

    pub fn now() -> Self {
        SystemTime::now().into()
    }
}

impl Duration {
    pub const ZERO: Duration = Duration(0);

    /// Converts to a `std::time::Duration`, or `None` when negative.
    pub fn to_std(self) -> Option<std::time::Duration> {
        u64::try_from(self.0).ok().map(std::time::Duration::from_nanos)
    }
}

fn saturating_nanos(duration: std::time::Duration) -> i64 {
    i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX)
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Timestamp(saturating_nanos(after)),
            Err(before) => Timestamp(-saturating_nanos(before.duration())),
        }
    }
}

impl From<Timestamp> for SystemTime {
    fn from(time: Timestamp) -> Self {
        let offset = std::time::Duration::from_nanos(time.0.unsigned_abs());
        if time.0 >= 0 {
            UNIX_EPOCH + offset
        } else {
            UNIX_EPOCH - offset
        }
    }
}

impl From<std::time::Duration> for Duration {
    fn from(duration: std::time::Duration) -> Self {
        Duration(saturating_nanos(duration))
    }
}
