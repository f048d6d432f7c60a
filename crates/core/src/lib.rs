//! Core units, constants, epochs and shared primitives for the Solar Tour Planner workspace.

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Kilometres per astronomical unit.
    pub const AU_KM: f64 = 149_597_870.7;
    /// Seconds per Julian day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert kilometres to metres.
    #[inline]
    pub fn km_to_m(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert metres to kilometres.
    #[inline]
    pub fn m_to_km(v: f64) -> f64 {
        v / 1_000.0
    }
}

/// Epochs and lightweight time utilities shared across crates.
pub mod time {
    use std::fmt;
    use std::ops::{Add, Sub};
    use std::str::FromStr;

    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
    use serde::{Deserialize, Serialize};
    use thiserror::Error;

    use super::constants::SECONDS_PER_DAY;

    /// Timestamp layout used by every report.
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    const DATE_FORMAT: &str = "%Y-%m-%d";
    const ACCEPTED_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

    /// Convert days to seconds.
    #[inline]
    pub fn days_to_seconds(days: f64) -> f64 {
        days * SECONDS_PER_DAY
    }

    /// Convert seconds to days.
    #[inline]
    pub fn seconds_to_days(seconds: f64) -> f64 {
        seconds / SECONDS_PER_DAY
    }

    /// Raised when a calendar string cannot be turned into an [`Epoch`].
    #[derive(Debug, Error, PartialEq, Eq)]
    #[error("invalid epoch `{input}`: expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS")]
    pub struct EpochParseError {
        pub input: String,
    }

    /// Instant expressed as seconds past J2000 (2000-01-01 12:00:00).
    ///
    /// Calendar conversions treat the scale as uniform and ignore leap seconds, so rendered
    /// timestamps can differ from a TDB-aware ephemeris by about a minute.
    #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Epoch(f64);

    impl Epoch {
        pub const J2000: Epoch = Epoch(0.0);

        pub fn from_seconds_past_j2000(seconds: f64) -> Self {
            Self(seconds)
        }

        pub fn seconds_past_j2000(self) -> f64 {
            self.0
        }

        /// Shift the epoch by a (possibly fractional) number of seconds.
        pub fn add_seconds(self, seconds: f64) -> Self {
            Self(self.0 + seconds)
        }

        pub fn add_days(self, days: f64) -> Self {
            self.add_seconds(days_to_seconds(days))
        }

        /// Elapsed seconds from `earlier` to `self`; negative when `earlier` is later.
        pub fn seconds_since(self, earlier: Epoch) -> f64 {
            self.0 - earlier.0
        }

        /// Build an epoch from a calendar date-time.
        pub fn from_datetime(datetime: NaiveDateTime) -> Self {
            let delta = datetime - j2000_datetime();
            let seconds = delta.num_seconds() as f64
                + f64::from(delta.subsec_nanos()) / 1_000_000_000.0;
            Self(seconds)
        }

        /// Calendar date-time, or `None` when the epoch falls outside chrono's range.
        pub fn to_datetime(self) -> Option<NaiveDateTime> {
            let millis = (self.0 * 1_000.0).round();
            if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
                return None;
            }
            let delta = TimeDelta::try_milliseconds(millis as i64)?;
            j2000_datetime().checked_add_signed(delta)
        }

        pub fn to_utc_string(self) -> String {
            self.render(TIMESTAMP_FORMAT)
        }

        pub fn to_date_string(self) -> String {
            self.render(DATE_FORMAT)
        }

        fn render(self, format: &str) -> String {
            match self.to_datetime() {
                Some(datetime) => datetime.format(format).to_string(),
                None => format!("J2000{:+.0}s", self.0),
            }
        }
    }

    fn j2000_datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .unwrap_or_default()
    }

    impl FromStr for Epoch {
        type Err = EpochParseError;

        fn from_str(input: &str) -> Result<Self, Self::Err> {
            let trimmed = input.trim();
            for format in ACCEPTED_FORMATS {
                if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
                    return Ok(Self::from_datetime(datetime));
                }
            }
            NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(Self::from_datetime)
                .ok_or_else(|| EpochParseError {
                    input: input.to_string(),
                })
        }
    }

    impl fmt::Display for Epoch {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.to_utc_string())
        }
    }

    impl Add<f64> for Epoch {
        type Output = Epoch;

        fn add(self, seconds: f64) -> Epoch {
            self.add_seconds(seconds)
        }
    }

    impl Sub for Epoch {
        type Output = f64;

        fn sub(self, earlier: Epoch) -> f64 {
            self.seconds_since(earlier)
        }
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D position vector in kilometres.
    pub type Vector3 = [f64; 3];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Straight-line separation between two points.
    #[inline]
    pub fn distance(a: &Vector3, b: &Vector3) -> f64 {
        norm(&sub(a, b))
    }
}
